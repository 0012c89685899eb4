//! `ArrivalGenerator` — lazy, seeded stream of truck arrivals.
//!
//! # Arrival process
//!
//! Arrivals form a Poisson process: inter-arrival gaps are exponential with
//! rate `base_arrivals_per_hour × load_multiplier × hourly multiplier / 60`
//! per minute, sampled by inverse CDF.  With an hourly profile the rate is
//! piecewise constant: a gap that would cross into the next hour is cut at
//! the boundary and redrawn at the new hour's rate, which is exact for a
//! memoryless process.  An hour with a zero rate is skipped whole.  A truck's
//! arrival tick is the floor of its continuous arrival time, so several
//! trucks may share one tick under heavy load.  The stream ends at the first
//! arrival at or beyond the horizon.
//!
//! Every attribute is drawn from one `RunRng` in a fixed order (gap, class,
//! value of time, charge duration), so the same seed and load multiplier
//! always replay the same sequence.

use std::iter::FusedIterator;

use rand::distributions::{Distribution, WeightedIndex};

use sirq_core::{
    MINUTES_PER_HOUR, RunRng, SirqError, StationConfig, Tick, TruckId, VotClass, VotClassId,
};

use crate::{FleetResult, Truck};

/// Iterator over the trucks arriving during one run.
pub struct ArrivalGenerator {
    classes:         Vec<VotClass>,
    class_dist:      WeightedIndex<f64>,
    rng:             RunRng,
    /// Expected arrivals per minute before the time-of-day profile (already
    /// scaled by the load multiplier).
    rate_per_minute: f64,
    /// 24 hourly multipliers; empty for a flat rate.
    hourly:          Vec<f64>,
    charge_min:      u32,
    charge_max:      u32,
    horizon:         u64,
    /// Continuous arrival clock, in minutes.
    clock:           f64,
    next_id:         u32,
    done:            bool,
}

impl ArrivalGenerator {
    /// Build the generator for one run.
    ///
    /// Fails with a configuration error if `config` or `load_multiplier` is
    /// invalid.  A zero multiplier yields an empty stream.
    pub fn new(config: &StationConfig, load_multiplier: f64, seed: u64) -> FleetResult<Self> {
        config.validate()?;
        StationConfig::validate_load(load_multiplier)?;

        let weights: Vec<f64> = config.classes.iter().map(|c| c.weight).collect();
        let class_dist = WeightedIndex::new(&weights)
            .map_err(|e| SirqError::Config(format!("class weights: {e}")))?;

        let rate_per_minute = config.base_arrivals_per_hour * load_multiplier / 60.0;
        let hourly = &config.hourly_rate_multipliers;
        let silent = rate_per_minute <= 0.0 || (!hourly.is_empty() && hourly.iter().all(|m| *m == 0.0));

        Ok(Self {
            classes:         config.classes.clone(),
            class_dist,
            rng:             RunRng::new(seed),
            rate_per_minute,
            hourly:          hourly.clone(),
            charge_min:      config.charge_minutes_min,
            charge_max:      config.charge_minutes_max,
            horizon:         config.horizon_minutes,
            clock:           0.0,
            next_id:         0,
            done:            silent,
        })
    }

    /// Arrivals per minute in force at continuous time `minute`.
    fn rate_at(&self, minute: f64) -> f64 {
        let hour = Tick(minute as u64).hour_of_day();
        let multiplier = self.hourly.get(hour).copied().unwrap_or(1.0);
        self.rate_per_minute * multiplier
    }

    /// Number of trucks produced so far.
    pub fn generated(&self) -> usize {
        self.next_id as usize
    }

    fn draw_truck(&mut self, arrival: Tick) -> Truck {
        let idx = self.class_dist.sample(self.rng.inner());
        let class = &self.classes[idx];

        let vot = if class.vot_per_hour_min < class.vot_per_hour_max {
            self.rng.gen_range(class.vot_per_hour_min..=class.vot_per_hour_max)
        } else {
            class.vot_per_hour_min
        };
        let charge = self.rng.gen_range(self.charge_min..=self.charge_max);

        let id = TruckId(self.next_id);
        self.next_id += 1;
        // `idx` < classes.len() <= u16::MAX (checked by StationConfig::validate).
        Truck::new(id, arrival, charge, VotClassId(idx as u16), class, vot)
    }
}

impl Iterator for ArrivalGenerator {
    type Item = Truck;

    fn next(&mut self) -> Option<Truck> {
        if self.done {
            return None;
        }

        let horizon = self.horizon as f64;
        if self.hourly.is_empty() {
            self.clock += self.rng.exponential(self.rate_per_minute);
        } else {
            let hour = MINUTES_PER_HOUR as f64;
            loop {
                let boundary = ((self.clock / hour).floor() + 1.0) * hour;
                let rate = self.rate_at(self.clock);
                if rate > 0.0 {
                    let next = self.clock + self.rng.exponential(rate);
                    if next < boundary {
                        self.clock = next;
                        break;
                    }
                }
                self.clock = boundary;
                if self.clock >= horizon {
                    break;
                }
            }
        }
        if !self.clock.is_finite() || self.clock >= horizon {
            self.done = true;
            return None;
        }

        Some(self.draw_truck(Tick(self.clock.floor() as u64)))
    }
}

impl FusedIterator for ArrivalGenerator {}

//! Station configuration: bay pool, demand, value-of-time classes, pricing.
//!
//! Typically built from defaults or loaded from JSON by the application crate
//! and passed by reference into every run.  Nothing here is process-wide
//! state; parallel runs each read the same immutable `StationConfig`.
//!
//! Call [`StationConfig::validate`] before starting any run.  The builders in
//! `sirq-sim` and `sirq-batch` do this for you.

use crate::{HOURS_PER_DAY, SirqError, SirqResult, Tick, VotClassId};

// ── VotClass ──────────────────────────────────────────────────────────────────

/// A value-of-time severity tier (e.g. Critical / Standard / Economy).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VotClass {
    /// Display name, copied into every run record.
    pub name: String,

    /// Lower bound of the per-truck value of time, in $ per hour of waiting.
    pub vot_per_hour_min: f64,

    /// Upper bound of the per-truck value of time.  Equal to the minimum for
    /// a fixed coefficient.
    pub vot_per_hour_max: f64,

    /// Price sensitivity in `[0, 1]`.  0 = perfectly inelastic (bid grows
    /// linearly with wait); 1 = strongly damped bids.
    pub price_sensitivity: f64,

    /// Hard cap on the access bid, in $.
    pub max_bid: f64,

    /// Minutes between arrival and the delivery deadline.
    pub deadline_slack_minutes: u64,

    /// Relative population weight in the arrival mix.
    pub weight: f64,
}

impl VotClass {
    /// Just-in-time / perishable freight: cannot wait, pays a premium.
    pub fn critical() -> Self {
        Self {
            name:                   "Critical".to_owned(),
            vot_per_hour_min:       150.0,
            vot_per_hour_max:       300.0,
            price_sensitivity:      0.1,
            max_bid:                500.0,
            deadline_slack_minutes: 60,
            weight:                 0.2,
        }
    }

    /// Scheduled corporate fleet traffic.
    pub fn standard() -> Self {
        Self {
            name:                   "Standard".to_owned(),
            vot_per_hour_min:       50.0,
            vot_per_hour_max:       80.0,
            price_sensitivity:      0.5,
            max_bid:                150.0,
            deadline_slack_minutes: 180,
            weight:                 0.6,
        }
    }

    /// Owner-operators and bulk haulage: price sensitive, flexible timing.
    pub fn economy() -> Self {
        Self {
            name:                   "Economy".to_owned(),
            vot_per_hour_min:       15.0,
            vot_per_hour_max:       30.0,
            price_sensitivity:      0.9,
            max_bid:                60.0,
            deadline_slack_minutes: 360,
            weight:                 0.2,
        }
    }

    fn validate(&self) -> SirqResult<()> {
        let bad = |msg: &str| Err(SirqError::Config(format!("class {:?}: {msg}", self.name)));

        if self.name.is_empty() {
            return Err(SirqError::Config("class name must not be empty".to_owned()));
        }
        if !self.vot_per_hour_min.is_finite()
            || !self.vot_per_hour_max.is_finite()
            || self.vot_per_hour_min < 0.0
        {
            return bad("value of time must be finite and non-negative");
        }
        if self.vot_per_hour_min > self.vot_per_hour_max {
            return bad("vot_per_hour_min exceeds vot_per_hour_max");
        }
        if !(0.0..=1.0).contains(&self.price_sensitivity) {
            return bad("price_sensitivity must lie in [0, 1]");
        }
        if !self.max_bid.is_finite() || self.max_bid < 0.0 {
            return bad("max_bid must be finite and non-negative");
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return bad("weight must be finite and non-negative");
        }
        Ok(())
    }
}

// ── PricingConfig ─────────────────────────────────────────────────────────────

/// Energy pricing on top of the access fee.
///
/// With `price_per_kwh == 0` (the default) a truck pays only its access fee.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PricingConfig {
    /// Base grid price in $/kWh.
    pub price_per_kwh: f64,

    /// Charger power in kW (DC fast charging).
    pub charger_kw: f64,

    /// Scale the energy price with station utilization.
    pub smart_pricing: bool,

    /// Price rise at 100% utilization: 0.5 means +50%.
    pub surge_sensitivity: f64,

    /// Regulatory cap on the surged price, in $/kWh.
    pub max_price_per_kwh: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_kwh:     0.0,
            charger_kw:        150.0,
            smart_pricing:     false,
            surge_sensitivity: 0.5,
            max_price_per_kwh: 2.0,
        }
    }
}

impl PricingConfig {
    /// $0.50/kWh with congestion surge pricing enabled.
    pub fn smart() -> Self {
        Self {
            price_per_kwh: 0.5,
            smart_pricing: true,
            ..Self::default()
        }
    }

    /// Energy charge for a session of `charge_minutes` at `utilization`
    /// (occupied + waiting demand over bay count, clamped to `[0, 1]`).
    pub fn energy_charge(&self, charge_minutes: u32, utilization: f64) -> f64 {
        if self.price_per_kwh <= 0.0 {
            return 0.0;
        }
        let kwh = charge_minutes as f64 * self.charger_kw / 60.0;
        let unit_price = if self.smart_pricing {
            let surged = self.price_per_kwh * (1.0 + self.surge_sensitivity * utilization.clamp(0.0, 1.0));
            surged.min(self.max_price_per_kwh)
        } else {
            self.price_per_kwh
        };
        kwh * unit_price
    }

    fn validate(&self) -> SirqResult<()> {
        let fields = [
            ("price_per_kwh", self.price_per_kwh),
            ("charger_kw", self.charger_kw),
            ("surge_sensitivity", self.surge_sensitivity),
            ("max_price_per_kwh", self.max_price_per_kwh),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SirqError::Config(format!("{name} must be finite and non-negative")));
            }
        }
        Ok(())
    }
}

// ── StationConfig ─────────────────────────────────────────────────────────────

/// Everything one simulation run needs to know about the station and its
/// demand, except the policy, the load multiplier, and the seed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StationConfig {
    /// Size of the fixed charging-bay pool.
    pub bay_count: u16,

    /// Arrival window in minutes.  Trucks arrive in `[0, horizon)`; service
    /// completions and deadline checks after the horizon still run.
    pub horizon_minutes: u64,

    /// Mean arrivals per hour at load multiplier 1.0.
    pub base_arrivals_per_hour: f64,

    /// Time-of-day demand: 24 multipliers on `base_arrivals_per_hour`, one
    /// per hour of the simulated day, repeating every day.  Empty means a
    /// flat rate.
    pub hourly_rate_multipliers: Vec<f64>,

    /// Shortest charging session, in minutes (at least 1).
    pub charge_minutes_min: u32,

    /// Longest charging session, in minutes.
    pub charge_minutes_max: u32,

    /// Value-of-time class table, indexed by `VotClassId`.
    pub classes: Vec<VotClass>,

    /// Minimum entry fee, in $.  FIFO books exactly this; auction bids start
    /// from it.
    pub base_fee: f64,

    pub pricing: PricingConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            bay_count:               4,
            horizon_minutes:         1_440,
            base_arrivals_per_hour:  3.5,
            hourly_rate_multipliers: Vec::new(),
            charge_minutes_min:      30,
            charge_minutes_max:      90,
            classes:                 vec![VotClass::critical(), VotClass::standard(), VotClass::economy()],
            base_fee:                10.0,
            pricing:                 PricingConfig::default(),
        }
    }
}

impl StationConfig {
    /// A freight corridor's daily pattern: quiet nights, a morning peak
    /// (06–10), steady midday (10–15), an evening peak (15–19) and a tapering
    /// late evening.  Averages close to 1.0 over the day.
    pub fn freight_day_profile() -> Vec<f64> {
        (0..HOURS_PER_DAY)
            .map(|hour| match hour {
                0..6   => 0.4,
                6..10  => 1.6,
                10..15 => 1.0,
                15..19 => 1.5,
                _      => 0.8,
            })
            .collect()
    }

    /// Demand multiplier in force at `at`; 1.0 without a profile.
    #[inline]
    pub fn rate_multiplier(&self, at: Tick) -> f64 {
        self.hourly_rate_multipliers.get(at.hour_of_day()).copied().unwrap_or(1.0)
    }

    /// Look up a class by id.
    pub fn class(&self, id: VotClassId) -> SirqResult<&VotClass> {
        self.classes.get(id.index()).ok_or(SirqError::UnknownClass(id))
    }

    /// Find a class id by its display name.
    pub fn class_id(&self, name: &str) -> Option<VotClassId> {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| VotClassId::try_from(i).ok())
    }

    /// Midpoint of the charge-duration range; the turnover estimate used by
    /// the bid engine.
    #[inline]
    pub fn mean_charge_minutes(&self) -> f64 {
        (self.charge_minutes_min as f64 + self.charge_minutes_max as f64) / 2.0
    }

    /// Reject configurations no run may start with.
    pub fn validate(&self) -> SirqResult<()> {
        if self.bay_count == 0 {
            return Err(SirqError::Config("bay_count must be at least 1".to_owned()));
        }
        if self.horizon_minutes == 0 {
            return Err(SirqError::Config("horizon_minutes must be at least 1".to_owned()));
        }
        if !self.base_arrivals_per_hour.is_finite() || self.base_arrivals_per_hour < 0.0 {
            return Err(SirqError::Config(
                "base_arrivals_per_hour must be finite and non-negative".to_owned(),
            ));
        }
        if !self.hourly_rate_multipliers.is_empty() {
            if self.hourly_rate_multipliers.len() != HOURS_PER_DAY as usize {
                return Err(SirqError::Config(format!(
                    "hourly_rate_multipliers needs {HOURS_PER_DAY} entries, got {}",
                    self.hourly_rate_multipliers.len()
                )));
            }
            if self.hourly_rate_multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
                return Err(SirqError::Config(
                    "hourly_rate_multipliers must be finite and non-negative".to_owned(),
                ));
            }
        }
        if self.charge_minutes_min == 0 {
            return Err(SirqError::Config("charge_minutes_min must be at least 1".to_owned()));
        }
        if self.charge_minutes_min > self.charge_minutes_max {
            return Err(SirqError::Config(format!(
                "charge_minutes_min ({}) exceeds charge_minutes_max ({})",
                self.charge_minutes_min, self.charge_minutes_max
            )));
        }
        if self.classes.is_empty() {
            return Err(SirqError::Config("at least one value-of-time class is required".to_owned()));
        }
        if self.classes.len() > u16::MAX as usize {
            return Err(SirqError::Config("too many value-of-time classes".to_owned()));
        }
        for class in &self.classes {
            class.validate()?;
        }
        // The latest tick a run can reach is a truck arriving just before the
        // horizon, waiting out its full slack, then charging for the maximum.
        for class in &self.classes {
            let latest = self
                .horizon_minutes
                .checked_add(class.deadline_slack_minutes)
                .and_then(|t| t.checked_add(u64::from(self.charge_minutes_max)));
            if latest.is_none() {
                return Err(SirqError::Config(format!(
                    "class {:?}: deadline_slack_minutes {} overflows the time range",
                    class.name, class.deadline_slack_minutes
                )));
            }
        }
        if self.classes.iter().map(|c| c.weight).sum::<f64>() <= 0.0 {
            return Err(SirqError::Config("class weights must not all be zero".to_owned()));
        }
        if !self.base_fee.is_finite() || self.base_fee <= 0.0 {
            return Err(SirqError::Config("base_fee must be finite and positive".to_owned()));
        }
        self.pricing.validate()
    }

    /// Reject a traffic-load multiplier no run may start with.
    pub fn validate_load(load_multiplier: f64) -> SirqResult<()> {
        if !load_multiplier.is_finite() || load_multiplier < 0.0 {
            return Err(SirqError::Config(format!(
                "load multiplier must be finite and non-negative, got {load_multiplier}"
            )));
        }
        Ok(())
    }
}

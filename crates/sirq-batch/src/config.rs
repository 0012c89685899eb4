//! Batch configuration and the run plan derived from it.

use sirq_alloc::AllocationPolicy;
use sirq_core::{SirqError, SirqResult, StationConfig, derive_seed};
use sirq_record::RunKey;

/// Everything needed to reproduce one batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchConfig {
    pub station:          StationConfig,
    pub policies:         Vec<AllocationPolicy>,
    /// Traffic multipliers applied to `station.base_arrivals_per_hour`.
    pub load_multipliers: Vec<f64>,
    /// Runs per (policy, load) pair.
    pub replicates:       u32,
    pub master_seed:      u64,
    /// Worker threads with the `parallel` feature.  `None` uses all cores.
    pub num_threads:      Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            station:          StationConfig::default(),
            policies:         AllocationPolicy::ALL.to_vec(),
            load_multipliers: vec![0.5, 1.0, 1.5, 2.0],
            replicates:       50,
            master_seed:      42,
            num_threads:      None,
        }
    }
}

/// One entry of the run plan.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RunSpec {
    /// Position in the plan; results are returned in this order.
    pub index:      usize,
    pub load_index: usize,
    pub key:        RunKey,
}

impl BatchConfig {
    /// Reject configurations before any run starts.
    pub fn validate(&self) -> SirqResult<()> {
        self.station.validate()?;
        if self.policies.is_empty() {
            return Err(SirqError::Config("at least one policy is required".to_owned()));
        }
        for (i, p) in self.policies.iter().enumerate() {
            if self.policies[..i].contains(p) {
                return Err(SirqError::Config(format!("policy {p} listed twice")));
            }
        }
        if self.load_multipliers.is_empty() {
            return Err(SirqError::Config("at least one load multiplier is required".to_owned()));
        }
        for &load in &self.load_multipliers {
            StationConfig::validate_load(load)?;
        }
        if self.replicates == 0 {
            return Err(SirqError::Config("replicates must be at least 1".to_owned()));
        }
        if self.num_threads == Some(0) {
            return Err(SirqError::Config("num_threads must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Total number of runs in the plan.
    pub fn run_count(&self) -> usize {
        self.policies.len() * self.load_multipliers.len() * self.replicates as usize
    }

    /// Seed shared by every policy at (`load_index`, `replicate`).
    pub fn run_seed(&self, load_index: usize, replicate: u32) -> u64 {
        let scenario = load_index as u64 * u64::from(self.replicates) + u64::from(replicate);
        derive_seed(self.master_seed, scenario)
    }

    /// The run plan, ordered by load, then replicate, then policy.
    pub fn plan(&self) -> Vec<RunSpec> {
        let mut specs = Vec::with_capacity(self.run_count());
        for (load_index, &load_multiplier) in self.load_multipliers.iter().enumerate() {
            for replicate in 0..self.replicates {
                let seed = self.run_seed(load_index, replicate);
                for &policy in &self.policies {
                    specs.push(RunSpec {
                        index: specs.len(),
                        load_index,
                        key: RunKey { policy, load_multiplier, replicate, seed },
                    });
                }
            }
        }
        specs
    }
}

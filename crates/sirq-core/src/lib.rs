//! `sirq-core` — foundational types for the SIRQ charging-bay simulator.
//!
//! This crate is a dependency of every other `sirq-*` crate.  It has no
//! `sirq-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TruckId`, `BayId`, `VotClassId`                      |
//! | [`time`]        | `Tick` (one simulated minute), `SimClock`             |
//! | [`rng`]         | `RunRng`, `derive_seed`                               |
//! | [`config`]      | `StationConfig`, `VotClass`, `PricingConfig`          |
//! | [`error`]       | `SirqError`, `SirqResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{PricingConfig, StationConfig, VotClass};
pub use error::{SirqError, SirqResult};
pub use ids::{BayId, TruckId, VotClassId};
pub use rng::{RunRng, derive_seed};
pub use time::{HOURS_PER_DAY, MINUTES_PER_HOUR, SimClock, Tick};

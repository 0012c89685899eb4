//! `sirq-fleet` — truck agents and the arrival generator.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`truck`]      | `Truck`, `TruckState` (lifecycle state machine)           |
//! | [`generator`]  | `ArrivalGenerator` (lazy, seeded Poisson arrival stream)  |
//! | [`error`]      | `FleetError`, `FleetResult<T>`                            |
//!
//! # Lifecycle (summary)
//!
//! ```text
//! Arrived ──► Queued ──► Charging ──► Served
//!               │
//!               └──────► Failed   (deadline passed while waiting)
//! ```
//!
//! Trucks are created by the generator in state `Arrived`; every later
//! transition is driven by the event engine in `sirq-sim`.

pub mod error;
pub mod generator;
pub mod truck;

#[cfg(test)]
mod tests;

pub use error::{FleetError, FleetResult};
pub use generator::ArrivalGenerator;
pub use truck::{Truck, TruckState};

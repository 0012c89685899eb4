//! `sirq-sim` — discrete-event engine for one charging-station run.
//!
//! # Processing one timestamp
//!
//! ```text
//! while the event queue is not empty:
//!   t = earliest queued timestamp; clock jumps to t
//!   repeat until no event remains at t:
//!     ① BayFree        — release the bay; occupant Charging → Served
//!     ② Arrival        — Arrived → Queued; schedule its DeadlineCheck;
//!                        pull the next truck from the arrival source
//!     ③ Allocation     — while a bay is free and trucks wait:
//!                        refresh bids, select_next, start charging,
//!                        schedule BayFree at t + charge_minutes
//!     ④ DeadlineCheck  — still-queued trucks with deadline <= t fail
//!   observer.on_timestamp_end(snapshot)
//! ```
//!
//! Releases run first so a bay freed at `t` is allocatable at `t`; a truck
//! allocated exactly at its deadline is served.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`event`]     | `Event`, `EventKind`, `EventQueue`                     |
//! | [`station`]   | `Station` and its event loop, `RunSummary`             |
//! | [`builder`]   | `StationBuilder`                                       |
//! | [`observer`]  | `SimObserver`, `NoopObserver`, decision/snapshot types |
//! | [`error`]     | `SimError`, `SimResult<T>`                             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sirq_alloc::AllocationPolicy;
//! use sirq_core::StationConfig;
//! use sirq_sim::{NoopObserver, StationBuilder};
//!
//! let station = StationBuilder::new(StationConfig::default(), AllocationPolicy::Auction)
//!     .generator(1.0, 42)
//!     .build()?;
//! let summary = station.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod station;


pub use builder::StationBuilder;
pub use error::{SimError, SimResult};
pub use event::{Event, EventKind, EventQueue};
pub use observer::{AllocationDecision, NoopObserver, SimObserver, StationSnapshot};
pub use station::{RunSummary, Station};

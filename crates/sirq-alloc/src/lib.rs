//! `sirq-alloc` — who gets the next free charging bay.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`queue`]    | `PendingQueue` (stable insertion order)                       |
//! | [`bay`]      | `Bay`, `BayState`, `BayPool`                                  |
//! | [`policy`]   | `AllocationPolicy` {`Fifo`, `Auction`}, `Selection`, `Candidate` |
//! | [`error`]    | `AllocError`, `AllocResult<T>`                                |
//!
//! # Tie-break rules
//!
//! | Policy    | Order (first wins)                                             |
//! |-----------|----------------------------------------------------------------|
//! | `Fifo`    | earliest arrival, then queue insertion order                   |
//! | `Auction` | highest bid, earliest deadline, earliest arrival, insertion order |
//!
//! Neither policy ever draws a random number, so a fixed seed fixes every
//! allocation.

pub mod bay;
pub mod error;
pub mod policy;
pub mod queue;

#[cfg(test)]
mod tests;

pub use bay::{Bay, BayPool, BayState};
pub use error::{AllocError, AllocResult};
pub use policy::{AllocationPolicy, Candidate, Selection};
pub use queue::PendingQueue;

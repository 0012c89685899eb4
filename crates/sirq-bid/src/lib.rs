//! `sirq-bid` — how much a waiting truck is willing to pay for the next bay.
//!
//! # Bid formula
//!
//! ```text
//! expected_wait = (now − arrival) + queue_depth × mean_service / bays   [min]
//! premium       = vot_per_hour × expected_wait / 60                     [$]
//! damped        = premium / (1 + s × premium / base_fee)
//! bid           = min(base_fee + damped, max_bid)
//! ```
//!
//! `s` is the truck's price sensitivity.  The damping is concave, so every
//! extra minute of waiting adds less willingness-to-pay than the one before,
//! and the bid approaches the sensitivity-scaled ceiling
//! `base_fee × (1 + 1/s)` without crossing it.  The class `max_bid` caps it
//! as well: a truck caps its bid rather than withdrawing.
//!
//! Under the auction every pending truck is re-priced at every allocation
//! decision, so bids escalate as measured wait grows.  FIFO never consults
//! bids for selection and books the flat base fee.

pub mod engine;

#[cfg(test)]
mod tests;

pub use engine::BidEngine;

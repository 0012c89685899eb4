use sirq_core::{BayId, SirqError, TruckId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error(transparent)]
    Core(#[from] SirqError),

    #[error("{0} does not exist")]
    UnknownBay(BayId),

    #[error("{bay} is already occupied by {occupant}")]
    BayOccupied { bay: BayId, occupant: TruckId },

    #[error("{0} is not occupied")]
    BayNotOccupied(BayId),

    #[error("unknown allocation policy {0:?} (expected \"fifo\" or \"auction\")")]
    UnknownPolicy(String),
}

pub type AllocResult<T> = Result<T, AllocError>;

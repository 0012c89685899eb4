use sirq_core::{SirqError, TruckId};
use thiserror::Error;

use crate::TruckState;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Core(#[from] SirqError),

    #[error("{truck}: illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        truck: TruckId,
        from:  TruckState,
        to:    TruckState,
    },
}

pub type FleetResult<T> = Result<T, FleetError>;

use sirq_alloc::AllocError;
use sirq_core::{SirqError, Tick, TruckId, VotClassId};
use sirq_fleet::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] SirqError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("{truck} references unknown value-of-time class {class}")]
    UnknownClass { truck: TruckId, class: VotClassId },

    #[error("{truck} arrives at {arrival}, before the previous arrival at {previous}")]
    ArrivalOutOfOrder {
        truck:    TruckId,
        arrival:  Tick,
        previous: Tick,
    },

    #[error("{truck} has deadline {deadline}, before its arrival at {arrival}")]
    DeadlineBeforeArrival {
        truck:    TruckId,
        arrival:  Tick,
        deadline: Tick,
    },

    #[error(
        "run ended unresolved: {generated} generated, {served} served, {failed} failed, \
         {pending} still queued, {charging} still charging"
    )]
    Unresolved {
        generated: usize,
        served:    usize,
        failed:    usize,
        pending:   usize,
        charging:  usize,
    },
}

pub type SimResult<T> = Result<T, SimError>;

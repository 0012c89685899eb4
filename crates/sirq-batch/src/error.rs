use sirq_core::SirqError;
use sirq_record::RecordError;
use sirq_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Core(#[from] SirqError),

    #[error("simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[cfg(feature = "parallel")]
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type BatchResult<T> = Result<T, BatchError>;

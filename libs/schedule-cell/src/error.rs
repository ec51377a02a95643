use thiserror::Error;

use shared_database::StoreError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("doctor {0} not found")]
    DoctorNotFound(String),

    #[error("schedule {0} not found")]
    NotFound(u64),

    #[error("end time must be after start time")]
    InvalidTimeRange,

    #[error(transparent)]
    Store(#[from] StoreError),
}

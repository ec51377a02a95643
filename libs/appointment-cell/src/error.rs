use thiserror::Error;

use shared_database::StoreError;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("schedule {0} not found")]
    ScheduleNotFound(u64),

    #[error("patient {0} not found")]
    PatientNotFound(String),

    #[error("appointment {0} not found")]
    NotFound(u64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

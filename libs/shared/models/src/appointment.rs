use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A patient's booking against a schedule. The patient name is a snapshot
/// taken at booking time; the queue number is the booking's position in the
/// schedule's queue and is never reassigned after deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub schedule_id: u64,
    pub patient_username: String,
    pub patient_name: String,
    pub queue_number: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Waiting,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Terminal by convention only; transitions out of these states are
    /// still accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Waiting => write!(f, "Waiting"),
            AppointmentStatus::InProgress => write!(f, "In Progress"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Waiting" => Ok(AppointmentStatus::Waiting),
            "In Progress" => Ok(AppointmentStatus::InProgress),
            "Completed" => Ok(AppointmentStatus::Completed),
            "Cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }
}

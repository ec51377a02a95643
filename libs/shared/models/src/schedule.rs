use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::datetime::{SlotDate, SlotTime};
use crate::error::ModelError;

/// A doctor-offered time slot. Doctor name and specialization are snapshots
/// copied from the directory at creation time and are not kept in sync with
/// later directory edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    pub doctor_username: String,
    pub doctor_name: String,
    pub specialization: String,
    pub date: SlotDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    #[serde(default)]
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Available,
    Booked,
    Cancelled,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Available => write!(f, "Available"),
            ScheduleStatus::Booked => write!(f, "Booked"),
            ScheduleStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ScheduleStatus::Available),
            "Booked" => Ok(ScheduleStatus::Booked),
            "Cancelled" => Ok(ScheduleStatus::Cancelled),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }
}

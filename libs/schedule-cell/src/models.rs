use serde::{Deserialize, Serialize};

use shared_models::{ScheduleStatus, SlotDate, SlotTime};

/// Partial schedule update; only the fields that are present are applied.
/// The owning doctor and the denormalized name/specialization snapshot are
/// fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSchedule {
    pub date: Option<SlotDate>,
    pub start_time: Option<SlotTime>,
    pub end_time: Option<SlotTime>,
    pub status: Option<ScheduleStatus>,
}

/// Search criteria. String fields match case-insensitively as substrings;
/// id and status match exactly; empty criteria match every schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFilter {
    pub id: Option<u64>,
    pub doctor_username: Option<String>,
    pub doctor_name: Option<String>,
    pub specialization: Option<String>,
    pub date: Option<String>,
    pub status: Option<ScheduleStatus>,
}

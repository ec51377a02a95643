use serde::Serialize;

use shared_models::{AppointmentStatus, SlotDate, SlotTime};

// Read-only projections joining a booking with its schedule's slot details.
// These are derived at query time and never persisted.

#[derive(Debug, Clone, Serialize)]
pub struct PatientAppointmentView {
    pub id: u64,
    pub schedule_id: u64,
    pub patient_username: String,
    pub patient_name: String,
    pub queue_number: u32,
    pub status: AppointmentStatus,
    pub doctor_name: String,
    pub specialization: String,
    pub date: SlotDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorAppointmentView {
    pub id: u64,
    pub schedule_id: u64,
    pub patient_username: String,
    pub patient_name: String,
    pub queue_number: u32,
    pub status: AppointmentStatus,
    pub date: SlotDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
}

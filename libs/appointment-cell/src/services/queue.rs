use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use shared_database::JsonStore;
use shared_models::{Appointment, AppointmentStatus, Role, Schedule, UserMap};

use crate::error::AppointmentError;
use crate::models::{DoctorAppointmentView, PatientAppointmentView};

pub struct AppointmentService {
    store: Arc<JsonStore>,
}

impl AppointmentService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Book a patient onto a schedule and return the assigned queue number.
    ///
    /// The queue number is the count of live bookings on that schedule plus
    /// one. Deleted bookings are not counted, so positions freed by deletion
    /// reappear as gaps rather than being handed out again. Booking does not
    /// flip the schedule's status; marking it Booked is a separate ledger
    /// update left to the caller.
    pub async fn book_appointment(
        &self,
        schedule_id: u64,
        patient_username: &str,
    ) -> Result<u32, AppointmentError> {
        debug!(schedule_id, patient = patient_username, "booking appointment");

        let schedules: Vec<Schedule> = self.store.load().await?;
        if !schedules.iter().any(|s| s.id == schedule_id) {
            return Err(AppointmentError::ScheduleNotFound(schedule_id));
        }

        let users: UserMap = self.store.load().await?;
        let patient = users
            .get(patient_username)
            .filter(|record| record.role == Role::Patient)
            .ok_or_else(|| AppointmentError::PatientNotFound(patient_username.to_string()))?;
        let patient_name = patient.name.clone();
        let patient_username = patient_username.to_string();

        self.store
            .mutate(move |appointments: &mut Vec<Appointment>| {
                let queue_number =
                    appointments.iter().filter(|a| a.schedule_id == schedule_id).count() as u32 + 1;
                let id = appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1;
                appointments.push(Appointment {
                    id,
                    schedule_id,
                    patient_username,
                    patient_name,
                    queue_number,
                    status: AppointmentStatus::Waiting,
                });
                Ok::<_, AppointmentError>(queue_number)
            })
            .await?
    }

    pub async fn get_appointment(&self, id: u64) -> Result<Appointment, AppointmentError> {
        let appointments: Vec<Appointment> = self.store.load().await?;
        appointments
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(AppointmentError::NotFound(id))
    }

    /// Set a booking's status. Any status may follow any other; Completed and
    /// Cancelled are terminal by convention only.
    pub async fn update_status(
        &self,
        id: u64,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!(id, %status, "updating appointment status");

        self.store
            .mutate(move |appointments: &mut Vec<Appointment>| {
                let appointment = appointments
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or(AppointmentError::NotFound(id))?;
                appointment.status = status;
                Ok(())
            })
            .await?
    }

    /// Remove a booking. Surviving queue numbers are not compacted, and the
    /// parent schedule keeps whatever status it had; reverting it to
    /// Available is a separate ledger update left to the caller.
    pub async fn delete_appointment(&self, id: u64) -> Result<(), AppointmentError> {
        debug!(id, "deleting appointment");

        self.store
            .mutate(move |appointments: &mut Vec<Appointment>| {
                let before = appointments.len();
                appointments.retain(|a| a.id != id);
                if appointments.len() == before {
                    return Err(AppointmentError::NotFound(id));
                }
                Ok(())
            })
            .await?
    }

    /// The live queue for one schedule, in booking order.
    pub async fn schedule_queue(
        &self,
        schedule_id: u64,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments: Vec<Appointment> = self.store.load().await?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.schedule_id == schedule_id)
            .collect())
    }

    /// A patient's bookings joined with slot details. Bookings whose schedule
    /// has been deleted are skipped rather than failing the query.
    pub async fn patient_appointments(
        &self,
        patient_username: &str,
    ) -> Result<Vec<PatientAppointmentView>, AppointmentError> {
        let appointments: Vec<Appointment> = self.store.load().await?;
        let schedules = self.schedules_by_id().await?;

        Ok(appointments
            .into_iter()
            .filter(|a| a.patient_username == patient_username)
            .filter_map(|a| match schedules.get(&a.schedule_id) {
                Some(schedule) => Some(PatientAppointmentView {
                    id: a.id,
                    schedule_id: a.schedule_id,
                    patient_username: a.patient_username,
                    patient_name: a.patient_name,
                    queue_number: a.queue_number,
                    status: a.status,
                    doctor_name: schedule.doctor_name.clone(),
                    specialization: schedule.specialization.clone(),
                    date: schedule.date.clone(),
                    start_time: schedule.start_time.clone(),
                    end_time: schedule.end_time.clone(),
                }),
                None => {
                    warn!(
                        appointment = a.id,
                        schedule = a.schedule_id,
                        "skipping appointment with dangling schedule reference"
                    );
                    None
                }
            })
            .collect())
    }

    /// Bookings across all of a doctor's schedules, joined with slot details.
    pub async fn doctor_appointments(
        &self,
        doctor_username: &str,
    ) -> Result<Vec<DoctorAppointmentView>, AppointmentError> {
        let schedules: Vec<Schedule> = self.store.load().await?;
        let owned: HashMap<u64, Schedule> = schedules
            .into_iter()
            .filter(|s| s.doctor_username == doctor_username)
            .map(|s| (s.id, s))
            .collect();

        let appointments: Vec<Appointment> = self.store.load().await?;
        Ok(appointments
            .into_iter()
            .filter_map(|a| {
                owned.get(&a.schedule_id).map(|schedule| DoctorAppointmentView {
                    id: a.id,
                    schedule_id: a.schedule_id,
                    patient_username: a.patient_username,
                    patient_name: a.patient_name,
                    queue_number: a.queue_number,
                    status: a.status,
                    date: schedule.date.clone(),
                    start_time: schedule.start_time.clone(),
                    end_time: schedule.end_time.clone(),
                })
            })
            .collect())
    }

    async fn schedules_by_id(&self) -> Result<HashMap<u64, Schedule>, AppointmentError> {
        let schedules: Vec<Schedule> = self.store.load().await?;
        Ok(schedules.into_iter().map(|s| (s.id, s)).collect())
    }
}

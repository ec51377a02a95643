use std::sync::Arc;

use tracing::debug;

use shared_database::JsonStore;
use shared_models::{
    Role, Schedule, ScheduleStatus, SlotDate, SlotTime, UserMap,
};

use crate::error::ScheduleError;
use crate::models::{ScheduleFilter, UpdateSchedule};

pub struct ScheduleService {
    store: Arc<JsonStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Create a time slot for a doctor. The doctor's current name and
    /// specialization are copied into the record; ids grow monotonically and
    /// are never reused for renumbering. New slots start out Available.
    pub async fn add_schedule(
        &self,
        doctor_username: &str,
        date: SlotDate,
        start_time: SlotTime,
        end_time: SlotTime,
    ) -> Result<u64, ScheduleError> {
        debug!(doctor = doctor_username, %date, "adding schedule");

        if end_time <= start_time {
            return Err(ScheduleError::InvalidTimeRange);
        }

        let users: UserMap = self.store.load().await?;
        let doctor = users
            .get(doctor_username)
            .filter(|record| record.role == Role::Doctor)
            .ok_or_else(|| ScheduleError::DoctorNotFound(doctor_username.to_string()))?;
        let doctor_name = doctor.name.clone();
        let specialization = doctor
            .specialization
            .clone()
            .unwrap_or_else(|| "General".to_string());
        let doctor_username = doctor_username.to_string();

        self.store
            .mutate(move |schedules: &mut Vec<Schedule>| {
                let id = schedules.iter().map(|s| s.id).max().unwrap_or(0) + 1;
                schedules.push(Schedule {
                    id,
                    doctor_username,
                    doctor_name,
                    specialization,
                    date,
                    start_time,
                    end_time,
                    status: ScheduleStatus::Available,
                });
                Ok::<_, ScheduleError>(id)
            })
            .await?
    }

    pub async fn get_schedule(&self, id: u64) -> Result<Schedule, ScheduleError> {
        let schedules: Vec<Schedule> = self.store.load().await?;
        schedules
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::NotFound(id))
    }

    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, ScheduleError> {
        Ok(self.store.load().await?)
    }

    pub async fn doctor_schedules(
        &self,
        doctor_username: &str,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        let schedules: Vec<Schedule> = self.store.load().await?;
        Ok(schedules
            .into_iter()
            .filter(|s| s.doctor_username == doctor_username)
            .collect())
    }

    /// Apply the fields present in `changes`. The merged record must still
    /// satisfy end-after-start; a violating update is rejected before
    /// anything is written.
    pub async fn update_schedule(
        &self,
        id: u64,
        changes: UpdateSchedule,
    ) -> Result<(), ScheduleError> {
        debug!(id, "updating schedule");

        self.store
            .mutate(move |schedules: &mut Vec<Schedule>| {
                let schedule = schedules
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or(ScheduleError::NotFound(id))?;

                {
                    let start = changes.start_time.as_ref().unwrap_or(&schedule.start_time);
                    let end = changes.end_time.as_ref().unwrap_or(&schedule.end_time);
                    if end <= start {
                        return Err(ScheduleError::InvalidTimeRange);
                    }
                }

                if let Some(date) = changes.date {
                    schedule.date = date;
                }
                if let Some(start_time) = changes.start_time {
                    schedule.start_time = start_time;
                }
                if let Some(end_time) = changes.end_time {
                    schedule.end_time = end_time;
                }
                if let Some(status) = changes.status {
                    schedule.status = status;
                }
                Ok(())
            })
            .await?
    }

    /// Unconditional removal. Appointments referencing the schedule are not
    /// cascaded; queue reads tolerate the dangling ids.
    pub async fn delete_schedule(&self, id: u64) -> Result<(), ScheduleError> {
        debug!(id, "deleting schedule");

        self.store
            .mutate(move |schedules: &mut Vec<Schedule>| {
                let before = schedules.len();
                schedules.retain(|s| s.id != id);
                if schedules.len() == before {
                    return Err(ScheduleError::NotFound(id));
                }
                Ok(())
            })
            .await?
    }

    pub async fn search_schedules(
        &self,
        filter: ScheduleFilter,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        let schedules: Vec<Schedule> = self.store.load().await?;
        Ok(schedules
            .into_iter()
            .filter(|s| matches_filter(s, &filter))
            .collect())
    }
}

fn matches_filter(schedule: &Schedule, filter: &ScheduleFilter) -> bool {
    fn contains_ci(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    if let Some(id) = filter.id {
        if schedule.id != id {
            return false;
        }
    }
    if let Some(ref needle) = filter.doctor_username {
        if !contains_ci(&schedule.doctor_username, needle) {
            return false;
        }
    }
    if let Some(ref needle) = filter.doctor_name {
        if !contains_ci(&schedule.doctor_name, needle) {
            return false;
        }
    }
    if let Some(ref needle) = filter.specialization {
        if !contains_ci(&schedule.specialization, needle) {
            return false;
        }
    }
    if let Some(ref needle) = filter.date {
        if !contains_ci(schedule.date.as_str(), needle) {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if schedule.status != status {
            return false;
        }
    }
    true
}

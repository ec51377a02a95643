use std::sync::Arc;

use shared_database::JsonStore;
use shared_models::{
    Appointment, AppointmentStatus, Role, Schedule, ScheduleStatus, UserMap, UserRecord,
};

fn doctor_record(name: &str, specialization: &str) -> UserRecord {
    UserRecord {
        password: "secret".to_string(),
        role: Role::Doctor,
        name: name.to_string(),
        specialization: Some(specialization.to_string()),
        admin_number: None,
        doctor_number: Some("D0001".to_string()),
        patient_number: None,
    }
}

fn sample_schedule(id: u64) -> Schedule {
    Schedule {
        id,
        doctor_username: "D0001".to_string(),
        doctor_name: "Dr. Janice".to_string(),
        specialization: "Cardiology".to_string(),
        date: "2025-05-18".parse().unwrap(),
        start_time: "08:00".parse().unwrap(),
        end_time: "12:00".parse().unwrap(),
        status: ScheduleStatus::Available,
    }
}

fn sample_appointment(id: u64, schedule_id: u64, queue_number: u32) -> Appointment {
    Appointment {
        id,
        schedule_id,
        patient_username: "P0001".to_string(),
        patient_name: "Alice".to_string(),
        queue_number,
        status: AppointmentStatus::Waiting,
    }
}

#[tokio::test]
async fn missing_files_load_as_empty_collections() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(&shared_config::AppConfig::with_data_dir(dir.path()));

    let users: UserMap = store.load().await.unwrap();
    let schedules: Vec<Schedule> = store.load().await.unwrap();
    let appointments: Vec<Appointment> = store.load().await.unwrap();

    assert!(users.is_empty());
    assert!(schedules.is_empty());
    assert!(appointments.is_empty());
}

#[tokio::test]
async fn save_then_load_round_trips_all_three_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path());

    let mut users = UserMap::new();
    users.insert("D0001".to_string(), doctor_record("Dr. Janice", "Cardiology"));
    let schedules = vec![sample_schedule(1), sample_schedule(2)];
    let appointments = vec![sample_appointment(1, 1, 1), sample_appointment(2, 1, 2)];

    store.save(&users).await.unwrap();
    store.save(&schedules).await.unwrap();
    store.save(&appointments).await.unwrap();

    assert_eq!(store.load::<UserMap>().await.unwrap(), users);
    assert_eq!(store.load::<Vec<Schedule>>().await.unwrap(), schedules);
    assert_eq!(store.load::<Vec<Appointment>>().await.unwrap(), appointments);
}

#[tokio::test]
async fn persisted_status_strings_match_the_documented_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path());

    let mut appointment = sample_appointment(1, 1, 1);
    appointment.status = AppointmentStatus::InProgress;
    store.save(&vec![appointment]).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("appointments.json")).unwrap();
    assert!(raw.contains("\"In Progress\""));
}

#[tokio::test]
async fn malformed_file_loads_as_empty_with_recovery_on_save() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("schedules.json"), "{not json").unwrap();
    let store = JsonStore::open(dir.path());

    let schedules: Vec<Schedule> = store.load().await.unwrap();
    assert!(schedules.is_empty());

    store.save(&vec![sample_schedule(1)]).await.unwrap();
    let reloaded: Vec<Schedule> = store.load().await.unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[tokio::test]
async fn mutate_persists_only_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path());
    store.save(&vec![sample_schedule(1)]).await.unwrap();

    let rejected: Result<(), &str> = store
        .mutate(|schedules: &mut Vec<Schedule>| {
            schedules.clear();
            Err("rejected")
        })
        .await
        .unwrap();
    assert!(rejected.is_err());
    assert_eq!(store.load::<Vec<Schedule>>().await.unwrap().len(), 1);

    let accepted: Result<u64, &str> = store
        .mutate(|schedules: &mut Vec<Schedule>| {
            schedules.push(sample_schedule(2));
            Ok(2)
        })
        .await
        .unwrap();
    assert_eq!(accepted.unwrap(), 2);
    assert_eq!(store.load::<Vec<Schedule>>().await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_mutations_are_serialized_per_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonStore::open(dir.path()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .mutate(|schedules: &mut Vec<Schedule>| {
                    let id = schedules.iter().map(|s| s.id).max().unwrap_or(0) + 1;
                    schedules.push(sample_schedule(id));
                    Ok::<_, ()>(id)
                })
                .await
                .unwrap()
                .unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());

    let schedules: Vec<Schedule> = store.load().await.unwrap();
    assert_eq!(schedules.len(), 8);
}

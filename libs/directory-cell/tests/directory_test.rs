use std::sync::Arc;

use assert_matches::assert_matches;
use tempfile::TempDir;

use directory_cell::{DirectoryError, DirectoryService, NewUser, UpdateUser, UserFilter};
use shared_database::JsonStore;
use shared_models::Role;

fn service() -> (TempDir, DirectoryService) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonStore::open(dir.path()));
    (dir, DirectoryService::new(store))
}

fn new_user(name: &str, role: Role, specialization: Option<&str>) -> NewUser {
    NewUser {
        password: "pw".to_string(),
        name: name.to_string(),
        role,
        specialization: specialization.map(str::to_string),
    }
}

#[tokio::test]
async fn usernames_are_generated_per_role() {
    let (_dir, directory) = service();

    let first_doctor = directory
        .add_user(new_user("Dr. Janice", Role::Doctor, Some("Cardiology")))
        .await
        .unwrap();
    let first_patient = directory
        .add_user(new_user("Alice", Role::Patient, None))
        .await
        .unwrap();
    let second_doctor = directory
        .add_user(new_user("Dr. Peter", Role::Doctor, None))
        .await
        .unwrap();
    let admin = directory
        .add_user(new_user("Root", Role::Admin, None))
        .await
        .unwrap();

    // Counters are independent per role.
    assert_eq!(first_doctor, "D0001");
    assert_eq!(second_doctor, "D0002");
    assert_eq!(first_patient, "P0001");
    assert_eq!(admin, "1");
}

#[tokio::test]
async fn doctor_specialization_defaults_to_general() {
    let (_dir, directory) = service();

    let username = directory
        .add_user(new_user("Dr. Peter", Role::Doctor, None))
        .await
        .unwrap();
    let record = directory.get_user(&username).await.unwrap();

    assert_eq!(record.specialization.as_deref(), Some("General"));
    assert_eq!(record.doctor_number.as_deref(), Some("D0001"));
    assert_eq!(record.admin_number, None);
}

#[tokio::test]
async fn count_based_numbering_collides_after_a_delete() {
    let (_dir, directory) = service();

    directory
        .add_user(new_user("Dr. A", Role::Doctor, None))
        .await
        .unwrap();
    directory
        .add_user(new_user("Dr. B", Role::Doctor, None))
        .await
        .unwrap();
    directory.delete_user("D0001").await.unwrap();

    // One doctor left, so the generator proposes D0002 again and refuses to
    // overwrite the survivor.
    let err = directory
        .add_user(new_user("Dr. C", Role::Doctor, None))
        .await
        .unwrap_err();
    assert_matches!(err, DirectoryError::AlreadyExists(username) if username == "D0002");
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let (_dir, directory) = service();

    let username = directory
        .add_user(new_user("Dr. Janice", Role::Doctor, Some("Cardiology")))
        .await
        .unwrap();
    directory
        .update_user(
            &username,
            UpdateUser {
                name: Some("Dr. Janice Wong".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let record = directory.get_user(&username).await.unwrap();
    assert_eq!(record.name, "Dr. Janice Wong");
    assert_eq!(record.password, "pw");
    assert_eq!(record.specialization.as_deref(), Some("Cardiology"));
}

#[tokio::test]
async fn missing_users_surface_not_found() {
    let (_dir, directory) = service();

    assert_matches!(
        directory.get_user("P9999").await,
        Err(DirectoryError::NotFound(_))
    );
    assert_matches!(
        directory.delete_user("P9999").await,
        Err(DirectoryError::NotFound(_))
    );
    assert_matches!(
        directory
            .update_user("P9999", UpdateUser::default())
            .await,
        Err(DirectoryError::NotFound(_))
    );
}

#[tokio::test]
async fn search_is_exact_match() {
    let (_dir, directory) = service();

    directory
        .add_user(new_user("Dr. Janice", Role::Doctor, Some("Cardiology")))
        .await
        .unwrap();
    directory
        .add_user(new_user("Dr. Peter", Role::Doctor, Some("Neurology")))
        .await
        .unwrap();
    directory
        .add_user(new_user("Alice", Role::Patient, None))
        .await
        .unwrap();

    let cardiologists = directory
        .search_users(UserFilter {
            role: Some(Role::Doctor),
            specialization: Some("Cardiology".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cardiologists.len(), 1);
    assert_eq!(cardiologists[0].0, "D0001");

    // Substring matching is a schedule-search behavior, not a user-search one.
    let partial = directory
        .search_users(UserFilter {
            specialization: Some("Cardio".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(partial.is_empty());

    let everyone = directory.search_users(UserFilter::default()).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn list_users_filters_by_role() {
    let (_dir, directory) = service();

    directory
        .add_user(new_user("Dr. Janice", Role::Doctor, None))
        .await
        .unwrap();
    directory
        .add_user(new_user("Alice", Role::Patient, None))
        .await
        .unwrap();

    let doctors = directory.list_users(Some(Role::Doctor)).await.unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].1.name, "Dr. Janice");

    let all = directory.list_users(None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn credentials_must_match_password_and_role() {
    let (_dir, directory) = service();

    let username = directory
        .add_user(new_user("Alice", Role::Patient, None))
        .await
        .unwrap();

    let record = directory
        .verify_credentials(&username, "pw", Role::Patient)
        .await
        .unwrap();
    assert_eq!(record.name, "Alice");

    assert_matches!(
        directory.verify_credentials(&username, "wrong", Role::Patient).await,
        Err(DirectoryError::InvalidCredentials)
    );
    assert_matches!(
        directory.verify_credentials(&username, "pw", Role::Doctor).await,
        Err(DirectoryError::InvalidCredentials)
    );
    assert_matches!(
        directory.verify_credentials("ghost", "pw", Role::Patient).await,
        Err(DirectoryError::InvalidCredentials)
    );
}

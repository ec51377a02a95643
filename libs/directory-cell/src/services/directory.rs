use std::sync::Arc;

use tracing::debug;

use shared_database::JsonStore;
use shared_models::{Role, UserMap, UserRecord};

use crate::error::DirectoryError;
use crate::models::{NewUser, UpdateUser, UserFilter};

pub struct DirectoryService {
    store: Arc<JsonStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Register a user under a freshly generated role-scoped username:
    /// `D0001`-style for doctors, `P0001`-style for patients, a plain counter
    /// for admins. The count is per role, but the username must be unique
    /// across the whole directory.
    pub async fn add_user(&self, new_user: NewUser) -> Result<String, DirectoryError> {
        debug!(role = %new_user.role, "adding user to directory");

        self.store
            .mutate(move |users: &mut UserMap| {
                let count = users.values().filter(|u| u.role == new_user.role).count();
                let username = match new_user.role {
                    Role::Admin => (count + 1).to_string(),
                    Role::Doctor => format!("D{:04}", count + 1),
                    Role::Patient => format!("P{:04}", count + 1),
                };
                if users.contains_key(&username) {
                    return Err(DirectoryError::AlreadyExists(username));
                }

                let mut record = UserRecord {
                    password: new_user.password,
                    role: new_user.role,
                    name: new_user.name,
                    specialization: None,
                    admin_number: None,
                    doctor_number: None,
                    patient_number: None,
                };
                match new_user.role {
                    Role::Admin => record.admin_number = Some(username.clone()),
                    Role::Doctor => {
                        record.doctor_number = Some(username.clone());
                        record.specialization = Some(
                            new_user
                                .specialization
                                .unwrap_or_else(|| "General".to_string()),
                        );
                    }
                    Role::Patient => record.patient_number = Some(username.clone()),
                }

                users.insert(username.clone(), record);
                Ok(username)
            })
            .await?
    }

    pub async fn get_user(&self, username: &str) -> Result<UserRecord, DirectoryError> {
        let users: UserMap = self.store.load().await?;
        users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
    }

    /// Apply the fields present in `changes`; everything else is left as is.
    pub async fn update_user(
        &self,
        username: &str,
        changes: UpdateUser,
    ) -> Result<(), DirectoryError> {
        debug!(username, "updating user");

        self.store
            .mutate(move |users: &mut UserMap| {
                let record = users
                    .get_mut(username)
                    .ok_or_else(|| DirectoryError::NotFound(username.to_string()))?;
                if let Some(password) = changes.password {
                    record.password = password;
                }
                if let Some(name) = changes.name {
                    record.name = name;
                }
                if let Some(specialization) = changes.specialization {
                    record.specialization = Some(specialization);
                }
                Ok(())
            })
            .await?
    }

    /// Remove a user. Schedules and appointments that reference the username
    /// are left untouched; reads that join against the directory skip them.
    pub async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        debug!(username, "deleting user");

        self.store
            .mutate(move |users: &mut UserMap| {
                users
                    .remove(username)
                    .map(|_| ())
                    .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
            })
            .await?
    }

    /// Exact-equality search over directory records.
    pub async fn search_users(
        &self,
        filter: UserFilter,
    ) -> Result<Vec<(String, UserRecord)>, DirectoryError> {
        let users: UserMap = self.store.load().await?;
        Ok(users
            .into_iter()
            .filter(|(_, record)| {
                filter.role.map_or(true, |role| record.role == role)
                    && filter
                        .name
                        .as_ref()
                        .map_or(true, |name| record.name == *name)
                    && filter
                        .specialization
                        .as_ref()
                        .map_or(true, |s| record.specialization.as_deref() == Some(s.as_str()))
            })
            .collect())
    }

    /// All users, optionally narrowed to one role.
    pub async fn list_users(
        &self,
        role: Option<Role>,
    ) -> Result<Vec<(String, UserRecord)>, DirectoryError> {
        let users: UserMap = self.store.load().await?;
        Ok(users
            .into_iter()
            .filter(|(_, record)| role.map_or(true, |role| record.role == role))
            .collect())
    }

    /// Plain credential check: username, password and role must all match.
    /// Failures are deliberately indistinguishable.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserRecord, DirectoryError> {
        let users: UserMap = self.store.load().await?;
        users
            .get(username)
            .filter(|record| record.password == password && record.role == role)
            .cloned()
            .ok_or(DirectoryError::InvalidCredentials)
    }
}

//! Whole-document JSON persistence for the three clinic collections.
//!
//! Every operation reads or rewrites an entire collection file; there is no
//! caching and no partial update. A missing file is an empty collection, and
//! a malformed file is treated as empty with a warning so that bad data never
//! takes the caller down. Read-modify-write cycles go through [`JsonStore::mutate`],
//! which serializes writers per collection.

use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::{Appointment, Schedule, UserMap};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Users,
    Schedules,
    Appointments,
}

/// A persisted collection shape: the keyed user map or one of the ordered
/// record lists.
pub trait Collection: Serialize + DeserializeOwned + Default + Send {
    const FILE_NAME: &'static str;
    const KIND: CollectionKind;
}

impl Collection for UserMap {
    const FILE_NAME: &'static str = "users.json";
    const KIND: CollectionKind = CollectionKind::Users;
}

impl Collection for Vec<Schedule> {
    const FILE_NAME: &'static str = "schedules.json";
    const KIND: CollectionKind = CollectionKind::Schedules;
}

impl Collection for Vec<Appointment> {
    const FILE_NAME: &'static str = "appointments.json";
    const KIND: CollectionKind = CollectionKind::Appointments;
}

#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    users_gate: Mutex<()>,
    schedules_gate: Mutex<()>,
    appointments_gate: Mutex<()>,
}

impl JsonStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::open(config.data_dir.clone())
    }

    /// Open a store rooted at an explicit directory. Files are created lazily
    /// on first save.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            users_gate: Mutex::new(()),
            schedules_gate: Mutex::new(()),
            appointments_gate: Mutex::new(()),
        }
    }

    /// Read a whole collection.
    pub async fn load<C: Collection>(&self) -> Result<C, StoreError> {
        let _gate = self.gate(C::KIND).lock().await;
        self.read_file().await
    }

    /// Replace a whole collection.
    pub async fn save<C: Collection>(&self, data: &C) -> Result<(), StoreError> {
        let _gate = self.gate(C::KIND).lock().await;
        self.write_file(data).await
    }

    /// Load-mutate-save under the collection's writer gate. The mutation's
    /// `Err` aborts the cycle without touching the file, so a rejected
    /// operation leaves no partial write behind.
    pub async fn mutate<C, T, E, F>(&self, apply: F) -> Result<Result<T, E>, StoreError>
    where
        C: Collection,
        F: FnOnce(&mut C) -> Result<T, E>,
    {
        let _gate = self.gate(C::KIND).lock().await;
        let mut data = self.read_file::<C>().await?;
        match apply(&mut data) {
            Ok(value) => {
                self.write_file(&data).await?;
                Ok(Ok(value))
            }
            Err(rejected) => Ok(Err(rejected)),
        }
    }

    fn gate(&self, kind: CollectionKind) -> &Mutex<()> {
        match kind {
            CollectionKind::Users => &self.users_gate,
            CollectionKind::Schedules => &self.schedules_gate,
            CollectionKind::Appointments => &self.appointments_gate,
        }
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    async fn read_file<C: Collection>(&self) -> Result<C, StoreError> {
        let path = self.path_for(C::FILE_NAME);
        debug!(path = %path.display(), "loading collection");

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing, starting empty");
                return Ok(C::default());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        match serde_json::from_slice(&bytes) {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!(path = %path.display(), %err, "collection file is malformed, treating as empty");
                Ok(C::default())
            }
        }
    }

    async fn write_file<C: Collection>(&self, data: &C) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })?;

        let bytes = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Encode {
            collection: C::FILE_NAME,
            source,
        })?;

        // Write to a sibling temp file and rename over the target, so a
        // concurrent reader never observes a torn document.
        let path = self.path_for(C::FILE_NAME);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io { path, source })?;

        debug!(path = %self.path_for(C::FILE_NAME).display(), bytes = bytes.len(), "collection saved");
        Ok(())
    }
}

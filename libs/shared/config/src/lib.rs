use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("CLINIC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                warn!("CLINIC_DATA_DIR not set, using ./database");
                PathBuf::from("./database")
            });

        Self { data_dir }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

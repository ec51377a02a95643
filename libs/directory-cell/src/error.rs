use thiserror::Error;

use shared_database::StoreError;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("user {0} not found")]
    NotFound(String),

    #[error("username {0} already exists")]
    AlreadyExists(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

use serde::{Deserialize, Serialize};

use shared_models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub password: String,
    pub name: String,
    pub role: Role,
    /// Doctors only; defaults to "General" when absent. Ignored for other
    /// roles.
    pub specialization: Option<String>,
}

/// Partial profile update. Role and the generated numbers are structural and
/// cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub password: Option<String>,
    pub name: Option<String>,
    pub specialization: Option<String>,
}

/// Exact-equality search criteria; empty criteria match every user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub name: Option<String>,
    pub specialization: Option<String>,
}

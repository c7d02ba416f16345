//! Admin user profile returned by the login endpoint.

use serde::{Deserialize, Serialize};

use super::id::AdminUserId;

/// The operator a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdminUserId>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AdminProfile {
    /// Profile with only a username, as older tokens carry.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
        }
    }
}

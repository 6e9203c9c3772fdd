//! Caller identity plumbing.
//!
//! Authentication itself happens upstream: an external identity provider
//! (fronted by the API gateway) verifies the session and forwards the user
//! id, display name, and role as trusted headers. This module only parses
//! that contract.

mod extractor;

pub use extractor::AuthenticatedUser;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role assigned by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Owns and edits adjustment jobs.
    Engineer,
    /// Reads fleet-wide dashboards and assembles reports.
    Supervisor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineer => "engineer",
            Self::Supervisor => "supervisor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "engineer" => Some(Self::Engineer),
            "supervisor" => Some(Self::Supervisor),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verified caller identity as forwarded by the gateway.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
}

impl Identity {
    pub fn is_supervisor(&self) -> bool {
        self.role == UserRole::Supervisor
    }
}

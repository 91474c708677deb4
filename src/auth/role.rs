use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// API credential roles.
///
/// Each platform capability is gated by exactly one of them, and each role
/// owns its own OAuth2 client-credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Auth,
    Events,
    Workbench,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Auth, Role::Events, Role::Workbench];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Auth => "auth",
            Role::Events => "events",
            Role::Workbench => "workbench",
        }
    }

    /// Position in enum-indexed tables.
    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Auth => 0,
            Role::Events => 1,
            Role::Workbench => 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auth" => Ok(Role::Auth),
            "events" => Ok(Role::Events),
            "workbench" => Ok(Role::Workbench),
            other => Err(ClientError::Configuration(format!("invalid role: '{}'", other))),
        }
    }
}

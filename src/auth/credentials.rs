use std::fmt;

use base64::Engine;

use crate::auth::role::Role;
use crate::error::{ClientError, Result};

/// OAuth2 client id and secret for one role.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    client_id: String,
    client_secret: String,
}

impl CredentialPair {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// `Basic base64(id:secret)` header value.
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
    }
}

// secret stays out of logs
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// One credential pair per role, indexed by [`Role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTable {
    pairs: [CredentialPair; 3],
}

impl CredentialTable {
    pub fn new(auth: CredentialPair, events: CredentialPair, workbench: CredentialPair) -> Self {
        Self {
            pairs: [auth, events, workbench],
        }
    }

    pub fn get(&self, role: Role) -> &CredentialPair {
        &self.pairs[role.index()]
    }

    /// Every role must carry a non-empty id and secret.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<String> = Role::ALL
            .iter()
            .filter_map(|role| {
                let pair = self.get(*role);
                if pair.client_id.trim().is_empty() {
                    Some(format!("credentials.{}.client_id is empty", role))
                } else if pair.client_secret.trim().is_empty() {
                    Some(format!("credentials.{}.client_secret is empty", role))
                } else {
                    None
                }
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Configuration(missing.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CredentialTable {
        CredentialTable::new(
            CredentialPair::new("auth-id", "auth-secret"),
            CredentialPair::new("events-id", "events-secret"),
            CredentialPair::new("workbench-id", "workbench-secret"),
        )
    }

    #[test]
    fn lookup_returns_the_pair_of_that_role() {
        let table = table();
        assert_eq!(table.get(Role::Auth).client_id(), "auth-id");
        assert_eq!(table.get(Role::Events).client_id(), "events-id");
        assert_eq!(table.get(Role::Workbench).client_secret(), "workbench-secret");
    }

    #[test]
    fn basic_header_encodes_id_and_secret() {
        let pair = CredentialPair::new("id", "secret");
        // base64("id:secret")
        assert_eq!(pair.basic_authorization(), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", CredentialPair::new("id", "top-secret"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn empty_secret_fails_validation() {
        let table = CredentialTable::new(
            CredentialPair::new("a", "b"),
            CredentialPair::new("c", ""),
            CredentialPair::new("e", "f"),
        );
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("credentials.events.client_secret"));
        assert!(self::table().validate().is_ok());
    }
}

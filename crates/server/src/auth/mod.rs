//! Authentication collaborator and authorization gate.
//!
//! The core never parses credentials itself: an [`Authenticator`] turns a
//! bearer token into a role-bearing [`Identity`] (or nothing), and the
//! [`gate`] module decides whether that identity may perform an operation.

pub mod gate;

use std::collections::HashMap;

use async_trait::async_trait;

use sweet_shop_core::Role;

/// An authenticated caller. Role is the only attribute the core consumes;
/// `subject` exists for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
}

/// External collaborator that validates a caller's credential.
///
/// Returns `None` for missing or invalid credentials; the gate turns that
/// into `Unauthenticated` on role-gated operations.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Option<Identity>;
}

/// Authenticator backed by a static token table from configuration.
///
/// Stands in for a real identity provider; the rest of the system only
/// sees the [`Authenticator`] interface.
#[derive(Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuthenticator {
    /// Build from `(subject, token, role)` entries.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, String, Role)>) -> Self {
        let tokens = entries
            .into_iter()
            .map(|(subject, token, role)| (token, Identity { subject, role }))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).cloned()
    }
}

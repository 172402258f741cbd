use std::fmt;
use std::sync::RwLock;

use tracing::{debug, warn};

use super::errors::ApiError;

/// Source of the bearer token sent to the portal API
///
/// The session store lives outside this crate; callers inject whatever holds
/// the token, and the client asks it to forget the token when the API rejects
/// it.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Current bearer token, if any
    fn bearer_token(&self) -> Option<String>;

    /// Drop the stored session state
    fn clear(&self);
}

/// Credential provider holding a single token in memory
#[derive(Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    /// Create a provider with the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Create a provider without a token
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.bearer_token().is_some();
        f.debug_struct("StaticCredentials")
            .field("token_present", &present)
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn clear(&self) {
        match self.token.write() {
            Ok(mut token) => *token = None,
            Err(e) => warn!("Credential store lock poisoned: {}", e),
        }
    }
}

/// Clear the session when an error indicates rejected credentials
///
/// Returns whether the credentials were cleared.
pub fn clear_on_auth_failure(credentials: &dyn CredentialProvider, error: &ApiError) -> bool {
    if error.is_auth_failure() {
        debug!("Clearing credentials after authentication failure: {}", error);
        credentials.clear();
        true
    } else {
        false
    }
}

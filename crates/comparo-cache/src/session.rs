//! Anonymous tracking session identifiers.

use serde::{Deserialize, Serialize};

/// Prefix on every generated tracking session id.
const SESSION_PREFIX: &str = "aff_";

/// Anonymous identifier tying affiliate clicks from one visitor together.
///
/// Carries no personal data; it is random and lives only in client storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingSessionId(String);

impl TrackingSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session id.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("{SESSION_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a `Set-Cookie` value carrying this id.
    pub fn to_cookie(&self, name: &str, max_age_secs: u64) -> String {
        format!(
            "{name}={}; Max-Age={max_age_secs}; Path=/; SameSite=Lax",
            self.0
        )
    }
}

impl std::fmt::Display for TrackingSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TrackingSessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TrackingSessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

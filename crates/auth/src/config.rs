use serde::{Serialize, Serializer};
use url::Url;

use crate::error::AuthError;

/// Credentials for the hosted identity and document provider.
///
/// The API key is redacted in both `Debug` and serialized output.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct FirebaseConfig {
    #[serde(serialize_with = "redact")]
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub app_id: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub hosting_url: Option<Url>,
}

impl FirebaseConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FIREBASE_API_KEY`: Web API key (required)
    /// - `FIREBASE_AUTH_DOMAIN`: Auth domain, e.g. `my-app.firebaseapp.com` (required)
    /// - `FIREBASE_PROJECT_ID`: Project identifier (required)
    /// - `FIREBASE_APP_ID`: Registered web app identifier (required)
    /// - `FIREBASE_STORAGE_BUCKET`: Storage bucket (optional)
    /// - `FIREBASE_MESSAGING_SENDER_ID`: Messaging sender ID (optional)
    /// - `FIREBASE_HOSTING_URL`: Public hosting URL (optional, must be a valid URL)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if a required variable is missing or empty,
    /// or if `FIREBASE_HOSTING_URL` does not parse.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Same rules as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| AuthError::Config(format!("{key} is not set")))
        };

        let hosting_url = match optional("FIREBASE_HOSTING_URL") {
            Some(raw) => Some(raw.parse::<Url>().map_err(|e| {
                AuthError::Config(format!("FIREBASE_HOSTING_URL is not a valid URL: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            api_key: required("FIREBASE_API_KEY")?,
            auth_domain: required("FIREBASE_AUTH_DOMAIN")?,
            project_id: required("FIREBASE_PROJECT_ID")?,
            app_id: required("FIREBASE_APP_ID")?,
            storage_bucket: optional("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: optional("FIREBASE_MESSAGING_SENDER_ID"),
            hosting_url,
        })
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"<redacted>")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("app_id", &self.app_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("hosting_url", &self.hosting_url)
            .finish()
    }
}

fn redact<T, S: Serializer>(_: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("<redacted>")
}

use thiserror::Error;

/// Auth errors for the dopamine_auth crate.
///
/// This wraps the core `AuthError` and adds the startup-time configuration
/// failures that the functional core knows nothing about.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (provider calls, route config)
    #[error(transparent)]
    Core(#[from] dopamine_core::auth::AuthError),

    /// Missing or malformed provider configuration
    #[error("configuration error: {0}")]
    Config(String),
}

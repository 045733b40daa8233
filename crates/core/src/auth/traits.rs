use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{AuthError, Principal};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Stream of auth state notifications.
///
/// The provider delivers the current state first, then every change after it.
/// `None` means nobody is signed in.
pub type AuthChanges = mpsc::UnboundedReceiver<Option<Principal>>;

/// Abstraction over the hosted identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the interactive sign-in flow and return the signed-in principal.
    async fn sign_in(&self) -> Result<Principal>;

    /// End the current provider session.
    async fn sign_out(&self) -> Result<()>;

    /// Register a listener for auth state changes.
    ///
    /// Every call registers a new listener on the provider side, so callers
    /// that want a single standing subscription must deduplicate themselves.
    async fn subscribe(&self) -> Result<AuthChanges>;
}

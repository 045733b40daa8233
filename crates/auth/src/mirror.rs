//! Process-wide mirror of the identity provider's auth state.
//!
//! The mirror owns the only copy of [`AuthSnapshot`]. Writers are limited to
//! the subscription listener and the two actions, `sign_in` and `sign_out`.
//! Everything else reads snapshots or watches for changes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use dopamine_core::auth::{
    AuthChanges, AuthError as CoreError, AuthSnapshot, IdentityProvider, Principal,
};
use tokio::sync::{watch, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Shared handle to the mirrored auth state.
///
/// Cloning is cheap and every clone observes the same state and shares the
/// same provider subscription.
#[derive(Clone)]
pub struct AuthMirror {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<AuthSnapshot>,
    /// Filled once the first provider notification has been applied.
    ready: OnceCell<()>,
    /// Actions currently holding the loading flag. Only touched while the
    /// state's write lock is held.
    actions: AtomicUsize,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl AuthMirror {
    /// Creates a mirror in its start-of-process state: no principal, loading,
    /// not initialized. Nothing is subscribed until [`Self::initialize`].
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());

        Self {
            inner: Arc::new(Inner {
                provider,
                state,
                ready: OnceCell::new(),
                actions: AtomicUsize::new(0),
                listener: Mutex::new(None),
            }),
        }
    }

    /// Subscribes to the provider and waits for its first notification.
    ///
    /// Idempotent. Concurrent callers share one in-flight subscription; once
    /// initialized, calls return the current principal without touching the
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider refuses the subscription or closes it
    /// before delivering a state. The mirror stays uninitialized and a later
    /// call subscribes again.
    pub async fn initialize(&self) -> Result<Option<Principal>, AuthError> {
        self.inner
            .ready
            .get_or_try_init(|| self.subscribe_once())
            .await?;

        Ok(self.principal())
    }

    /// Starts [`Self::initialize`] in the background and returns immediately.
    ///
    /// Meant for callers that only poll the initialized flag, such as
    /// [`crate::RouteGuard::check`]. Safe to call repeatedly; the provider is
    /// still subscribed once. Failures are logged and leave the mirror
    /// uninitialized. Must be called from within a tokio runtime.
    pub fn start(&self) {
        if self.is_initialized() {
            return;
        }

        let mirror = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mirror.initialize().await {
                warn!(error = %e, "Background auth initialization failed");
            }
        });
    }

    async fn subscribe_once(&self) -> Result<(), AuthError> {
        debug!("Subscribing to auth state changes");

        let mut changes = self.inner.provider.subscribe().await?;
        let first = changes.recv().await.ok_or(CoreError::SubscriptionClosed)?;

        info!(
            authenticated = first.is_some(),
            uid = first.as_ref().map(|p| p.uid.as_str()),
            "Auth state initialized"
        );

        let actions = &self.inner.actions;
        self.inner.state.send_modify(|s| {
            s.principal = first;
            // An action that is still running keeps the flag until it exits
            s.is_loading = actions.load(Ordering::Relaxed) > 0;
            s.initialized = true;
        });

        let handle = tokio::spawn(listen(Arc::downgrade(&self.inner), changes));
        *self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Ok(())
    }

    /// Runs the provider's interactive sign-in.
    ///
    /// Returns `false` on failure and records the message in `last_error`.
    /// The loading flag is released on every exit path, including the future
    /// being dropped before completion.
    pub async fn sign_in(&self) -> bool {
        let _loading = LoadingScope::begin(&self.inner);

        match self.inner.provider.sign_in().await {
            Ok(principal) => {
                info!(uid = %principal.uid, "Signed in");
                self.inner
                    .state
                    .send_modify(|s| s.principal = Some(principal));
                true
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                self.record_error(e);
                false
            }
        }
    }

    /// Ends the provider session. Same contract as [`Self::sign_in`].
    pub async fn sign_out(&self) -> bool {
        let _loading = LoadingScope::begin(&self.inner);

        match self.inner.provider.sign_out().await {
            Ok(()) => {
                info!("Signed out");
                self.inner.state.send_modify(|s| s.principal = None);
                true
            }
            Err(e) => {
                warn!(error = %e, "Sign-out failed");
                self.record_error(e);
                false
            }
        }
    }

    fn record_error(&self, error: CoreError) {
        self.inner
            .state
            .send_modify(|s| s.last_error = Some(error.to_string()));
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that wakes on every state change.
    pub fn watch(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.inner.state.borrow().principal.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().initialized
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.borrow().last_error.clone()
    }
}

impl std::fmt::Debug for AuthMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthMirror")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Applies provider notifications after the first one until the provider
/// closes the stream or the mirror is dropped.
async fn listen(inner: Weak<Inner>, mut changes: AuthChanges) {
    while let Some(principal) = changes.recv().await {
        let Some(mirror) = inner.upgrade() else {
            return;
        };

        debug!(authenticated = principal.is_some(), "Auth state changed");
        mirror.state.send_modify(|s| s.principal = principal);
    }

    warn!("Auth change stream closed by provider");
}

/// Holds `is_loading` up for the duration of an action.
///
/// The flag drops when the last overlapping action exits, whether or not the
/// first provider notification has arrived.
struct LoadingScope<'a> {
    inner: &'a Inner,
}

impl<'a> LoadingScope<'a> {
    fn begin(inner: &'a Inner) -> Self {
        inner.state.send_modify(|s| {
            inner.actions.fetch_add(1, Ordering::Relaxed);
            s.is_loading = true;
            s.last_error = None;
        });
        Self { inner }
    }
}

impl Drop for LoadingScope<'_> {
    fn drop(&mut self) {
        let actions = &self.inner.actions;
        self.inner.state.send_modify(|s| {
            let remaining = actions.fetch_sub(1, Ordering::Relaxed) - 1;
            s.is_loading = remaining > 0;
        });
    }
}

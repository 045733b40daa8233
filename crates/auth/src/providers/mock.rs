//! Mock identity provider for development and testing.
//!
//! Behaves like the hosted provider's client SDK as far as the mirror can
//! tell: every subscriber gets the current state first and every change after,
//! and a successful sign-in or sign-out is broadcast to all subscribers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dopamine_core::auth::{AuthChanges, AuthError, IdentityProvider, Principal, Result};
use tokio::sync::{mpsc, Semaphore};

type Listener = mpsc::UnboundedSender<Option<Principal>>;

/// Scriptable in-process identity provider.
#[derive(Debug, Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    current: Option<Principal>,
    listeners: Vec<Listener>,
    /// Subscribers still waiting on their first notification.
    held: Vec<Listener>,
    holding_initial: bool,
    subscriptions: usize,
    sign_in_as: VecDeque<Principal>,
    sign_in_failures: VecDeque<String>,
    sign_out_failures: VecDeque<String>,
    sign_in_gate: Option<Arc<Semaphore>>,
}

impl MockProvider {
    /// Provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with a cached session for `principal`.
    pub fn signed_in(principal: Principal) -> Self {
        let provider = Self::new();
        provider.lock().current = Some(principal);
        provider
    }

    /// Delay the first notification to new subscribers until
    /// [`Self::release_initial_state`] is called.
    pub fn hold_initial_state(&self) {
        self.lock().holding_initial = true;
    }

    /// Deliver the current state to every subscriber that is still waiting.
    pub fn release_initial_state(&self) {
        let mut state = self.lock();
        state.holding_initial = false;

        let current = state.current.clone();
        let held = std::mem::take(&mut state.held);
        for listener in held {
            if listener.send(current.clone()).is_ok() {
                state.listeners.push(listener);
            }
        }
    }

    /// Principal returned by the next successful sign-in.
    ///
    /// Without a queued principal, sign-in generates a fresh mock user.
    pub fn queue_sign_in_as(&self, principal: Principal) {
        self.lock().sign_in_as.push_back(principal);
    }

    /// Make the next sign-in fail with `message`.
    pub fn fail_next_sign_in(&self, message: impl Into<String>) {
        self.lock().sign_in_failures.push_back(message.into());
    }

    /// Make the next sign-out fail with `message`.
    pub fn fail_next_sign_out(&self, message: impl Into<String>) {
        self.lock().sign_out_failures.push_back(message.into());
    }

    /// Block sign-in calls until [`Self::release_sign_in`] hands out permits.
    pub fn hold_sign_in(&self) {
        self.lock().sign_in_gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `count` blocked sign-in calls proceed.
    pub fn release_sign_in(&self, count: usize) {
        if let Some(gate) = &self.lock().sign_in_gate {
            gate.add_permits(count);
        }
    }

    /// Push a state change to every subscriber, as if it happened elsewhere
    /// (token expiry, sign-out in another tab).
    pub fn emit(&self, principal: Option<Principal>) {
        let mut state = self.lock();
        state.current = principal;
        state.broadcast();
    }

    /// Drop every listener, closing their change streams.
    ///
    /// Also stops holding the initial state, so later subscribers are answered
    /// right away.
    pub fn close_subscriptions(&self) {
        let mut state = self.lock();
        state.holding_initial = false;
        state.listeners.clear();
        state.held.clear();
    }

    /// Total number of `subscribe` calls ever made.
    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions
    }

    /// Subscribers whose receiving end is still alive.
    pub fn live_subscriber_count(&self) -> usize {
        let state = self.lock();
        state
            .listeners
            .iter()
            .chain(state.held.iter())
            .filter(|l| !l.is_closed())
            .count()
    }

    pub fn current(&self) -> Option<Principal> {
        self.lock().current.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockState {
    fn broadcast(&mut self) {
        let current = self.current.clone();
        self.listeners
            .retain(|listener| listener.send(current.clone()).is_ok());
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn sign_in(&self) -> Result<Principal> {
        let gate = self.lock().sign_in_gate.clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| AuthError::SignIn(e.to_string()))?;
            permit.forget();
        }

        let mut state = self.lock();
        if let Some(message) = state.sign_in_failures.pop_front() {
            return Err(AuthError::SignIn(message));
        }

        let principal = state.sign_in_as.pop_front().unwrap_or_else(|| {
            let id = uuid::Uuid::new_v4();
            Principal::new(format!("mock-{id}"))
                .with_email(format!("{id}@mock.local"))
                .with_display_name("Mock User")
        });

        state.current = Some(principal.clone());
        state.broadcast();
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.lock();
        if let Some(message) = state.sign_out_failures.pop_front() {
            return Err(AuthError::SignOut(message));
        }

        state.current = None;
        state.broadcast();
        Ok(())
    }

    async fn subscribe(&self) -> Result<AuthChanges> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.subscriptions += 1;

        if state.holding_initial {
            state.held.push(tx);
        } else {
            // Receiver is alive, send cannot fail
            let _ = tx.send(state.current.clone());
            state.listeners.push(tx);
        }

        Ok(rx)
    }
}

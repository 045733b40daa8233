//! Auth state mirror and route guard for dopamine.
//!
//! This crate provides:
//! - `AuthMirror`: a single process-wide mirror of the identity provider's state
//! - `RouteGuard`: the readiness-gated navigation check
//! - `FirebaseConfig`: provider credentials loaded from the environment
//! - `MockProvider` (feature `mock`): an in-process stand-in for the provider

mod config;
mod error;
mod guard;
mod mirror;
mod providers;

pub use config::FirebaseConfig;
pub use error::AuthError;
pub use guard::RouteGuard;
pub use mirror::AuthMirror;
#[cfg(any(test, feature = "mock"))]
pub use providers::MockProvider;

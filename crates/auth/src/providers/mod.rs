//! Identity provider implementations.
//!
//! The hosted provider is reached through its own client SDK; this crate only
//! ships the in-process mock used for development and tests.

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockProvider;

//! Functional core for the dopamine auth gate.
//!
//! Everything in this crate is pure or trait-only: the mirrored auth snapshot,
//! the identity provider seam and the routing decision. The async shell that
//! owns the live state lives in `dopamine_auth`.

pub mod auth;
pub mod routing;

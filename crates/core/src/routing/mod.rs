//! Route gating decisions.
//!
//! Pure functions only. The async guard in `dopamine_auth` feeds these with a
//! snapshot of the mirrored auth state.

mod config;
mod decision;
mod target;

pub use config::RouteConfig;
pub use decision::{decide, GuardOutcome};
pub use target::{target_path, validate_route_path};

mod error;
mod traits;
mod types;

pub use error::AuthError;
pub use traits::{AuthChanges, IdentityProvider, Result};
pub use types::{AuthSnapshot, Principal};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("sign-in failed: {0}")]
    SignIn(String),

    #[error("sign-out failed: {0}")]
    SignOut(String),

    #[error("failed to subscribe to auth changes: {0}")]
    Subscription(String),

    #[error("auth change stream closed before the first notification")]
    SubscriptionClosed,

    #[error("invalid route configuration: {0}")]
    InvalidRoute(String),
}

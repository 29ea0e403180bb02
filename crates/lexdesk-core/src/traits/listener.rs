//! Login-required signalling.
//!
//! When a session cannot continue, the request protocol tells the embedding
//! application to show a notice and navigate to the login route. How that is
//! presented is up to the [`SessionListener`] implementation.

use std::fmt;

use tracing::warn;

/// Message shown to the user when a session ends unexpectedly.
const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";

/// Why the user has to log in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// A protected call was attempted with no stored access token.
    Unauthenticated,
    /// Refreshing the access token failed and the session was cleared.
    SessionExpired,
}

impl fmt::Display for LoginReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginReason::Unauthenticated => write!(f, "unauthenticated"),
            LoginReason::SessionExpired => write!(f, "session expired"),
        }
    }
}

/// Signal that the application must return to the login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequired {
    pub reason: LoginReason,
    /// Route the application should navigate to.
    pub route: String,
}

impl LoginRequired {
    pub fn new(reason: LoginReason, route: impl Into<String>) -> Self {
        Self {
            reason,
            route: route.into(),
        }
    }

    /// The user-visible notice for this event.
    pub fn notice(&self) -> &'static str {
        SESSION_EXPIRED_NOTICE
    }
}

/// Receives login-required signals from a session.
pub trait SessionListener: Send + Sync {
    fn login_required(&self, event: &LoginRequired);
}

/// Listener that only records the event in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SessionListener for TracingListener {
    fn login_required(&self, event: &LoginRequired) {
        warn!(reason = %event.reason, route = %event.route, "{}", event.notice());
    }
}

//! Error types for lexdesk.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, storage and input validation errors.
//!
//! Transport, protocol and decode failures form the "transient" class: the
//! authenticated request protocol passes them through untouched and never
//! retries them. See [`Error::is_transient`].

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Maximum length for error response bodies kept in [`ProtocolError`].
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The unified error type for lexdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (no session, expired session, bad login).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP status from the backend.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A success response whose body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Token storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid URL, resource name).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true for failures the request protocol passes through verbatim:
    /// transport errors, non-success statuses and undecodable bodies.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Protocol(_) | Error::Decode { .. }
        )
    }

    /// Returns true if the backend rejected the request's credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Protocol(err) if err.is_auth_error())
    }

    /// Returns true if this error ends the session and requires a new login.
    pub fn is_login_required(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::Unauthenticated) | Error::Auth(AuthError::SessionExpired)
        )
    }

    /// Returns the HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token is stored; the caller must log in first.
    #[error("not logged in")]
    Unauthenticated,

    /// The refresh attempt failed or no refresh token was stored.
    #[error("session expired")]
    SessionExpired,

    /// The backend rejected the login credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Error body shape used by the backend (`{"detail": ..., "code": ...}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    code: Option<String>,
}

/// Protocol-level errors: the backend answered with a non-success status.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Backend error code (if present).
    pub code: Option<String>,
    /// Error detail from the server, or the truncated raw body.
    pub detail: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, code: Option<String>, detail: Option<String>) -> Self {
        Self {
            status,
            code,
            detail,
        }
    }

    /// Build a protocol error from a status and raw response body.
    ///
    /// A `{"detail", "code"}` body is unpacked; any other non-empty body
    /// (field validation maps, HTML error pages) is kept truncated as the detail.
    pub fn from_body(status: u16, body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
            && (parsed.detail.is_some() || parsed.code.is_some())
        {
            return Self::new(status, parsed.code, parsed.detail);
        }

        let body = body.trim();
        let detail = (!body.is_empty()).then(|| truncate_body(body));
        Self::new(status, None, detail)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }
}

/// Truncate a response body to avoid carrying excessive data in errors.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

/// Token storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored session could not be parsed.
    #[error("corrupt session file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// An access token update arrived while no refresh token is stored.
    #[error("cannot store an access token without a refresh token")]
    MissingRefreshToken,

    /// A lock guarding the in-memory store was poisoned.
    #[error("token store lock poisoned")]
    Poisoned,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid resource name.
    #[error("invalid resource '{value}': {reason}")]
    Resource { value: String, reason: String },

    /// Invalid item id.
    #[error("invalid item id '{value}': {reason}")]
    ItemId { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_unpacks_detail_body() {
        let err = ProtocolError::from_body(
            401,
            r#"{"detail":"Given token not valid for any token type","code":"token_not_valid"}"#,
        );
        assert_eq!(err.status, 401);
        assert_eq!(err.code.as_deref(), Some("token_not_valid"));
        assert!(err.is_auth_error());
        assert_eq!(
            err.to_string(),
            "HTTP 401 [token_not_valid]: Given token not valid for any token type"
        );
    }

    #[test]
    fn protocol_error_keeps_validation_body() {
        let err = ProtocolError::from_body(400, r#"{"title":["This field is required."]}"#);
        assert_eq!(err.code, None);
        assert_eq!(
            err.detail.as_deref(),
            Some(r#"{"title":["This field is required."]}"#)
        );
        assert!(!err.is_auth_error());
    }

    #[test]
    fn protocol_error_empty_body() {
        let err = ProtocolError::from_body(503, "");
        assert_eq!(err.detail, None);
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn protocol_error_truncates_long_body() {
        let body = "é".repeat(400);
        let err = ProtocolError::from_body(500, &body);
        let detail = err.detail.unwrap();
        assert!(detail.contains("truncated, 800 total bytes"));
    }

    #[test]
    fn error_classification() {
        let unauthorized = Error::from(ProtocolError::new(401, None, None));
        assert!(unauthorized.is_unauthorized());
        assert!(unauthorized.is_transient());
        assert_eq!(unauthorized.status(), Some(401));

        let server = Error::from(ProtocolError::new(500, None, None));
        assert!(!server.is_unauthorized());
        assert!(server.is_transient());

        let expired = Error::from(AuthError::SessionExpired);
        assert!(expired.is_login_required());
        assert!(!expired.is_transient());

        let timeout = Error::from(TransportError::Timeout);
        assert!(timeout.is_transient());
        assert_eq!(timeout.status(), None);
    }
}

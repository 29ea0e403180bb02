//! Token endpoint request/response types.

use serde::{Deserialize, Serialize};

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from the login endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response from the refresh endpoint.
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// A collection response: either a bare array or a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paginated { results } => results,
        }
    }
}

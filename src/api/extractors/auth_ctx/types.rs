/*
 * Responsibility
 * - The authenticated context handlers see
 * - The identity middleware resolves it and stores it in request extensions
 */
use serde::Serialize;

/// How the caller was identified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Certificate,
    Cookie,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthCtx {
    pub username: String,
    pub method: AuthMethod,
}

impl AuthCtx {
    pub fn new(username: impl Into<String>, method: AuthMethod) -> Self {
        Self {
            username: username.into(),
            method,
        }
    }
}

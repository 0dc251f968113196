//! Reviewer authentication against the OIDC provider.
//!
//! Resource-owner password grant; the access token lives in memory only and
//! dies with the process. The engine consumes this module solely through
//! `is_authenticated` / `has_role`; everything else is login plumbing.

use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AuthConfig;

/// Errors from login and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Could not reach the auth provider at {0}")]
    Connection(String),

    #[error("Auth request timed out after {0}s")]
    Timeout(u64),

    #[error("Auth provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed access token: {0}")]
    TokenParsing(String),

    #[error("Account lacks the required role: {0}")]
    MissingRole(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Successful token endpoint response. Only the access token matters here;
/// refresh flows are out of scope.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Default)]
struct RoleSet {
    #[serde(default)]
    roles: Vec<String>,
}

/// The JWT payload claims we read: realm roles plus per-client roles.
#[derive(Deserialize, Default)]
struct RoleClaims {
    #[serde(default)]
    realm_access: RoleSet,
    #[serde(default)]
    resource_access: std::collections::HashMap<String, RoleSet>,
}

/// An authenticated token plus the roles extracted from it at login.
struct TokenState {
    access_token: String,
    roles: Vec<String>,
}

/// Reviewer auth session.
pub struct AuthSession {
    config: AuthConfig,
    client: reqwest::blocking::Client,
    state: Mutex<Option<TokenState>>,
}

impl AuthSession {
    pub fn new(config: AuthConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            client,
            state: Mutex::new(None),
        }
    }

    /// Log in with the password grant and hold the token in memory.
    ///
    /// Fails when the provider rejects the credentials, the token cannot be
    /// parsed, or the account lacks the configured reviewer role.
    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let url = format!("{}/token", self.config.base_url.trim_end_matches('/'));
        let form = [
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("username", username),
            ("password", password),
        ];

        let response = self.client.post(&url).form(&form).send().map_err(|e| {
            if e.is_connect() {
                AuthError::Connection(self.config.base_url.clone())
            } else if e.is_timeout() {
                AuthError::Timeout(self.config.timeout_secs)
            } else {
                AuthError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuthError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenParsing(e.to_string()))?;

        let roles = extract_roles(&parsed.access_token, &self.config.client_id)?;
        if !roles.iter().any(|r| r == &self.config.required_role) {
            tracing::warn!(username, "Login refused: required role missing");
            return Err(AuthError::MissingRole(self.config.required_role.clone()));
        }

        tracing::info!(username, "Reviewer logged in");
        *self.lock() = Some(TokenState {
            access_token: parsed.access_token,
            roles,
        });
        Ok(())
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Whether the logged-in account carries the named role.
    pub fn has_role(&self, name: &str) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|s| s.roles.iter().any(|r| r == name))
    }

    /// Drop the in-memory token.
    pub fn logout(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TokenState>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Decode the JWT payload segment and collect realm + client roles.
fn extract_roles(token: &str, client_id: &str) -> Result<Vec<String>, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::TokenParsing("missing payload segment".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::TokenParsing(e.to_string()))?;

    let claims: RoleClaims =
        serde_json::from_slice(&bytes).map_err(|e| AuthError::TokenParsing(e.to_string()))?;

    let mut roles = claims.realm_access.roles;
    if let Some(client) = claims.resource_access.get(client_id) {
        for role in &client.roles {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
    }
    Ok(roles)
}

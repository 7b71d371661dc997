//! Identity provider gateway.
//!
//! The REST implementation talks to the Identity Toolkit endpoints:
//!
//! ```text
//! POST {auth_url}/v1/accounts:signInWithPassword?key=<api_key>
//! POST {auth_url}/v1/accounts:signUp?key=<api_key>
//!   body: {"email": ..., "password": ..., "returnSecureToken": true}
//!   ok:   {"idToken", "email", "refreshToken", "expiresIn", "localId"}
//!   err:  {"error": {"code": 400, "message": "EMAIL_NOT_FOUND", ...}}
//! ```
//!
//! Provider error messages are carried verbatim in [`RemoteError::Auth`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

use orchid_core::{Config, Session, User};

use crate::error::RemoteError;
use crate::retry::RetryPolicy;

/// Sign-in and sign-up against an identity provider.
pub trait AuthGateway {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError>;

    fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract `error.message` from a provider error body.
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

/// REST gateway over `ureq`.
#[derive(Debug, Clone)]
pub struct IdentityToolkitGateway {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl IdentityToolkitGateway {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        agent: ureq::Agent,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            retry,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self::new(
            &config.auth_url,
            config.api_key.clone(),
            agent,
            RetryPolicy::from_config(config),
        )
    }

    fn call(&self, action: &str, email: &str, password: &str) -> Result<Session, RemoteError> {
        let key = self.api_key.as_deref().ok_or(RemoteError::MissingApiKey)?;
        let endpoint = format!("{}/v1/accounts:{action}", self.base_url);
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        tracing::debug!(endpoint = %endpoint, "identity request");
        let response = self
            .retry
            .run(&endpoint, || {
                self.agent
                    .post(&endpoint)
                    .query("key", key)
                    .send_json(&body)
            })
            .map_err(|err| match err {
                RemoteError::Status { body, code, .. } => RemoteError::Auth(
                    provider_message(&body).unwrap_or_else(|| format!("HTTP {code}")),
                ),
                other => other,
            })?;

        let token: TokenResponse = response.into_json().map_err(|e| RemoteError::Decode {
            url: endpoint.clone(),
            source: e,
        })?;
        Ok(Session {
            token: token.id_token,
            user: User {
                uid: token.local_id,
                email: token.email.unwrap_or_else(|| email.to_string()),
                refresh_token: token.refresh_token,
                expires_in: token.expires_in,
                signed_in_at: Some(Utc::now()),
            },
        })
    }
}

impl AuthGateway for IdentityToolkitGateway {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        self.call("signInWithPassword", email, password)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        self.call("signUp", email, password)
    }
}

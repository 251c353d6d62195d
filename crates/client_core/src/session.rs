//! Who is signed in, derived from the persisted bearer token.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use shared::{
    domain::Identity,
    protocol::{Credentials, TokenClaims},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    api::BlogApi,
    pages::{FormError, LoginForm, RegisterForm},
    token_store::TokenStore,
};

pub const REGISTRATION_SUCCEEDED: &str = "Registration successful! Now log in";

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not a claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors a session action reports to the user; `Display` is the message shown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Could not save the session token")]
    TokenNotSaved,
    #[error("Registration failed")]
    RegistrationFailed,
    #[error("{0}")]
    RegistrationRejected(String),
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Reads the claims out of the payload segment without checking the signature.
///
/// Standard and URL-safe alphabets are both accepted, with or without padding.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenDecodeError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenDecodeError::MissingPayload)?;
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn decode_identity(token: &str) -> Result<Identity, TokenDecodeError> {
    decode_claims(token).map(|claims| Identity::new(claims.login))
}

pub struct SessionManager {
    tokens: Arc<dyn TokenStore>,
    identity: Option<Identity>,
}

impl SessionManager {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens,
            identity: None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Rebuilds the identity from the stored token.
    ///
    /// A token that cannot be decoded leaves the user signed out but stays in
    /// storage; the failure is only logged.
    pub fn restore(&mut self) -> Option<&Identity> {
        self.identity = None;
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => {
                warn!("could not read stored token: {err}");
                return None;
            }
        };
        match decode_identity(&token) {
            Ok(identity) => {
                info!(login = %identity.login, "session restored");
                self.identity = Some(identity);
            }
            Err(err) => warn!("ignoring stored token: {err}"),
        }
        self.identity.as_ref()
    }

    /// Exchanges credentials for a token and keeps it.
    ///
    /// The identity comes from the submitted login, not from the token.
    pub async fn login(
        &mut self,
        api: &dyn BlogApi,
        form: &LoginForm,
    ) -> Result<&Identity, SessionError> {
        form.validate()?;
        let credentials = Credentials {
            login: form.login.clone(),
            password: form.password.clone(),
        };
        let response = api.login(&credentials).await.map_err(|err| {
            warn!(login = %form.login, "login failed: {err}");
            SessionError::InvalidCredentials
        })?;
        self.tokens.save(&response.token).map_err(|err| {
            error!("failed to persist token: {err}");
            SessionError::TokenNotSaved
        })?;
        info!(login = %form.login, "logged in");
        Ok(&*self.identity.insert(Identity::new(form.login.clone())))
    }

    /// Creates an account. Does not sign in.
    pub async fn register(
        &self,
        api: &dyn BlogApi,
        form: &RegisterForm,
    ) -> Result<(), SessionError> {
        form.validate()?;
        let credentials = Credentials {
            login: form.login.clone(),
            password: form.password.clone(),
        };
        match api.register(&credentials).await {
            Ok(()) => {
                info!(login = %form.login, "registered");
                Ok(())
            }
            Err(err) => {
                warn!(login = %form.login, "registration failed: {err}");
                Err(err
                    .server_message()
                    .map(|message| SessionError::RegistrationRejected(message.to_string()))
                    .unwrap_or(SessionError::RegistrationFailed))
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.tokens.clear() {
            error!("failed to remove stored token: {err}");
        }
        if let Some(identity) = self.identity.take() {
            info!(login = %identity.login, "logged out");
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

//! Access token exchange
//!
//! [`TokenClient`] turns a [`SignedRequest`] into a bearer [`Token`] through
//! the [`RegistrarApi`] collaborator. [`authenticate`] runs the whole login:
//! stamp the label, sign, exchange.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

use crate::config::AuthSettings;
use crate::error::{Error, Result};
use crate::signing::{LoginRequest, RequestSigner, SignedRequest};
use crate::traits::{ApiReply, RegistrarApi};

/// Opaque bearer token
///
/// The `Debug` implementation never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a token string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<REDACTED>)")
    }
}

/// Extract the token from an auth reply
///
/// # Errors
///
/// - [`Error::TokenRequest`] on a non-success status, carrying the provider's
///   error text
/// - [`Error::MalformedResponse`] when a success body has no usable `token`
pub fn token_from_reply(reply: &ApiReply) -> Result<Token> {
    if !reply.is_success() {
        return Err(Error::token_request(reply.error_text()));
    }

    match reply.body.get("token").and_then(|t| t.as_str()) {
        Some(token) if !token.is_empty() => Ok(Token::new(token)),
        Some(_) => Err(Error::malformed("auth response contained an empty token")),
        None => Err(Error::malformed("auth response has no 'token' field")),
    }
}

/// Exchanges signed login messages for bearer tokens
pub struct TokenClient<'a> {
    api: &'a dyn RegistrarApi,
}

impl<'a> TokenClient<'a> {
    /// Create a client that requests tokens through `api`
    pub fn new(api: &'a dyn RegistrarApi) -> Self {
        Self { api }
    }

    /// Send the signed message and return the issued token
    pub async fn request_token(&self, request: &SignedRequest) -> Result<Token> {
        tracing::debug!("Requesting access token from {}", self.api.provider_name());
        let reply = self.api.exchange_signature(request).await?;
        let token = token_from_reply(&reply)?;
        tracing::info!("Access token issued by {}", self.api.provider_name());
        Ok(token)
    }
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    /// Label the token was registered under, timestamp included
    pub label: String,
    /// Account login
    pub user: String,
    /// Issued token
    pub token: Token,
}

/// Append `YYYY-MM-DD HH:MM:SS` to a label; token labels must be unique
pub fn stamp_label(label: &str, now: NaiveDateTime) -> String {
    format!("{} {}", label, now.format("%Y-%m-%d %H:%M:%S"))
}

/// Sign a login for `settings` and exchange it for a token
///
/// `now` is the local wall-clock time used for the label stamp, and `rng`
/// supplies the nonce.
pub async fn authenticate<R: Rng + ?Sized>(
    api: &dyn RegistrarApi,
    signer: &RequestSigner,
    settings: &AuthSettings,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<AuthOutcome> {
    settings.validate()?;

    let label = stamp_label(&settings.label, now);
    let login = LoginRequest {
        login: settings.user.clone(),
        read_only: settings.read_only,
        expiration_time: settings.expiration.clone(),
        label: label.clone(),
        global_key: settings.global_key,
    };

    let signed = signer.sign(&login, rng)?;
    let token = TokenClient::new(api).request_token(&signed).await?;

    Ok(AuthOutcome {
        label,
        user: settings.user.clone(),
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reply(status: u16, body: serde_json::Value) -> ApiReply {
        ApiReply { status, body }
    }

    #[test]
    fn token_is_extracted() {
        let token = token_from_reply(&reply(201, serde_json::json!({ "token": "abc.def" }))).unwrap();
        assert_eq!(token.expose(), "abc.def");
    }

    #[test]
    fn provider_error_text_is_surfaced() {
        let err = token_from_reply(&reply(
            401,
            serde_json::json!({ "error": "Signature is invalid" }),
        ))
        .unwrap_err();
        match err {
            Error::TokenRequest(msg) => assert_eq!(msg, "Signature is invalid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_or_empty_token_is_malformed() {
        for body in [serde_json::json!({}), serde_json::json!({ "token": "" }), serde_json::json!({ "token": 5 })] {
            let err = token_from_reply(&reply(200, body)).unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "got {err:?}");
        }
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("secret-token-value");
        assert!(!format!("{:?}", token).contains("secret"));
    }

    #[test]
    fn label_gets_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(stamp_label("Ansible key", now), "Ansible key 2024-01-02 03:04:05");
    }
}

use crate::client::{Client, Error, Result, HEADER_OTP};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use std::fmt;

/// Basic auth credential, stored base64 encoded as `user:password`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(user: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{}:{}", user, password)))
    }

    pub fn from_base64<S: Into<String>>(encoded: S) -> Self {
        Self(encoded.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub(super) fn authorization(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Check a credential against the API root.
///
/// Accounts with two-factor authentication enabled answer with an
/// `X-GitHub-OTP` header, reported as [`Error::TwoFactorRequired`] whatever
/// the status code.
pub fn test_auth(base_url: &str, credential: &Credential) -> Result<bool> {
    let client = Client::builder()
        .base_url(base_url)
        .credential(credential.clone())
        .build()?;

    let exchange = client.get("")?;
    if exchange.headers().contains_key(HEADER_OTP) {
        return Err(Error::TwoFactorRequired);
    }

    Ok(exchange.status() != StatusCode::UNAUTHORIZED)
}

/// Check a credential together with a one-time password.
pub fn test_two_factor_auth(base_url: &str, credential: &Credential, otp: &str) -> Result<bool> {
    let client = Client::builder()
        .base_url(base_url)
        .credential(credential.clone())
        .otp(otp)
        .build()?;

    let exchange = client.get("")?;
    Ok(exchange.status() != StatusCode::UNAUTHORIZED)
}

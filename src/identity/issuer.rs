use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{ClientError, Result};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{JWT_AUDIENCE, JWT_MAX_TTL_DAYS};

/// The only algorithm the platform accepts for identity tokens.
pub const ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims of a client SDK identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signed, self-verified JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    token: String,
    claims: IdentityClaims,
}

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    pub fn into_string(self) -> String {
        self.token
    }
}

/// RSA private key for signing plus the public key used to check the result.
#[derive(Clone)]
pub struct SigningKeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKeyPair(***)")
    }
}

impl SigningKeyPair {
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| ClientError::Signing(format!("invalid RSA private key: {}", e)))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| ClientError::Signing(format!("invalid RSA public key: {}", e)))?;
        Ok(Self { encoding, decoding })
    }

    /// Blocking read of both PEM files; use [`SigningKeyPair::load`] inside a runtime.
    pub fn from_files(private_key_path: &Path, public_key_path: &Path) -> Result<Self> {
        let read = |path: &Path| {
            std::fs::read(path)
                .map_err(|e| ClientError::Signing(format!("cannot read key '{}': {}", path.display(), e)))
        };
        Self::from_pem(&read(private_key_path)?, &read(public_key_path)?)
    }

    pub async fn load(private_key_path: &Path, public_key_path: &Path) -> Result<Self> {
        let private_pem = read_key(private_key_path).await?;
        let public_pem = read_key(public_key_path).await?;
        Self::from_pem(&private_pem, &public_pem)
    }
}

async fn read_key(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::Signing(format!("cannot read key '{}': {}", path.display(), e)))
}

/// Issues identity tokens for the browser-facing card SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTokenIssuer;

impl IdentityTokenIssuer {
    pub fn new() -> Self {
        Self
    }

    /// Longest lifetime the platform accepts.
    pub fn max_ttl() -> Duration {
        Duration::days(JWT_MAX_TTL_DAYS)
    }

    /// Signs a token valid for the maximum lifetime of 7 days.
    pub fn issue(&self, subject: &str, api_key: &str, issuer: &str, keys: &SigningKeyPair) -> Result<SignedToken> {
        self.issue_with_ttl(subject, api_key, issuer, keys, Self::max_ttl())
    }

    /// Signs a token with a shorter lifetime. A TTL above 7 days or not
    /// positive is rejected, never clamped.
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        api_key: &str,
        issuer: &str,
        keys: &SigningKeyPair,
        ttl: Duration,
    ) -> Result<SignedToken> {
        let result = sign_and_verify(subject, api_key, issuer, keys, ttl);
        let metrics = get_metrics();
        match &result {
            Ok(_) => {
                metrics.identity_tokens_issued.inc();
                info!(sub = subject, iss = issuer, "identity token issued");
            }
            Err(e) => {
                metrics.identity_token_failures.with_label_values(&[e.kind()]).inc();
                error!(sub = subject, iss = issuer, error = %e, "identity token not issued");
            }
        }
        result
    }
}

fn sign_and_verify(
    subject: &str,
    api_key: &str,
    issuer: &str,
    keys: &SigningKeyPair,
    ttl: Duration,
) -> Result<SignedToken> {
    if ttl <= Duration::zero() || ttl > IdentityTokenIssuer::max_ttl() {
        return Err(ClientError::Validation(format!(
            "identity token lifetime must be positive and at most {} days, got {} seconds",
            JWT_MAX_TTL_DAYS,
            ttl.num_seconds()
        )));
    }
    for (field, value) in [("subject", subject), ("api_key", api_key), ("issuer", issuer)] {
        if value.trim().is_empty() {
            return Err(ClientError::Validation(format!("identity token {} must not be empty", field)));
        }
    }

    let issued_at = Utc::now();
    let claims = IdentityClaims {
        iss: issuer.to_owned(),
        aud: JWT_AUDIENCE.to_owned(),
        sub: subject.to_owned(),
        api_key: api_key.to_owned(),
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };

    let token = encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
        .map_err(|e| ClientError::Signing(e.to_string()))?;

    // key mismatch or wrong algorithm shows up here, before the token leaves
    let verified = verify(&token, issuer, &keys.decoding)?;
    if verified != claims {
        return Err(ClientError::Verification("decoded claims differ from signed claims".to_owned()));
    }
    debug!(sub = subject, exp = claims.exp, "identity token verified");

    Ok(SignedToken { token, claims })
}

/// Checks signature, issuer, audience and expiry of an identity token.
pub fn verify(token: &str, issuer: &str, public_key: &DecodingKey) -> Result<IdentityClaims> {
    let mut validation = Validation::new(ALGORITHM);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[JWT_AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

    decode::<IdentityClaims>(token, public_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| ClientError::Verification(e.to_string()))
}

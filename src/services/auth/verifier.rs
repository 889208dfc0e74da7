use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, errors::ErrorKind};

use crate::services::auth::claims::AccessClaims;
use crate::services::auth::keys::{JwtKeys, KeyError};

/// Outcome of checking one presented credential.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Valid(AccessClaims),
    Expired,
    Invalid(InvalidReason),
}

/// Why a credential that is not merely expired was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not a decodable token: bad segments, base64, JSON, or missing/empty required claims.
    Malformed(String),
    /// Decodable but refused: signature, issuer, audience, algorithm, not-before.
    Rejected(String),
}

/// Credential checker consulted by the route guard.
///
/// Implementations may suspend (remote introspection, key fetch), so the
/// contract is async even though `JwtVerifier` is pure computation.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Verification;
}

/// Local JWT verifier (HS256 or EdDSA depending on `JwtKeys`).
///
/// `jsonwebtoken::Validation` checks:
/// - signature and algorithm
/// - `exp` and `nbf` (with leeway)
/// - `iss` / `aud` when configured
///
/// On top of that the `username` claim must not be blank.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        keys: &JwtKeys,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, KeyError> {
        let decoding_key = keys.decoding_key()?;

        let mut validation = Validation::new(keys.algorithm());
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // jsonwebtoken refuses any token carrying `aud` unless told otherwise.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    pub fn decode(&self, token: &str) -> Verification {
        let claims =
            match jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation) {
                Ok(data) => data.claims,
                Err(err) => return classify(&err),
            };

        if claims.username.trim().is_empty() {
            return Verification::Invalid(InvalidReason::Malformed(
                "empty 'username' claim".to_string(),
            ));
        }

        Verification::Valid(claims)
    }
}

#[async_trait]
impl CredentialVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Verification {
        self.decode(token)
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> Verification {
    match err.kind() {
        ErrorKind::ExpiredSignature => Verification::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => {
            Verification::Invalid(InvalidReason::Malformed(err.to_string()))
        }
        _ => Verification::Invalid(InvalidReason::Rejected(err.to_string())),
    }
}

//! Key material shared by the token issuer and verifier.
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid ed25519 {which} key pem: {source}")]
    InvalidPem {
        which: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("no private key configured; tokens cannot be signed")]
    SigningUnavailable,
}

/// Either a shared HS256 secret or an Ed25519 key pair (EdDSA).
///
/// - The private half of the Ed25519 pair is optional: a pure resource server
///   only ever verifies.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub enum JwtKeys {
    Hmac {
        secret: Vec<u8>,
    },
    Ed25519 {
        public_pem: String,
        private_pem: Option<String>,
    },
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        match self {
            Self::Hmac { .. } => f.debug_struct("Hmac").finish_non_exhaustive(),
            Self::Ed25519 { private_pem, .. } => f
                .debug_struct("Ed25519")
                .field("can_sign", &private_pem.is_some())
                .finish_non_exhaustive(),
        }
    }
}

impl JwtKeys {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Hmac { .. } => Algorithm::HS256,
            Self::Ed25519 { .. } => Algorithm::EdDSA,
        }
    }

    pub fn decoding_key(&self) -> Result<DecodingKey, KeyError> {
        match self {
            Self::Hmac { secret } => Ok(DecodingKey::from_secret(secret)),
            Self::Ed25519 { public_pem, .. } => DecodingKey::from_ed_pem(public_pem.as_bytes())
                .map_err(|source| KeyError::InvalidPem {
                    which: "public",
                    source,
                }),
        }
    }

    pub fn encoding_key(&self) -> Result<EncodingKey, KeyError> {
        match self {
            Self::Hmac { secret } => Ok(EncodingKey::from_secret(secret)),
            Self::Ed25519 {
                private_pem: Some(pem),
                ..
            } => EncodingKey::from_ed_pem(pem.as_bytes()).map_err(|source| KeyError::InvalidPem {
                which: "private",
                source,
            }),
            Self::Ed25519 {
                private_pem: None, ..
            } => Err(KeyError::SigningUnavailable),
        }
    }
}

pub mod claims;
pub mod factory;
pub mod issuer;
pub mod keys;
pub mod verifier;

pub use claims::AccessClaims;
pub use factory::{build_issuer, build_verifier};
pub use issuer::{JwtIssuer, Subject};
pub use keys::{JwtKeys, KeyError};
pub use verifier::{CredentialVerifier, InvalidReason, JwtVerifier, Verification};

pub mod issuer;

pub use issuer::{IdentityClaims, IdentityTokenIssuer, SignedToken, SigningKeyPair};

//! Platform authentication helpers.
//!
//! Secrets are stored as argon2id PHC strings (salt and parameters embedded),
//! so verification needs nothing beyond the stored string.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

/// Well-formed hash with the default cost parameters that no password
/// produces. Verifying against it costs the same as a real mismatch.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Pg6DCXT1a/2x44K94gRaTw$C5o4aRKptjEPOHqkTKrU8C8Jg0+uSva+Cf5vx77tAKo";

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("failed to hash credential: {0}")]
    Hash(password_hash::Error),
    #[error("stored credential is not a valid password hash: {0}")]
    MalformedHash(password_hash::Error),
}

pub fn hash_password(password: &str) -> Result<String, AuthnError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AuthnError::Hash)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthnError> {
    let parsed = PasswordHash::new(stored_hash).map_err(AuthnError::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs a full verification for a login whose account does not exist, so it
/// takes as long as a wrong password. Always `false`.
pub fn verify_decoy(password: &str) -> bool {
    verify_password(password, DECOY_HASH).unwrap_or(false)
}

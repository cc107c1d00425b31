//! Port for one-way password hashing.
use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing or checking a password.
    pub enum CredentialHasherError {
        /// The hashing primitive failed to produce a digest.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a stored digest.
    fn verify(&self, password: &str, digest: &PasswordDigest)
    -> Result<bool, CredentialHasherError>;
}

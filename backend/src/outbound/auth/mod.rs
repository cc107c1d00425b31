//! Credential adapters: password hashing and bearer tokens.

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2Hasher;
pub use jwt::{JwtTokenIssuer, TokenLifetimes};

//! Port for issuing and checking bearer tokens.
use crate::domain::{IdentityId, TokenKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token's expiry has passed.
        Expired => "token has expired",
        /// A refresh token was presented where an access token was expected,
        /// or the other way round.
        WrongKind { expected: String } => "expected a {expected} token",
        /// Encoding a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues and verifies signed bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token of `kind` for `identity`.
    fn issue(&self, identity: IdentityId, kind: TokenKind) -> Result<String, TokenError>;

    /// Verify `token` and require it to be of `kind`.
    fn verify(&self, token: &str, kind: TokenKind) -> Result<IdentityId, TokenError>;
}

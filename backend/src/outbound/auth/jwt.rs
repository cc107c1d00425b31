//! HS256 JSON Web Tokens behind the `TokenIssuer` port.
//!
//! Claims carry the identity as `user_id` and a `token_type` of `access` or
//! `refresh`, so a refresh token is never accepted as a bearer credential.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{IdentityId, TokenKind};

/// Validity windows for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    /// Access token lifetime; five minutes by default.
    pub access: Duration,
    /// Refresh token lifetime; one day by default.
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::from_secs(5 * 60),
            refresh: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl TokenLifetimes {
    fn for_kind(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    token_type: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with a shared secret.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Build an issuer from `secret`. The caller's copy of the secret can be
    /// dropped afterwards; the keys keep their own.
    #[must_use]
    pub fn new(
        secret: &Zeroizing<Vec<u8>>,
        lifetimes: TokenLifetimes,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetimes,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, identity: IdentityId, kind: TokenKind) -> Result<String, TokenError> {
        let issued_at = self.clock.utc().timestamp();
        let lifetime = i64::try_from(self.lifetimes.for_kind(kind).as_secs())
            .map_err(|err| TokenError::signing(err.to_string()))?;
        let claims = Claims {
            user_id: identity.get(),
            token_type: kind.as_str().to_owned(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<IdentityId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation()).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        if data.claims.token_type != kind.as_str() {
            return Err(TokenError::wrong_kind(kind.as_str()));
        }
        Ok(IdentityId::new(data.claims.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureClock;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    fn secret(raw: &str) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(raw.as_bytes().to_vec())
    }

    #[fixture]
    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(
            &secret("test-secret"),
            TokenLifetimes::default(),
            Arc::new(DefaultClock),
        )
    }

    #[rstest]
    #[case(TokenKind::Access)]
    #[case(TokenKind::Refresh)]
    fn tokens_verify_as_their_own_kind(issuer: JwtTokenIssuer, #[case] kind: TokenKind) {
        let token = issuer.issue(IdentityId::new(42), kind).expect("issue");
        assert_eq!(issuer.verify(&token, kind), Ok(IdentityId::new(42)));
    }

    #[rstest]
    fn refresh_tokens_are_not_bearer_credentials(issuer: JwtTokenIssuer) {
        let token = issuer
            .issue(IdentityId::new(1), TokenKind::Refresh)
            .expect("issue");
        assert_eq!(
            issuer.verify(&token, TokenKind::Access),
            Err(TokenError::wrong_kind("access"))
        );
    }

    #[rstest]
    fn tokens_from_another_secret_are_invalid(issuer: JwtTokenIssuer) {
        let other = JwtTokenIssuer::new(
            &secret("other-secret"),
            TokenLifetimes::default(),
            Arc::new(DefaultClock),
        );
        let token = other.issue(IdentityId::new(1), TokenKind::Access).expect("issue");
        assert!(matches!(
            issuer.verify(&token, TokenKind::Access),
            Err(TokenError::Invalid { .. })
        ));
    }

    #[rstest]
    fn tokens_issued_in_the_past_expire(issuer: JwtTokenIssuer) {
        let stale = JwtTokenIssuer::new(
            &secret("test-secret"),
            TokenLifetimes::default(),
            Arc::new(FixtureClock::default()),
        );
        let token = stale.issue(IdentityId::new(1), TokenKind::Access).expect("issue");
        assert_eq!(issuer.verify(&token, TokenKind::Access), Err(TokenError::expired()));
    }

    #[rstest]
    fn garbage_is_invalid(issuer: JwtTokenIssuer) {
        assert!(matches!(
            issuer.verify("not.a.token", TokenKind::Access),
            Err(TokenError::Invalid { .. })
        ));
    }
}

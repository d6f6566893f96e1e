//! Stateless bearer tokens: HMAC-signed JWTs that expire after 30 minutes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use sermo_types::api::Claims;

/// Value of the `client` claim.
pub const CLIENT_ID: &str = "sermoapi";

/// Lifetime of an issued token.
pub const TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and validates tokens with one symmetric secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    has_secret: bool,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            has_secret: !secret.is_empty(),
        }
    }

    pub fn issue(&self) -> Result<String, TokenError> {
        self.issue_at(Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        if !self.has_secret {
            return Err(TokenError::EmptySecret);
        }

        let claims = Claims {
            authorized: true,
            client: CLIENT_ID.to_string(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp() as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Checks signature, algorithm family and expiry. Only HMAC algorithms are
    /// accepted, so a token whose header names RSA, EC or `none` is rejected
    /// before its signature is looked at.
    pub fn validate(&self, token: &str) -> bool {
        if !self.has_secret {
            return false;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Token rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"captainjacksparrowsayshi";

    // base64url of {"alg":"RS256","typ":"JWT"}
    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
    // base64url of {"alg":"none","typ":"JWT"}
    const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";

    fn service() -> TokenService {
        TokenService::new(SECRET)
    }

    #[test]
    fn issued_token_validates() {
        let svc = service();
        let token = svc.issue().unwrap();
        assert!(svc.validate(&token));
    }

    #[test]
    fn claims_are_fixed() {
        let svc = service();
        let now = Utc::now();
        let token = svc.issue_at(now).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(SECRET), &validation).unwrap();

        assert!(data.claims.authorized);
        assert_eq!(data.claims.client, "sermoapi");
        assert_eq!(data.claims.exp as i64, now.timestamp() + 30 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let stale = svc.issue_at(Utc::now() - Duration::minutes(31)).unwrap();
        assert!(!svc.validate(&stale));

        let fresh = svc.issue_at(Utc::now() - Duration::minutes(29)).unwrap();
        assert!(svc.validate(&fresh));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenService::new(b"some-other-secret").issue().unwrap();
        assert!(!service().validate(&token));
    }

    #[test]
    fn other_hmac_strengths_are_accepted() {
        let claims = Claims {
            authorized: true,
            client: CLIENT_ID.to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(service().validate(&token));
    }

    #[test]
    fn non_hmac_algorithms_are_rejected() {
        let svc = service();
        let token = svc.issue().unwrap();
        let (_, rest) = token.split_once('.').unwrap();

        // Same payload and HMAC signature, header relabelled as RS256.
        let relabelled = format!("{RS256_HEADER}.{rest}");
        assert!(!svc.validate(&relabelled));

        let (payload, _) = rest.split_once('.').unwrap();
        let unsigned = format!("{NONE_HEADER}.{payload}.");
        assert!(!svc.validate(&unsigned));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service();
        assert!(!svc.validate(""));
        assert!(!svc.validate("not.a.token"));
        assert!(!svc.validate("abc"));
    }

    #[test]
    fn empty_secret_cannot_sign() {
        let svc = TokenService::new(b"");
        assert!(matches!(svc.issue(), Err(TokenError::EmptySecret)));
        assert!(!svc.validate("anything"));
    }
}

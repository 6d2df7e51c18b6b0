//! HS256 JSON Web Token adapter.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so token lifetimes are deterministic in tests.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{IssuedToken, TokenError, TokenService};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// `TokenService` adapter signing tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a token service signing with `secret`.
    pub fn new(secret: &[u8], lifetime: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserId) -> Result<IssuedToken, TokenError> {
        let now = self.clock.utc();
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "rejected token");
            TokenError::invalid()
        })?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenError::invalid())
    }
}

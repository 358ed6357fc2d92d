//! HS256 token encoding/decoding.
//!
//! Signature handling only; claim time-window checks stay in
//! [`crate::claims::validate_claims`] so they remain deterministic under an
//! injectable clock.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use strata_core::MemberId;

use crate::{JwtClaims, Role, TokenValidationError};

/// On-the-wire claim shape (numeric timestamps per RFC 7519).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: MemberId,
    role: Role,
    iat: i64,
    exp: i64,
}

/// HS256 JWT codec over a shared secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn encode(&self, claims: &JwtClaims) -> Result<String, TokenValidationError> {
        let wire = WireClaims {
            sub: claims.sub,
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))
    }

    /// Verify the signature and decode claims.
    ///
    /// Expiry is deliberately not checked here; the caller runs
    /// [`crate::validate_claims`] against its own clock.
    pub fn decode(&self, token: &str) -> Result<JwtClaims, TokenValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        Ok(JwtClaims {
            sub: data.claims.sub,
            role: data.claims.role,
            issued_at: timestamp(data.claims.iat)?,
            expires_at: timestamp(data.claims.exp)?,
        })
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenValidationError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| TokenValidationError::Malformed(format!("bad timestamp {seconds}")))
}

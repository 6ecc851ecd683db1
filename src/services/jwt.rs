//! # JWT Service
//!
//! This module provides JSON Web Token (JWT) functionality for session
//! authentication. Tokens are HS256-signed, embed the caller's identity claims
//! and expire after a fixed lifetime. Nothing is stored server side: validity
//! is purely cryptographic and time-based.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument, trace};
use validator::Validate;

use crate::error::AuthError;

/// Errors that can occur while minting a token
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
}

/// Identity claims supplied by the client at `POST /jwt`.
///
/// Only `email` is interpreted; every other field is carried through the
/// token untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Identity {
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JWT claims structure for session tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Service for minting and verifying session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Creates a new JWT service signing with `secret`.
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC key used both for signing and verification
    /// * `ttl` - Lifetime of every issued token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Signs the identity claims into a session token valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError`] if token encoding fails.
    #[instrument(skip_all, fields(email = %identity.email))]
    pub fn issue(&self, identity: Identity) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time should not be before UNIX EPOCH")
            .as_secs();
        self.issue_at(identity, now)
    }

    fn issue_at(&self, mut identity: Identity, now: u64) -> Result<String, JwtError> {
        trace!("Creating session token");

        // The registered time claims are always ours.
        identity.extra.remove("exp");
        identity.extra.remove("iat");

        let claims = Claims {
            identity,
            exp: now + self.ttl.as_secs(),
            iat: now,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        debug!(exp = claims.exp, "Session token created");
        Ok(token)
    }

    /// Validates a session token and returns its claims.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidOrExpired`] on a bad signature, a token signed with
    /// another secret, a malformed token or a past expiry.
    #[instrument(skip_all, fields(token_length = token.len()))]
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        trace!("Validating session token");

        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(token_data) => {
                trace!(email = %token_data.claims.identity.email, "Session token validated");
                Ok(token_data.claims)
            }
            Err(e) => {
                let expired = e.kind() == &ErrorKind::ExpiredSignature;
                debug!(expired, error = %e, "Session token rejected");
                Err(AuthError::InvalidOrExpired)
            }
        }
    }
}

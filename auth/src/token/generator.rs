use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use data_encoding::BASE32_NOPAD;
use rand::rngs::OsRng;
use rand::RngCore;

use super::digest::TokenDigest;
use super::errors::TokenError;

/// Length of an encoded token: 16 random bytes in unpadded base-32.
pub const TOKEN_LENGTH: usize = 26;

const ENTROPY_BYTES: usize = 16;

/// Freshly generated token, before it is persisted.
///
/// `value` is the bearer secret handed to the client; only `digest`
/// should ever reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueToken {
    pub value: String,
    pub digest: TokenDigest,
    pub issued_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

/// Opaque session token generator backed by the operating system CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new token expiring `ttl` after now.
    ///
    /// # Errors
    /// * `RandomSource` - The OS random source failed; there is no fallback
    /// * `InvalidTtl` - `now + ttl` is outside the representable range
    pub fn generate(&self, ttl: Duration) -> Result<OpaqueToken, TokenError> {
        self.generate_with(&mut OsRng, ttl)
    }

    /// Generate a token drawing entropy from `rng`.
    pub fn generate_with<R>(&self, rng: &mut R, ttl: Duration) -> Result<OpaqueToken, TokenError>
    where
        R: RngCore + ?Sized,
    {
        let mut random_bytes = [0u8; ENTROPY_BYTES];
        rng.try_fill_bytes(&mut random_bytes)
            .map_err(|e| TokenError::RandomSource(e.to_string()))?;

        let value = BASE32_NOPAD.encode(&random_bytes);
        let digest = TokenDigest::of(&value);
        let issued_at = Utc::now();
        let expiry = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::InvalidTtl(ttl.to_string()))?;

        Ok(OpaqueToken {
            value,
            digest,
            issued_at,
            expiry,
        })
    }
}

/// Whether `value` has the shape of a generated token.
pub fn is_well_formed(value: &str) -> bool {
    value.len() == TOKEN_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}

use std::fmt;

use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;

/// SHA-256 digest of an opaque token value.
///
/// This is what gets persisted and looked up; the plaintext value only
/// travels back to the client once, at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    pub const LENGTH: usize = 32;

    /// Digest a presented or freshly generated token value.
    pub fn of(value: &str) -> Self {
        Self(Sha256::digest(value.as_bytes()).into())
    }

    /// Rebuild a digest from stored bytes.
    ///
    /// # Errors
    /// * `InvalidDigest` - Byte slice is not exactly 32 bytes long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        <[u8; 32]>::try_from(bytes).map(Self).map_err(|_| {
            TokenError::InvalidDigest(format!(
                "expected {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use serde::Deserialize;

use super::errors::PasswordError;

/// Work factor used for bcrypt digests.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Algorithm used when producing new digests.
///
/// Verification does not depend on this setting: the algorithm is read
/// back from the stored digest itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Argon2id,
    #[default]
    Bcrypt,
}

/// Adaptive, salted password hashing.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
    bcrypt_cost: u32,
}

impl PasswordHasher {
    /// Create a hasher producing bcrypt digests at `DEFAULT_BCRYPT_COST`.
    pub fn new() -> Self {
        Self::with_algorithm(HashAlgorithm::Bcrypt, DEFAULT_BCRYPT_COST)
    }

    /// Create a hasher for the given algorithm.
    ///
    /// # Arguments
    /// * `algorithm` - Algorithm for new digests
    /// * `bcrypt_cost` - Work factor, only used for `HashAlgorithm::Bcrypt`
    pub fn with_algorithm(algorithm: HashAlgorithm, bcrypt_cost: u32) -> Self {
        Self {
            algorithm,
            bcrypt_cost,
        }
    }

    /// The algorithm used for new digests.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash a plaintext password for storage.
    ///
    /// Every call draws a fresh random salt, so hashing the same input
    /// twice yields two different digests.
    ///
    /// # Returns
    /// PHC string (Argon2id) or modular crypt string (bcrypt)
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            HashAlgorithm::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::HashingFailed(e.to_string()))
            }
            HashAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| PasswordError::HashingFailed(e.to_string())),
        }
    }

    /// Verify a password against a stored digest.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `digest` - Stored digest, Argon2 PHC string or bcrypt
    ///
    /// # Returns
    /// True if the password matches, false on a mismatch
    ///
    /// # Errors
    /// * `MalformedDigest` - The stored digest cannot be parsed
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_digest(digest) {
            return bcrypt::verify(password, digest)
                .map_err(|e| PasswordError::MalformedDigest(e.to_string()));
        }

        let parsed_hash =
            PasswordHash::new(digest).map_err(|e| PasswordError::MalformedDigest(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedDigest(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_bcrypt_digest(digest: &str) -> bool {
    BCRYPT_PREFIXES
        .iter()
        .any(|prefix| digest.starts_with(prefix))
}

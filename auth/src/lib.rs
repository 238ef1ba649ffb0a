//! Authentication utilities library
//!
//! Provides reusable credential and session-token primitives:
//! - Password hashing and verification (bcrypt by default, Argon2id)
//! - Opaque session token generation and digesting
//!
//! Persistence and orchestration live in the services that use these.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{TokenDigest, TokenGenerator, TOKEN_LENGTH};
//!
//! let generator = TokenGenerator::new();
//! let token = generator.generate(chrono::Duration::hours(24)).unwrap();
//! assert_eq!(token.value.len(), TOKEN_LENGTH);
//!
//! // Only the digest is stored; presented values are digested before lookup.
//! assert_eq!(TokenDigest::of(&token.value), token.digest);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::HashAlgorithm;
pub use password::DEFAULT_BCRYPT_COST;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::is_well_formed;
pub use token::OpaqueToken;
pub use token::TokenDigest;
pub use token::TokenError;
pub use token::TokenGenerator;
pub use token::TOKEN_LENGTH;

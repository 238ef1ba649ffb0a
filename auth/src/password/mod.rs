pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::HashAlgorithm;
pub use hasher::DEFAULT_BCRYPT_COST;
pub use hasher::PasswordHasher;

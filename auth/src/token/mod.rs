pub mod digest;
pub mod errors;
pub mod generator;

pub use digest::TokenDigest;
pub use errors::TokenError;
pub use generator::is_well_formed;
pub use generator::OpaqueToken;
pub use generator::TokenGenerator;
pub use generator::TOKEN_LENGTH;

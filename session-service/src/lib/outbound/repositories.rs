mod support;
pub mod token;
pub mod user;

pub use support::DEFAULT_QUERY_TIMEOUT;
pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;

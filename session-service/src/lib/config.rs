use std::env;
use std::time::Duration;

use auth::HashAlgorithm;
use auth::PasswordHasher;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub algorithm: HashAlgorithm,
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Bcrypt,
            bcrypt_cost: auth::DEFAULT_BCRYPT_COST,
        }
    }
}

/// Longest session lifetime accepted from configuration: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

fn default_max_connections() -> u32 {
    5
}

fn default_query_timeout_secs() -> u64 {
    3
}

impl DatabaseConfig {
    /// Upper bound for a single store round-trip.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::with_algorithm(self.algorithm, self.bcrypt_cost)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        Self::from_source(configuration)
    }

    fn from_source(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Self = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session.ttl_hours) {
            return Err(ConfigError::Message(format!(
                "session.ttl_hours must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS, self.session.ttl_hours
            )));
        }

        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "database.query_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn try_parse(toml: &str) -> Result<Config, ConfigError> {
        let source = ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Config::from_source(source)
    }

    fn parse(toml: &str) -> Config {
        try_parse(toml).unwrap()
    }

    fn with_limits(ttl_hours: i64, query_timeout_secs: u64) -> String {
        format!(
            r#"
            [database]
            url = "postgresql://localhost/sessions"
            query_timeout_secs = {}

            [server]
            http_port = 8082

            [session]
            ttl_hours = {}
            "#,
            query_timeout_secs, ttl_hours
        )
    }

    #[test]
    fn test_optional_sections_fall_back_to_defaults() {
        let config = parse(
            r#"
            [database]
            url = "postgresql://localhost/sessions"

            [server]
            http_port = 8082

            [session]
            ttl_hours = 24
            "#,
        );

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.query_timeout(), Duration::from_secs(3));
        assert_eq!(config.session.ttl(), chrono::Duration::hours(24));
        assert_eq!(config.password.algorithm, HashAlgorithm::Bcrypt);
        assert_eq!(config.password.bcrypt_cost, 12);
    }

    #[test]
    fn test_session_ttl_must_be_positive_and_bounded() {
        for ttl_hours in [0, -1, MAX_SESSION_TTL_HOURS + 1, 100_000_000_000] {
            let result = try_parse(&with_limits(ttl_hours, 3));
            assert!(
                matches!(result, Err(ConfigError::Message(ref msg)) if msg.contains("ttl_hours")),
                "{}: {:?}",
                ttl_hours,
                result
            );
        }

        let config = parse(&with_limits(MAX_SESSION_TTL_HOURS, 3));
        assert_eq!(config.session.ttl(), chrono::Duration::hours(MAX_SESSION_TTL_HOURS));
    }

    #[test]
    fn test_query_timeout_must_be_nonzero() {
        let result = try_parse(&with_limits(24, 0));
        assert!(matches!(
            result,
            Err(ConfigError::Message(ref msg)) if msg.contains("query_timeout_secs")
        ));
    }

    #[test]
    fn test_argon2id_can_be_selected() {
        let config = parse(
            r#"
            [database]
            url = "postgresql://localhost/sessions"
            query_timeout_secs = 1

            [server]
            http_port = 9000

            [session]
            ttl_hours = 2

            [password]
            algorithm = "argon2id"
            bcrypt_cost = 10
            "#,
        );

        assert_eq!(config.database.query_timeout(), Duration::from_secs(1));
        assert_eq!(config.password.hasher().algorithm(), HashAlgorithm::Argon2id);
    }
}

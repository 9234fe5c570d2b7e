use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PricingConfig {
    /// Happy-hour clock offset from UTC. Unset means the server's local time.
    pub utc_offset_minutes: Option<i32>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", 4000)?
            .set_default("database.url", "sqlite://data.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "dev-secret")?
            .set_default("auth.jwt_expiration_seconds", 7 * 24 * 60 * 60)?
            .set_default("auth.bcrypt_cost", 10)?
            // Files are optional; the defaults above are enough to boot
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `MENU__SERVER__PORT=8080` overrides `server.port`
            .add_source(config::Environment::with_prefix("MENU").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_files() {
        let config = Config::load().unwrap();

        assert_eq!(config.auth.jwt_expiration_seconds, 604_800);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(config.database.url.starts_with("sqlite:"));
        assert!(config.pricing.utc_offset_minutes.is_none());
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "FOLIO_ENV";
const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";
const ENV_PREFIX: &str = "FOLIO";

/// Unprefixed variables the auth collaborator has always been configured with.
const SECRET_KEY_ENV: &str = "SECRET_KEY";
const ALGORITHM_ENV: &str = "ALGORITHM";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub books: BooksSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and env vars.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit config directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let mut builder = config::Config::builder();
        if let Ok(secret_key) = std::env::var(SECRET_KEY_ENV) {
            builder = builder.set_default("auth.secret_key", secret_key)?;
        }
        if let Ok(algorithm) = std::env::var(ALGORITHM_ENV) {
            builder = builder.set_default("auth.algorithm", algorithm)?;
        }

        let builder = builder
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "sqlite://folio.db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,sqlx=warn".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for the bearer-token and password collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Token signing secret. Required to serve the users module.
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "AuthSettings::default_algorithm")]
    pub algorithm: String,
    #[serde(default = "AuthSettings::default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "AuthSettings::default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    fn default_algorithm() -> String {
        "HS256".to_string()
    }

    fn default_token_ttl_secs() -> u64 {
        20 * 60
    }

    fn default_bcrypt_cost() -> u32 {
        12
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            algorithm: Self::default_algorithm(),
            token_ttl_secs: Self::default_token_ttl_secs(),
            bcrypt_cost: Self::default_bcrypt_cost(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BooksSettings {
    /// Load the six sample books when the books module initializes
    #[serde(default = "BooksSettings::default_seed_sample_catalog")]
    pub seed_sample_catalog: bool,
}

impl BooksSettings {
    fn default_seed_sample_catalog() -> bool {
        true
    }
}

impl Default for BooksSettings {
    fn default() -> Self {
        Self {
            seed_sample_catalog: Self::default_seed_sample_catalog(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_is_local_sqlite_file() {
        let settings = Settings::default();
        assert_eq!(settings.database.url, "sqlite://folio.db");
    }

    #[test]
    fn default_auth_uses_hs256_without_secret() {
        let settings = Settings::default();
        assert_eq!(settings.auth.algorithm, "HS256");
        assert!(settings.auth.secret_key.is_none());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Environment::parse("qa").is_err());
        assert_eq!(
            Environment::parse("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    #[serial_test::serial]
    fn load_from_layers_base_and_environment_files() {
        let dir = std::env::temp_dir().join(format!("folio-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("base.toml"),
            "[server]\nport = 9090\n\n[books]\nseed_sample_catalog = false\n",
        )
        .unwrap();
        std::fs::write(dir.join("staging.toml"), "[server]\nhost = \"127.0.0.1\"\n").unwrap();

        let settings = Settings::load_from(&dir, "staging").unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.bind_address(), "127.0.0.1:9090");
        assert!(!settings.books.seed_sample_catalog);
    }

    #[test]
    #[serial_test::serial]
    fn plain_auth_variables_are_defaults_and_prefixed_ones_win() {
        let dir = std::env::temp_dir().join(format!("folio-settings-auth-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        std::env::set_var(SECRET_KEY_ENV, "plain-secret");
        std::env::set_var(ALGORITHM_ENV, "HS512");
        std::env::remove_var("FOLIO_AUTH__SECRET_KEY");
        let plain = Settings::load_from(&dir, "local");

        std::env::set_var("FOLIO_AUTH__SECRET_KEY", "prefixed-secret");
        let prefixed = Settings::load_from(&dir, "local");

        std::env::remove_var(SECRET_KEY_ENV);
        std::env::remove_var(ALGORITHM_ENV);
        std::env::remove_var("FOLIO_AUTH__SECRET_KEY");
        std::fs::remove_dir_all(&dir).ok();

        let plain = plain.unwrap();
        assert_eq!(plain.auth.secret_key.as_deref(), Some("plain-secret"));
        assert_eq!(plain.auth.algorithm, "HS512");

        let prefixed = prefixed.unwrap();
        assert_eq!(prefixed.auth.secret_key.as_deref(), Some("prefixed-secret"));
        assert_eq!(prefixed.auth.algorithm, "HS512");
    }
}

/// Server configuration
use crate::error::{Result, ServerError};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Plain environment variables and the keys they override. These win over
/// both the config file and `ROSTER_`-prefixed variables.
const PLAIN_VARS: [(&str, &str); 7] = [
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
];

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_database")]
    pub database: DatabaseSettings,

    #[serde(default = "default_metadata")]
    pub metadata: MetadataSettings,

    #[serde(default = "default_shutdown")]
    pub shutdown: ShutdownSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_host")]
    pub host: String,

    #[serde(default = "default_database_port")]
    pub port: u16,

    #[serde(default = "default_database_user")]
    pub user: String,

    /// No default: must come from the environment or the config file
    #[serde(default)]
    pub password: Option<SecretString>,

    #[serde(default = "default_database_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataSettings {
    #[serde(default = "default_metadata_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_metadata_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShutdownSettings {
    /// Upper bound on closing the database connection
    #[serde(default = "default_shutdown_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Load configuration from file and the given variables
    pub fn load_from(path: Option<&Path>, vars: config::Map<String, String>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        }

        // Override with environment variables (ROSTER_DATABASE__HOST, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("ROSTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        for (var, key) in PLAIN_VARS {
            if let Some(value) = vars.get(var) {
                settings = settings
                    .set_override(key, value.as_str())
                    .map_err(|e| ServerError::Config(e.to_string()))?;
            }
        }

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let has_password = self
            .database
            .password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty());
        if !has_password {
            return Err(ServerError::Config(
                "database password is required (set DB_PASSWORD)".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(ServerError::Config("server.host must not be empty".to_string()));
        }

        roster_storage::schema::validate_database_name(&self.database.name)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        if self.metadata.timeout_ms == 0 {
            return Err(ServerError::Config(
                "metadata.timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl DatabaseSettings {
    /// Options that connect to the server without selecting a database
    pub fn server_options(&self) -> MySqlConnectOptions {
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or_default();

        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(password)
    }
}

impl MetadataSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ShutdownSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database() -> DatabaseSettings {
    DatabaseSettings {
        host: default_database_host(),
        port: default_database_port(),
        user: default_database_user(),
        password: None,
        name: default_database_name(),
    }
}

fn default_database_host() -> String {
    "localhost".to_string()
}

fn default_database_port() -> u16 {
    3306
}

fn default_database_user() -> String {
    "admin".to_string()
}

fn default_database_name() -> String {
    "appdb".to_string()
}

fn default_metadata() -> MetadataSettings {
    MetadataSettings {
        endpoint: default_metadata_endpoint(),
        timeout_ms: default_metadata_timeout_ms(),
    }
}

fn default_metadata_endpoint() -> String {
    "http://169.254.169.254/latest/meta-data".to_string()
}

fn default_metadata_timeout_ms() -> u64 {
    1000
}

fn default_shutdown() -> ShutdownSettings {
    ShutdownSettings {
        timeout_secs: default_shutdown_timeout_secs(),
    }
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            database: default_database(),
            metadata: default_metadata(),
            shutdown: default_shutdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("config.toml");
        std::fs::File::create(&empty).unwrap();

        let config = ServerConfig::load_from(Some(&empty), vars(&[])).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "admin");
        assert_eq!(config.database.name, "appdb");
        assert!(config.database.password.is_none());
        assert_eq!(config.metadata.timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn plain_variables_override_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[database]\nhost = \"from-file\"\nname = \"filedb\"").unwrap();

        let config = ServerConfig::load_from(
            Some(&path),
            vars(&[
                ("ROSTER_DATABASE__HOST", "from-prefixed"),
                ("DB_HOST", "from-plain"),
                ("DB_PASSWORD", "s3cret"),
                ("PORT", "8081"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.host, "from-plain");
        assert_eq!(config.database.name, "filedb");
        assert_eq!(config.server.port, 8081);
        assert_eq!(
            config.database.password.as_ref().unwrap().expose_secret(),
            "s3cret"
        );
    }

    #[test]
    fn prefixed_variables_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let config = ServerConfig::load_from(
            Some(&path),
            vars(&[("ROSTER_SERVER__PORT", "4001")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 4001);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            ServerConfig::load_from(Some(&path), vars(&[])),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn password_is_required() {
        let config = ServerConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DB_PASSWORD"));

        let mut config = ServerConfig::default();
        config.database.password = Some(SecretString::from(String::new()));
        assert!(config.validate().is_err());

        config.database.password = Some(SecretString::from("pw".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn host_may_be_a_name() {
        let config = ServerConfig::load_from(
            None,
            vars(&[("HOST", "localhost"), ("DB_PASSWORD", "pw")]),
        )
        .unwrap();
        assert_eq!(config.server.host, "localhost");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = ServerConfig::default();
        config.database.password = Some(SecretString::from("pw".to_string()));
        config.server.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn database_name_must_be_identifier() {
        let mut config = ServerConfig::default();
        config.database.password = Some(SecretString::from("pw".to_string()));
        config.database.name = "app`db".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn password_is_not_debug_printed() {
        let mut config = ServerConfig::default();
        config.database.password = Some(SecretString::from("hunter2".to_string()));
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}

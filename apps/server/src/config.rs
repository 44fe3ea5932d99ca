//! Server configuration
//!
//! Layered, lowest precedence first:
//! 1. Built-in defaults ([`Config::default`])
//! 2. Optional `config.{toml,yaml,json}` in the working directory
//! 3. `CONTACTSDB__SECTION__KEY` environment variables (a `.env` file is
//!    loaded first if present)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

const ENV_PREFIX: &str = "CONTACTSDB";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty disables CORS headers.
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            max_request_body_size: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly, minutely or never
    pub file_rotation: String,
    pub service_name: String,
    pub deployment_environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "contacts-server".to_string(),
            file_rotation: "daily".to_string(),
            service_name: "contacts-server".to_string(),
            deployment_environment: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub name: String,
    pub password: String,
}

impl UserCredentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub enabled: bool,
    pub realm: String,
    /// Exact paths served without credentials.
    pub public_paths: Vec<String>,
    pub users: Vec<UserCredentials>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            realm: "contacts".to_string(),
            public_paths: ["/", "/index.html", "/favicon.ico", "/health", "/metrics"]
                .into_iter()
                .map(String::from)
                .collect(),
            users: (1..=3)
                .map(|n| UserCredentials::new(format!("user{n}"), format!("pass{n}")))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database: String,
    pub collection: String,
    /// Drop, recreate and load the fixture contacts at startup.
    pub seed_on_start: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: contactsdb_contacts::CONTACTS_DATABASE.to_string(),
            collection: contactsdb_contacts::CONTACTS_COLLECTION.to_string(),
            seed_on_start: true,
        }
    }
}

impl Config {
    /// Load configuration from defaults, optional config file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("auth.public_paths"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be non-zero".to_string());
        }
        if self.auth.realm.trim().is_empty() {
            return Err("auth.realm must not be empty".to_string());
        }
        if self.auth.enabled && self.auth.users.is_empty() {
            return Err("auth.users must not be empty when auth is enabled".to_string());
        }

        let mut seen = HashSet::new();
        for user in &self.auth.users {
            if user.name.is_empty() || user.name.contains(':') {
                return Err(format!("auth.users: invalid user name '{}'", user.name));
            }
            if !seen.insert(user.name.as_str()) {
                return Err(format!("auth.users: duplicate user '{}'", user.name));
            }
        }

        if self.store.database.trim().is_empty() {
            return Err("store.database must not be empty".to_string());
        }
        if self.store.collection.trim().is_empty() {
            return Err("store.collection must not be empty".to_string());
        }

        match self.logging.file_rotation.as_str() {
            "daily" | "hourly" | "minutely" | "never" => Ok(()),
            other => Err(format!("logging.file_rotation: unknown rotation '{other}'")),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid server.host '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

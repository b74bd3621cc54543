//! Process configuration
//!
//! Settings come from `AMBULANCE_API_*` environment variables (optionally loaded from a
//! `.env` file) layered over built-in defaults:
//!
//! - `AMBULANCE_API_HOST` / `AMBULANCE_API_PORT` - listen address (`0.0.0.0:8080`)
//! - `AMBULANCE_API_ENVIRONMENT` - `production` switches logs to JSON
//! - `AMBULANCE_API_CORS_ORIGINS` - comma-separated origins, `*` for any
//! - `AMBULANCE_API_MONGODB_*` - backend connection, see [`MongoConfig`]
//! - `AMBULANCE_API_LOG_*` - logging, see [`LoggingConfig`]

use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use vpatient_store::StoreConfig;

const ENV_PREFIX: &str = "AMBULANCE_API";
const LOG_ROTATIONS: &[&str] = &["daily", "hourly", "minutely", "never"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Deadline handed to every store call made while serving a request
    pub request_timeout: Duration,
}

/// MongoDB connection settings
///
/// `uri` wins when set; otherwise the connection string is assembled from host, port
/// and the optional credentials.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub timeout: Duration,
    pub connect_attempts: u32,
    /// Load the sample patients into a collection created at start-up
    pub seed: bool,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    pub file_rotation: String,
    pub service_name: String,
    pub deployment_environment: String,
}

/// Flat view of the environment, one field per `AMBULANCE_API_*` variable
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct EnvSettings {
    host: String,
    port: u16,
    environment: String,
    cors_origins: Vec<String>,
    max_request_body_size: usize,
    request_timeout_seconds: u64,
    mongodb_uri: Option<String>,
    mongodb_host: String,
    mongodb_port: u16,
    mongodb_username: Option<String>,
    mongodb_password: Option<String>,
    mongodb_database: Option<String>,
    mongodb_collection: Option<String>,
    mongodb_timeout_seconds: u64,
    mongodb_connect_attempts: u32,
    mongodb_seed: bool,
    log_level: String,
    log_json: Option<bool>,
    log_file_enabled: bool,
    log_file_directory: String,
    log_file_prefix: String,
    log_file_rotation: String,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_request_body_size: 1024 * 1024,
            request_timeout_seconds: 15,
            mongodb_uri: None,
            mongodb_host: "localhost".to_string(),
            mongodb_port: 27017,
            mongodb_username: None,
            mongodb_password: None,
            mongodb_database: None,
            mongodb_collection: None,
            mongodb_timeout_seconds: 10,
            mongodb_connect_attempts: 3,
            mongodb_seed: false,
            log_level: "info".to_string(),
            log_json: None,
            log_file_enabled: false,
            log_file_directory: "logs".to_string(),
            log_file_prefix: env!("CARGO_PKG_NAME").to_string(),
            log_file_rotation: "daily".to_string(),
        }
    }
}

impl From<EnvSettings> for Config {
    fn from(env: EnvSettings) -> Self {
        let production = env.environment.eq_ignore_ascii_case("production");

        Config {
            server: ServerConfig {
                host: env.host,
                port: env.port,
                environment: env.environment.clone(),
                cors_origins: env.cors_origins,
                max_request_body_size: env.max_request_body_size,
                request_timeout: Duration::from_secs(env.request_timeout_seconds),
            },
            mongodb: MongoConfig {
                uri: non_empty(env.mongodb_uri),
                host: env.mongodb_host,
                port: env.mongodb_port,
                username: non_empty(env.mongodb_username),
                password: non_empty(env.mongodb_password),
                database: non_empty(env.mongodb_database),
                collection: non_empty(env.mongodb_collection),
                timeout: Duration::from_secs(env.mongodb_timeout_seconds),
                connect_attempts: env.mongodb_connect_attempts,
                seed: env.mongodb_seed,
            },
            logging: LoggingConfig {
                level: env.log_level,
                json: env.log_json.unwrap_or(production),
                file_enabled: env.log_file_enabled,
                file_directory: env.log_file_directory,
                file_prefix: env.log_file_prefix,
                file_rotation: env.log_file_rotation,
                service_name: env!("CARGO_PKG_NAME").to_string(),
                deployment_environment: env.environment,
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        EnvSettings::default().into()
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and `AMBULANCE_API_*` variables
    pub fn load() -> anyhow::Result<Self> {
        // Missing .env is fine; explicit variables always win over it.
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()
            .context("Failed to read environment configuration")?;

        let env: EnvSettings = settings
            .try_deserialize()
            .context("Failed to parse environment configuration")?;

        Ok(env.into())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("AMBULANCE_API_PORT must be non-zero".to_string());
        }
        if self.server.cors_origins.iter().all(|o| o.trim().is_empty()) {
            return Err("AMBULANCE_API_CORS_ORIGINS must list at least one origin".to_string());
        }
        if self.server.request_timeout.is_zero() {
            return Err("AMBULANCE_API_REQUEST_TIMEOUT_SECONDS must be positive".to_string());
        }
        if self.mongodb.timeout.is_zero() {
            return Err("AMBULANCE_API_MONGODB_TIMEOUT_SECONDS must be positive".to_string());
        }
        if self.mongodb.connect_attempts == 0 {
            return Err("AMBULANCE_API_MONGODB_CONNECT_ATTEMPTS must be positive".to_string());
        }
        if !LOG_ROTATIONS.contains(&self.logging.file_rotation.as_str()) {
            return Err(format!(
                "AMBULANCE_API_LOG_FILE_ROTATION must be one of {}, got '{}'",
                LOG_ROTATIONS.join(", "),
                self.logging.file_rotation
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}

impl MongoConfig {
    pub fn connection_string(&self) -> String {
        if let Some(uri) = &self.uri {
            return uri.clone();
        }

        match &self.username {
            Some(username) => format!(
                "mongodb://{}:{}@{}:{}",
                urlencoding::encode(username),
                urlencoding::encode(self.password.as_deref().unwrap_or_default()),
                self.host,
                self.port
            ),
            None => format!("mongodb://{}:{}", self.host, self.port),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            connection_string: Some(self.connection_string()),
            database: self.database.clone(),
            collection: self.collection.clone(),
            timeout: Some(self.timeout),
            connect_attempts: Some(self.connect_attempts),
        }
    }
}

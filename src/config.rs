use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub sealing: SealingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_backend")]
    pub backend: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token for the maintenance endpoints. Empty disables them.
    #[serde(default)]
    pub admin_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_short_id_length")]
    pub short_id_length: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_list_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 32-byte key, base64 encoded. Required when `enabled` is true.
    #[serde(default)]
    pub key_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_database_backend() -> String {
    "sqlite".to_string()
}

fn default_database_url() -> String {
    "sqlite://snipbin.db?mode=rwc".to_string()
}

fn default_cache_backend() -> String {
    "memory".to_string()
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_cache_capacity() -> u64 {
    1024
}

fn default_short_id_length() -> usize {
    8
}

fn default_recent_limit() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            api: ApiConfig::default(),
            features: FeatureConfig::default(),
            sealing: SealingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_database_backend(),
            database_url: default_database_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            default_ttl: default_cache_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            admin_token: String::new(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            short_id_length: default_short_id_length(),
            recent_list_limit: default_recent_limit(),
        }
    }
}

impl Default for SealingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            key_base64: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file with environment variable fallback
    pub fn load() -> Self {
        let mut config = Self::load_from_file();
        config.override_with_env();
        config
    }

    fn load_from_file() -> Self {
        let config_paths = ["config.toml", "snipbin.toml", "/etc/snipbin/config.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                debug!("Loading config from: {}", path);
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<Config>(&content) {
                        Ok(config) => {
                            debug!("Successfully loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    fn override_with_env(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(backend) = env::var("DATABASE_BACKEND") {
            self.database.backend = backend;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            self.database.database_url = database_url;
        }

        if let Ok(backend) = env::var("CACHE_BACKEND") {
            self.cache.backend = backend;
        }
        if let Ok(ttl) = env::var("CACHE_TTL") {
            if let Ok(ttl) = ttl.parse() {
                self.cache.default_ttl = ttl;
            }
        }

        if let Ok(admin_token) = env::var("ADMIN_TOKEN") {
            self.api.admin_token = admin_token;
        }

        if let Ok(length) = env::var("SHORT_ID_LENGTH") {
            if let Ok(length) = length.parse() {
                self.features.short_id_length = length;
            }
        }

        if let Ok(enabled) = env::var("SEALING_ENABLED") {
            self.sealing.enabled = enabled == "true";
        }
        if let Ok(key) = env::var("SEALING_KEY_BASE64") {
            self.sealing.key_base64 = key;
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            self.logging.level = log_level;
        }
    }
}

// Global configuration instance
use std::sync::OnceLock;
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

/// Initialize the global configuration
pub fn init_config() {
    CONFIG.get_or_init(Config::load);
}

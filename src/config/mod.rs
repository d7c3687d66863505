//! Runtime configuration
//!
//! All settings come from environment variables layered over serde
//! defaults. Required credentials are checked by [`AppConfig::validate`]
//! before the server binds, so a missing secret is a startup failure
//! rather than a remote authentication error mid-request.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration error raised during startup validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Vision classification service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Analyze endpoint URL
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,

    /// Subscription key (read from env VISION_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Feature selection sent as the `visualFeatures` query parameter
    #[serde(default = "default_visual_features")]
    pub visual_features: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Telegram messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Bot token (read from env TELEGRAM_BOT_TOKEN)
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Recipient chat id (read from env TELEGRAM_CHAT_ID)
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Send the simulated-alert template instead of the real
    /// prefecture alert when a pollution tag is detected
    #[serde(default)]
    pub simulate: bool,
}

/// Upload persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_vision_endpoint() -> String {
    "http://localhost:9090/vision/v3.2/analyze".to_string()
}
fn default_visual_features() -> String {
    "Categories,Description,Tags".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_vision_endpoint(),
            api_key: None,
            visual_features: default_visual_features(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            bot_token: None,
            chat_id: None,
            timeout_ms: default_timeout_ms(),
            simulate: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration: serde defaults overridden by the environment
    pub fn load() -> Self {
        Self::default().from_env()
    }

    /// Override fields with environment variables where present
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("BIND_ADDR") {
            self.server.bind_addr = val;
        }

        if let Ok(val) = std::env::var("MAX_UPLOAD_BYTES") {
            if let Ok(bytes) = val.parse() {
                self.server.max_upload_bytes = bytes;
            }
        }

        if let Ok(val) = std::env::var("VISION_ENDPOINT") {
            self.vision.endpoint = val;
        }

        if let Ok(val) = std::env::var("VISION_API_KEY") {
            self.vision.api_key = Some(val);
        }

        if let Ok(val) = std::env::var("VISION_FEATURES") {
            self.vision.visual_features = val;
        }

        if let Ok(val) = std::env::var("VISION_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.vision.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("TELEGRAM_API_BASE") {
            self.telegram.api_base = val;
        }

        if let Ok(val) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(val);
        }

        if let Ok(val) = std::env::var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(val);
        }

        if let Ok(val) = std::env::var("TELEGRAM_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.telegram.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("TELEGRAM_SIMULATE") {
            self.telegram.simulate = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(val);
        }

        self
    }

    /// Check that every required credential is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vision.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("VISION_API_KEY"));
        }
        if self.telegram.bot_token.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"));
        }
        if self.telegram.chat_id.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("TELEGRAM_CHAT_ID"));
        }
        Ok(())
    }
}

impl VisionConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl TelegramConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Configuration system for the Signa gesture service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Network and session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum concurrently open streaming sessions
    pub max_sessions: usize,
    /// Per-frame processing budget in milliseconds, 0 disables the bound
    pub frame_timeout_ms: u64,
    /// Largest accepted message payload in bytes
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_sessions: 1000,
            frame_timeout_ms: 0,
            max_frame_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub model_dir: PathBuf,
    pub classifier_path: PathBuf,
    /// Expected SHA-256 of the classifier artifact, hex encoded
    pub classifier_sha256: Option<String>,
    pub landmarker_path: Option<PathBuf>,
    pub min_detection_confidence: f32,
    pub inference_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./models"),
            classifier_path: PathBuf::from("./models/asl_classifier.onnx"),
            classifier_sha256: None,
            landmarker_path: None,
            min_detection_confidence: 0.7,
            inference_threads: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignaConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub logging: LoggingConfig,
}

impl SignaConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        if path.contains("..") {
            return Err(ConfigError::IoError(format!(
                "Path traversal detected: '{}'",
                path
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_str(&content)
    }

    /// Load configuration from string. JSON, TOML and YAML are tried in that order.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        if let Ok(config) = serde_json::from_str::<SignaConfig>(content) {
            return Ok(config);
        }

        if let Ok(config) = toml::from_str::<SignaConfig>(content) {
            return Ok(config);
        }

        if let Ok(config) = serde_yaml::from_str::<SignaConfig>(content) {
            return Ok(config);
        }

        Err(ConfigError::ParseError("Unknown format".to_string()))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `SIGNA_*` environment overrides on top of the current values
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SIGNA_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("SIGNA_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                self.server.port = p;
            }
        }

        if let Ok(dir) = std::env::var("SIGNA_MODEL_DIR") {
            self.models.model_dir = PathBuf::from(dir);
        }

        if let Ok(path) = std::env::var("SIGNA_CLASSIFIER_PATH") {
            self.models.classifier_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("SIGNA_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port cannot be 0".to_string()
            ));
        }

        if self.server.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_sessions must be > 0".to_string()
            ));
        }

        if self.server.max_frame_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_frame_bytes must be > 0".to_string()
            ));
        }

        let confidence = self.models.min_detection_confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ConfigError::ValidationError(
                "models.min_detection_confidence must be within [0, 1]".to_string()
            ));
        }

        if self.models.inference_threads == 0 {
            return Err(ConfigError::ValidationError(
                "models.inference_threads must be > 0".to_string()
            ));
        }

        if let Some(checksum) = &self.models.classifier_sha256 {
            if checksum.len() != 64 || !checksum.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::ValidationError(
                    "models.classifier_sha256 must be 64 hex characters".to_string()
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Configuration(err.to_string())
    }
}

pub mod types;
pub mod error;
pub mod config;

pub use error::{Error, Result};
pub use types::{
    FeatureVector, GestureLabel, HandPose, Landmark, FEATURE_LEN, NUM_LANDMARKS,
};
pub use config::{SignaConfig, ServerConfig, ModelsConfig, LoggingConfig, ConfigError};

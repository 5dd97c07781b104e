//! Error types for chatter
//!
//! Shutdown is not an error: loops report it through their return values
//! (`Rate::sleep` returning `false`, `Received::Shutdown`).

use thiserror::Error;

/// Errors raised by the node runtime and its transports
#[derive(Debug, Error)]
pub enum ChatterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid topic name '{name}': {reason}")]
    InvalidTopic { name: String, reason: String },

    #[error("Session creation failed: {0}")]
    Session(String),

    #[error("Publisher creation failed for '{topic}': {message}")]
    Publisher { topic: String, message: String },

    #[error("Subscriber creation failed for '{topic}': {message}")]
    Subscriber { topic: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization of {type_name} failed: {message}")]
    Deserialization { type_name: String, message: String },

    #[error("Send on '{topic}' failed: {message}")]
    Send { topic: String, message: String },

    #[error("Channel '{0}' disconnected")]
    Disconnected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatterError {
    pub fn config(msg: impl Into<String>) -> Self {
        ChatterError::Config(msg.into())
    }

    pub fn invalid_topic(name: &str, reason: impl Into<String>) -> Self {
        ChatterError::InvalidTopic {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across chatter
pub type ChatterResult<T> = std::result::Result<T, ChatterError>;

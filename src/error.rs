//! Error types for vdraft.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VdraftError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Microphone access denied: {message}")]
    PermissionDenied { message: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Remote call errors, by failure mode
    #[error("No response from server: {message}")]
    Network { message: String },

    #[error("Server error: {message}")]
    Service { message: String },

    #[error("Unexpected response shape: {message}")]
    DataShape { message: String },

    #[error("Failed to build request: {message}")]
    RequestSetup { message: String },

    // Form state errors
    #[error("Editor already open on field {index}; save or cancel it first")]
    EditorOpen { index: usize },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VdraftError {
    /// True for failures the user can recover from by retrying the same
    /// action (device access, dropped connections, transient server errors).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VdraftError::PermissionDenied { .. }
                | VdraftError::Network { .. }
                | VdraftError::Service { .. }
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VdraftError>;

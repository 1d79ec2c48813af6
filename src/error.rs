//! Error types for vitrine

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vitrine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vitrine
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Settings Errors
    // -------------------------------------------------------------------------
    #[error("Unknown setting key: {0}")]
    UnknownSettingKey(String),

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Request failed with status {status}: {message}")]
    Transport { status: u16, message: String },

    #[error("Backend storage unavailable, nothing was persisted")]
    DegradedBackend,

    #[error("Another settings request is still in flight")]
    SaveInProgress,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    // -------------------------------------------------------------------------
    // Template Errors
    // -------------------------------------------------------------------------
    #[error("Template '{template}' is missing edit paths: {}", missing.join(", "))]
    ContractViolation {
        template: String,
        missing: Vec<String>,
    },

    // -------------------------------------------------------------------------
    // Preview Errors
    // -------------------------------------------------------------------------
    #[error("Preview surface is not ready")]
    SurfaceNotReady,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error means a settings write did not land
    #[must_use]
    pub fn is_save_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::DegradedBackend | Error::SaveInProgress
        )
    }

    /// Check if this is a settings validation error
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownSettingKey(_) | Error::InvalidSettingValue { .. }
        )
    }

    /// Message shown in the editor's dismissable banner
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport { .. } | Error::DegradedBackend => {
                "Could not save your changes. Please try again.".to_string()
            }
            Error::SaveInProgress => "Still saving, please wait.".to_string(),
            Error::UploadFailed(_) => "Upload failed.".to_string(),
            other => other.to_string(),
        }
    }
}

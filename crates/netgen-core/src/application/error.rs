//! Application layer errors.
//!
//! These errors represent failures in orchestration and at the ports, not
//! composition rules. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A configuration document could not be read or parsed.
    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    /// The global configuration document does not exist.
    #[error("Global configuration not found at {path}")]
    GlobalConfigMissing { path: PathBuf },

    /// No defaults file for a device type.
    #[error("Device type config not found: {path}")]
    DeviceTypeNotFound { device_type: String, path: PathBuf },

    /// The batch document is missing or malformed.
    #[error("Invalid batch file {path}: {reason}")]
    InvalidBatch { path: PathBuf, reason: String },

    /// Neither a template file nor a built-in emitter exists for the key.
    #[error("Template not found: {key}")]
    TemplateNotFound { key: String },

    /// Template rendering failed.
    #[error("Template rendering failed for {key}: {reason}")]
    RenderingFailed { key: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A serial console could not be opened or used.
    #[error("Serial port {port}: {reason}")]
    SerialPortFailed { port: String, reason: String },

    /// Interactive input was required but cannot be obtained.
    #[error("Cannot prompt for '{prompt}': {reason}")]
    PromptUnavailable { prompt: String, reason: String },

    /// Shared state access failed (lock poisoned).
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::LoadFailed { path, .. } => vec![
                format!("Check the YAML syntax of {}", path.display()),
                "Indentation must use spaces, not tabs".into(),
            ],
            Self::GlobalConfigMissing { path } => vec![
                format!("Create the global configuration at {}", path.display()),
                "Or point --config-dir at the directory that contains it".into(),
            ],
            Self::DeviceTypeNotFound { device_type, path } => vec![
                format!("Add defaults for '{device_type}' at {}", path.display()),
                "Check the spelling of device_type".into(),
            ],
            Self::InvalidBatch { .. } => vec![
                "The batch file must look like: devices: [ {hostname: ..., vendor: ..., device_type: ...} ]"
                    .into(),
            ],
            Self::TemplateNotFound { key } => vec![
                format!("Add a template named {key}.j2 to the templates directory"),
                "List available templates: netgen templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::SerialPortFailed { .. } => vec![
                "Verify that the port name is correct and the cable is connected".into(),
                "Example port names: /dev/ttyUSB0 (Linux), COM3 (Windows), /dev/tty.usbserial-XXXX (macOS)"
                    .into(),
            ],
            Self::PromptUnavailable { .. } => vec![
                "Run from an interactive terminal".into(),
                "Or supply the secret in the batch file or its environment variable".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LoadFailed { .. } | Self::InvalidBatch { .. } => ErrorCategory::Configuration,
            Self::GlobalConfigMissing { .. } => ErrorCategory::Configuration,
            Self::DeviceTypeNotFound { .. } | Self::TemplateNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::RenderingFailed { .. } => ErrorCategory::Rendering,
            Self::PromptUnavailable { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::SerialPortFailed { .. } | Self::StoreLockError => {
                ErrorCategory::Internal
            }
        }
    }
}

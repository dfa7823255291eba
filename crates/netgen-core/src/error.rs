//! Unified error handling for netgen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for netgen core operations.
#[derive(Debug, Error, Clone)]
pub enum NetgenError {
    /// Errors from the domain layer (rule violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and port failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl NetgenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Whether the failure is scoped to a single device.
    ///
    /// Device-scoped failures skip that device and let the batch continue;
    /// anything else invalidates the whole run.
    pub fn is_device_scoped(&self) -> bool {
        match self {
            Self::Domain(e) => e.category() == crate::domain::ErrorCategory::Validation,
            Self::Application(e) => matches!(
                e,
                ApplicationError::DeviceTypeNotFound { .. }
                    | ApplicationError::TemplateNotFound { .. }
                    | ApplicationError::RenderingFailed { .. }
                    | ApplicationError::LoadFailed { .. }
                    | ApplicationError::FilesystemError { .. }
            ),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Rendering,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type NetgenResult<T> = Result<T, NetgenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_field_is_device_scoped() {
        let err: NetgenError = DomainError::MissingRequiredField { field: "hostname" }.into();
        assert!(err.is_device_scoped());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn missing_template_is_device_scoped() {
        let err: NetgenError = ApplicationError::TemplateNotFound { key: "x_y".into() }.into();
        assert!(err.is_device_scoped());
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn prompt_unavailable_aborts() {
        let err: NetgenError = ApplicationError::PromptUnavailable {
            prompt: "Enable password".into(),
            reason: "not a terminal".into(),
        }
        .into();
        assert!(!err.is_device_scoped());
    }

    #[test]
    fn missing_global_config_aborts() {
        let err: NetgenError = ApplicationError::GlobalConfigMissing {
            path: PathBuf::from("config/global.yml"),
        }
        .into();
        assert!(!err.is_device_scoped());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn invalid_document_aborts() {
        let err: NetgenError = DomainError::InvalidDocument("empty".into()).into();
        assert!(!err.is_device_scoped());
    }
}

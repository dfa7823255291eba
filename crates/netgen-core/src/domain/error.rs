// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep a copy per skipped device)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Field '{field}' must be a {expected}, found {found}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid hostname '{hostname}': {reason}")]
    InvalidHostname { hostname: String, reason: String },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidKeyPart {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Invalid IP address: '{value}'")]
    InvalidIpAddress { value: String },

    #[error("Invalid choice '{input}'")]
    InvalidChoice { input: String, options: Vec<String> },

    #[error("A value is required for '{prompt}'")]
    EmptyValue { prompt: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Add '{field}' to the device entry"),
                "Every device needs vendor, device_type and hostname".into(),
            ],
            Self::InvalidHostname { .. } => vec![
                "The hostname becomes the output file name".into(),
                "Use letters, digits, '-' and '_' only".into(),
            ],
            Self::InvalidKeyPart { field, .. } => vec![
                format!("'{field}' is part of the template file name"),
                "Use letters, digits, '-' and '_' only".into(),
            ],
            Self::InvalidIpAddress { value } => vec![
                format!("'{value}' is not an IPv4 or IPv6 literal"),
                "Example: 10.255.0.1".into(),
            ],
            Self::InvalidChoice { options, .. } => {
                let mut out = vec!["Pick one of the listed options by number or name:".into()];
                out.extend(
                    options
                        .iter()
                        .enumerate()
                        .map(|(i, o)| format!("  {}. {o}", i + 1)),
                );
                out
            }
            Self::InvalidDocument(_) => vec![
                "Check the YAML structure of the file".into(),
                "The top level must be a mapping".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDocument(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}

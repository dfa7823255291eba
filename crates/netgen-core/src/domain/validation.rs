use std::net::IpAddr;

use crate::domain::error::DomainError;

/// Centralized input validation.
///
/// Every function returns a `Result`; interactive callers loop on `Err`
/// until the user supplies an acceptable answer.
pub struct DomainValidator;

impl DomainValidator {
    /// Parse an IPv4 or IPv6 literal (surrounding whitespace ignored).
    pub fn validate_ip(input: &str) -> Result<IpAddr, DomainError> {
        input
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| DomainError::InvalidIpAddress {
                value: input.trim().to_owned(),
            })
    }

    /// Resolve a menu answer against `options`.
    ///
    /// Accepts a 1-based index or an option name (case-insensitive). Returns
    /// the canonical option text.
    pub fn select_choice(input: &str, options: &[String]) -> Result<String, DomainError> {
        let answer = input.trim();
        let invalid = || DomainError::InvalidChoice {
            input: answer.to_owned(),
            options: options.to_vec(),
        };

        if answer.is_empty() {
            return Err(invalid());
        }

        if let Ok(index) = answer.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| options.get(i))
                .cloned()
                .ok_or_else(invalid);
        }

        options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(answer))
            .cloned()
            .ok_or_else(invalid)
    }

    /// Reject answers that are empty after trimming.
    pub fn require_non_empty(input: &str, prompt: &str) -> Result<String, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Err(DomainError::EmptyValue {
                prompt: prompt.to_owned(),
            })
        } else {
            Ok(trimmed.to_owned())
        }
    }

    /// A hostname must be a plain file name: it becomes `{hostname}.config`.
    pub fn validate_hostname(hostname: &str) -> Result<(), DomainError> {
        let reason = if hostname.starts_with('.') {
            Some("cannot start with '.'")
        } else if hostname.contains('/') || hostname.contains('\\') {
            Some("cannot contain path separators")
        } else if hostname.chars().any(char::is_whitespace) {
            Some("cannot contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidHostname {
                hostname: hostname.to_owned(),
                reason: reason.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// A template-key component must not walk out of the templates directory.
    pub fn validate_key_part(field: &'static str, value: &str) -> Result<(), DomainError> {
        let reason = if value.starts_with('.') {
            "cannot start with '.'"
        } else if value.contains('/') || value.contains('\\') {
            "cannot contain path separators"
        } else {
            return Ok(());
        };
        Err(DomainError::InvalidKeyPart {
            field,
            value: value.to_owned(),
            reason,
        })
    }
}

//! Secret requests and the inline (descriptor) tier of resolution.

use std::fmt;

use crate::domain::value::{ConfigMapping, ConfigValue, DottedPath};

/// One credential to resolve: where it lives in the descriptor, which
/// environment variable may supply it, and what to ask the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRequest {
    pub path: DottedPath,
    pub env_var: String,
    pub prompt: String,
}

impl SecretRequest {
    pub fn new(
        path: impl Into<String>,
        env_var: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            path: DottedPath::new(path),
            env_var: env_var.into(),
            prompt: prompt.into(),
        }
    }

    /// Inline value at `path`, when present and truthy.
    ///
    /// Scalars are returned in their text form. Traversal through a
    /// non-mapping counts as absent.
    pub fn inline_value(&self, source: &ConfigMapping) -> Option<String> {
        self.path
            .lookup(source)
            .filter(|v| v.is_truthy())
            .and_then(|v| v.to_scalar_string())
    }

    /// True when the descriptor already carries a truthy value at `path`,
    /// scalar or not. Such a value is never replaced.
    pub fn is_supplied(&self, source: &ConfigMapping) -> bool {
        self.path.lookup(source).is_some_and(ConfigValue::is_truthy)
    }
}

/// The credentials every device needs, with their default environment
/// variables.
pub fn default_requests() -> Vec<SecretRequest> {
    vec![
        SecretRequest::new("enable_password", "NETGEN_ENABLE_PASSWORD", "Enable password"),
        SecretRequest::new(
            "fallback_user_password",
            "NETGEN_FALLBACK_USER_PASSWORD",
            "Fallback user password",
        ),
        SecretRequest::new("tacacs.key", "NETGEN_TACACS_KEY", "TACACS key"),
        SecretRequest::new("snmp.key", "NETGEN_SNMP_AUTH_KEY", "SNMP SHA key"),
        SecretRequest::new("snmp.privacy_key", "NETGEN_SNMP_PRIV_KEY", "SNMP AES key"),
    ]
}

/// Which tier produced a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Descriptor,
    Environment,
    Prompt,
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descriptor => "descriptor",
            Self::Environment => "environment",
            Self::Prompt => "prompt",
        })
    }
}

/// A resolved credential. `Debug` redacts the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    value: String,
    source: SecretSource,
}

impl ResolvedSecret {
    pub fn new(value: impl Into<String>, source: SecretSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> SecretSource {
        self.source
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ConfigValue, mapping};

    #[test]
    fn inline_value_found() {
        let req = SecretRequest::new("tacacs.key", "X", "TACACS key");
        let src = mapping! { "tacacs" => mapping! { "key" => "abc" } };
        assert_eq!(req.inline_value(&src).as_deref(), Some("abc"));
    }

    #[test]
    fn falsy_inline_value_is_absent() {
        let req = SecretRequest::new("enable_password", "X", "Enable");
        assert!(req.inline_value(&mapping! { "enable_password" => "" }).is_none());
        assert!(req.inline_value(&mapping! { "enable_password" => 0_i64 }).is_none());
        assert!(req.inline_value(&mapping! { "enable_password" => ConfigValue::Null }).is_none());
    }

    #[test]
    fn numeric_inline_value_as_text() {
        let req = SecretRequest::new("enable_password", "X", "Enable");
        let src = mapping! { "enable_password" => 1234_i64 };
        assert_eq!(req.inline_value(&src).as_deref(), Some("1234"));
    }

    #[test]
    fn traversal_through_scalar_is_absent() {
        let req = SecretRequest::new("snmp.key", "X", "SNMP");
        assert!(req.inline_value(&mapping! { "snmp" => "v2c" }).is_none());
    }

    #[test]
    fn collection_value_counts_as_supplied() {
        let req = SecretRequest::new("enable_password", "X", "Enable");
        let src = mapping! { "enable_password" => vec![ConfigValue::from("a")] };
        assert!(req.is_supplied(&src));
        assert!(req.inline_value(&src).is_none());
        assert!(!req.is_supplied(&mapping! { "enable_password" => Vec::<ConfigValue>::new() }));
    }

    #[test]
    fn debug_redacts() {
        let s = ResolvedSecret::new("hunter2", SecretSource::Prompt);
        assert!(!format!("{s:?}").contains("hunter2"));
    }

    #[test]
    fn default_catalogue_paths() {
        let paths: Vec<_> = default_requests()
            .into_iter()
            .map(|r| r.path.as_str().to_owned())
            .collect();
        assert!(paths.contains(&"enable_password".to_owned()));
        assert!(paths.contains(&"fallback_user_password".to_owned()));
    }
}

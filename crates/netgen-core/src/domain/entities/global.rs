//! The global configuration document.

use crate::domain::{
    error::DomainError,
    value::{ConfigMapping, ConfigValue},
};

/// Keys copied verbatim from the global document into the record.
///
/// They are atomic blocks (command lists, banner text, the fallback user
/// definition) and are never deep-merged.
pub const VERBATIM_KEYS: [&str; 3] = ["base_commands", "banner_text", "fallback_user"];

/// Typed view over the global configuration mapping.
///
/// The underlying mapping is kept whole: accessors read the well-known keys
/// and treat missing or wrongly-typed sections as empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalConfig {
    raw: ConfigMapping,
}

impl GlobalConfig {
    pub fn new(raw: ConfigMapping) -> Self {
        Self { raw }
    }

    /// Wrap a loaded document, rejecting anything but a non-empty mapping.
    pub fn from_document(value: ConfigValue) -> Result<Self, DomainError> {
        match value {
            ConfigValue::Mapping(raw) if !raw.is_empty() => Ok(Self { raw }),
            ConfigValue::Mapping(_) | ConfigValue::Null => Err(DomainError::InvalidDocument(
                "global configuration is empty".into(),
            )),
            other => Err(DomainError::InvalidDocument(format!(
                "global configuration must be a mapping, found {}",
                other.kind()
            ))),
        }
    }

    pub fn raw(&self) -> &ConfigMapping {
        &self.raw
    }

    fn section(&self, key: &str) -> Option<&ConfigMapping> {
        self.raw.get(key).and_then(ConfigValue::as_mapping)
    }

    /// `default_configs`, if present and a mapping.
    pub fn default_configs(&self) -> Option<&ConfigMapping> {
        self.section("default_configs")
    }

    /// `default_capabilities`, if present and a mapping.
    pub fn default_capabilities(&self) -> Option<&ConfigMapping> {
        self.section("default_capabilities")
    }

    /// Verbatim blocks present in the document, in declaration order.
    pub fn verbatim_blocks(&self) -> impl Iterator<Item = (&'static str, &ConfigValue)> {
        VERBATIM_KEYS
            .into_iter()
            .filter_map(|key| self.raw.get(key).map(|v| (key, v)))
    }

    /// Override mapping for `region` (already lower-cased by the caller).
    pub fn region(&self, region: &str) -> Option<&ConfigMapping> {
        self.section("regions")?.get(region)?.as_mapping()
    }

    /// Region names declared under `regions`.
    pub fn region_names(&self) -> Vec<String> {
        self.section("regions")
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// `validation_data.vendors` as strings.
    pub fn vendors(&self) -> Vec<String> {
        self.validation_list("vendors")
    }

    /// `validation_data.template_styles`: the device types offered in
    /// interactive mode.
    pub fn template_styles(&self) -> Vec<String> {
        self.validation_list("template_styles")
    }

    /// `supports_loopback` flag (defaults to false).
    pub fn supports_loopback(&self) -> bool {
        self.raw
            .get("supports_loopback")
            .and_then(ConfigValue::as_bool)
            .unwrap_or(false)
    }

    fn validation_list(&self, key: &str) -> Vec<String> {
        self.section("validation_data")
            .and_then(|v| v.get(key))
            .and_then(ConfigValue::as_sequence)
            .map(|items| items.iter().filter_map(ConfigValue::to_scalar_string).collect())
            .unwrap_or_default()
    }
}

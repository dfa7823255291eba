//! Device descriptors and the template key derived from them.

use std::fmt;

use crate::domain::{
    error::DomainError,
    validation::DomainValidator,
    value::{ConfigMapping, ConfigValue},
};

/// Required descriptor fields, checked in this order.
pub const REQUIRED_FIELDS: [&str; 3] = ["vendor", "device_type", "hostname"];

/// Per-device input record.
///
/// Invariant: `vendor`, `device_type` and `hostname` are non-empty strings,
/// and `hostname` is usable as a file name. The full mapping is kept as the
/// device-specific layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    vendor: String,
    device_type: String,
    hostname: String,
    data: ConfigMapping,
}

impl DeviceDescriptor {
    /// Validate a raw mapping into a descriptor.
    pub fn try_from_mapping(data: ConfigMapping) -> Result<Self, DomainError> {
        let vendor = required_string(&data, "vendor")?;
        let device_type = required_string(&data, "device_type")?;
        let hostname = required_string(&data, "hostname")?;
        DomainValidator::validate_key_part("vendor", &vendor)?;
        DomainValidator::validate_hostname(&hostname)?;

        Ok(Self {
            vendor: vendor.to_lowercase(),
            device_type: device_type.to_lowercase(),
            hostname,
            data,
        })
    }

    /// Lower-cased vendor.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Lower-cased device type.
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Lower-cased `region`, empty when absent or not a string.
    pub fn region(&self) -> String {
        self.data
            .get("region")
            .and_then(ConfigValue::as_str)
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    pub fn template_key(&self) -> TemplateKey {
        TemplateKey::new(&self.vendor, &self.device_type)
    }

    /// Deterministic output file name.
    pub fn output_file_name(&self) -> String {
        format!("{}.config", self.hostname)
    }

    pub fn data(&self) -> &ConfigMapping {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ConfigMapping {
        &mut self.data
    }

    pub fn into_data(self) -> ConfigMapping {
        self.data
    }
}

fn required_string(data: &ConfigMapping, field: &'static str) -> Result<String, DomainError> {
    match data.get(field) {
        None | Some(ConfigValue::Null) => Err(DomainError::MissingRequiredField { field }),
        Some(ConfigValue::String(s)) if s.trim().is_empty() => {
            Err(DomainError::MissingRequiredField { field })
        }
        Some(ConfigValue::String(s)) => Ok(s.trim().to_owned()),
        Some(other) => Err(DomainError::InvalidFieldType {
            field: field.to_owned(),
            expected: "string",
            found: other.kind(),
        }),
    }
}

/// Best-effort label for a raw descriptor in logs, before validation.
pub fn describe_raw(data: &ConfigMapping, index: usize) -> String {
    data.get("hostname")
        .and_then(ConfigValue::as_str)
        .filter(|h| !h.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("device #{}", index + 1))
}

/// `{vendor}_{device_type}` identifier selecting a template or emitter.
///
/// Keys built from a descriptor remember their vendor, since vendor names may
/// themselves contain `_`. Keys read back from file names only carry text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateKey {
    name: String,
    vendor: Option<String>,
}

impl TemplateKey {
    pub fn new(vendor: &str, device_type: &str) -> Self {
        let vendor = vendor.to_lowercase();
        Self {
            name: format!("{vendor}_{}", device_type.to_lowercase()),
            vendor: Some(vendor),
        }
    }

    /// Wrap an already-formed key (e.g. a template file stem).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            name: raw.into(),
            vendor: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The vendor this key was built from; `None` for raw keys.
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

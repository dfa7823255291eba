//! YAML layer store.
//!
//! Reads the global document, per-device-type defaults and batch documents
//! from disk and converts them into the core [`ConfigValue`] model.
//!
//! # Directory layout expected
//!
//! ```text
//! config/
//! ├── global.yml          ← global document (name configurable)
//! ├── access_switch.yml   ← one file per device type
//! └── core_switch.yml
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_yaml::Value as Yaml;
use tracing::{debug, instrument};

use netgen_core::{
    application::{ApplicationError, ports::LayerStore},
    domain::{ConfigMapping, ConfigValue, GlobalConfig},
    error::NetgenResult,
};

/// Default file name of the global document inside the config directory.
pub const DEFAULT_GLOBAL_FILE: &str = "global.yml";

/// Production layer store backed by YAML files.
#[derive(Debug, Clone)]
pub struct YamlLayerStore {
    config_dir: PathBuf,
    global_file: PathBuf,
}

impl YamlLayerStore {
    /// Store rooted at `config_dir` with the default global file name.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            global_file: config_dir.join(DEFAULT_GLOBAL_FILE),
            config_dir,
        }
    }

    /// Use a different global document. Relative paths are taken from the
    /// config directory.
    pub fn with_global_file(mut self, file: impl AsRef<Path>) -> Self {
        self.global_file = self.config_dir.join(file);
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn global_file(&self) -> &Path {
        &self.global_file
    }

    /// Path of the defaults document for one device type.
    pub fn device_type_path(&self, device_type: &str) -> PathBuf {
        self.config_dir.join(format!("{device_type}.yml"))
    }
}

impl LayerStore for YamlLayerStore {
    #[instrument(skip(self), fields(path = %self.global_file.display()))]
    fn load_global(&self) -> NetgenResult<GlobalConfig> {
        let document = match read_document(&self.global_file)? {
            Some(document) => document,
            None => {
                return Err(ApplicationError::GlobalConfigMissing {
                    path: self.global_file.clone(),
                }
                .into());
            }
        };
        let global = GlobalConfig::from_document(document)?;
        debug!(regions = global.region_names().len(), "Global configuration loaded");
        Ok(global)
    }

    #[instrument(skip(self))]
    fn load_device_type(&self, device_type: &str) -> NetgenResult<ConfigMapping> {
        let path = self.device_type_path(device_type);
        let not_found = || ApplicationError::DeviceTypeNotFound {
            device_type: device_type.to_owned(),
            path: path.clone(),
        };

        // Device types name files directly; anything that would leave the
        // config directory cannot match one.
        if device_type.is_empty() || device_type.contains(['/', '\\']) || device_type == ".." {
            return Err(not_found().into());
        }

        match read_document(&path)? {
            None => Err(not_found().into()),
            Some(ConfigValue::Null) => Ok(ConfigMapping::new()),
            Some(ConfigValue::Mapping(mapping)) => Ok(mapping),
            Some(other) => Err(ApplicationError::LoadFailed {
                path: path.clone(),
                reason: format!("expected a mapping, found {}", other.kind()),
            }
            .into()),
        }
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn load_batch(&self, path: &Path) -> NetgenResult<Vec<ConfigMapping>> {
        let invalid = |reason: String| ApplicationError::InvalidBatch {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => invalid("file not found".into()),
            _ => invalid(e.to_string()),
        })?;
        let document: Yaml = serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?;

        let ConfigValue::Mapping(mut root) = yaml_to_value(document) else {
            return Err(invalid("expected a mapping with a 'devices' list".into()).into());
        };
        let Some(ConfigValue::Sequence(entries)) = root.remove("devices") else {
            return Err(invalid("missing 'devices' list".into()).into());
        };

        let devices = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                ConfigValue::Mapping(m) => Ok(m),
                other => Err(invalid(format!(
                    "device #{} is a {}, expected a mapping",
                    i + 1,
                    other.kind()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(devices = devices.len(), "Batch loaded");
        Ok(devices)
    }
}

/// Read and parse one YAML document. `Ok(None)` when the file does not exist.
fn read_document(path: &Path) -> NetgenResult<Option<ConfigValue>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ApplicationError::LoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into());
        }
    };

    let document: Yaml = serde_yaml::from_str(&text).map_err(|e| ApplicationError::LoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(yaml_to_value(document)))
}

/// Convert a parsed YAML node into the core value model.
///
/// Non-string keys are stringified; tags are dropped.
pub fn yaml_to_value(node: Yaml) -> ConfigValue {
    match node {
        Yaml::Null => ConfigValue::Null,
        Yaml::Bool(b) => ConfigValue::Bool(b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::Integer(i),
            None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Yaml::String(s) => ConfigValue::String(s),
        Yaml::Sequence(items) => {
            ConfigValue::Sequence(items.into_iter().map(yaml_to_value).collect())
        }
        Yaml::Mapping(entries) => ConfigValue::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_value(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn key_to_string(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_owned(),
        Yaml::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_owned())
            .unwrap_or_default(),
    }
}

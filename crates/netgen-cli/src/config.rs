//! Tool configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns it; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, see [`AppConfig::apply_overrides`])
//! 2. `NETGEN_*` environment variables, `__` between sections
//!    (e.g. `NETGEN_PATHS__OUTPUT_DIR=out`)
//! 3. Config file: `--config`, else `./netgen.toml`, else the platform path
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use netgen_core::domain::{SecretRequest, default_requests};

use crate::cli::GlobalArgs;

/// Name of the per-directory config file written by `netgen init --local`.
pub const LOCAL_CONFIG_FILE: &str = "netgen.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sinks.
    pub logging: LoggingConfig,
    /// Environment variable consulted for each credential.
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub config_dir: PathBuf,
    /// File name of the global document, relative to `config_dir`.
    pub global_file: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            global_file: PathBuf::from(netgen_adapters::layers::DEFAULT_GLOBAL_FILE),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output_configs"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs here (plain text, no colours).
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub enable_password: String,
    pub fallback_user_password: String,
    pub tacacs_key: String,
    pub snmp_auth_key: String,
    pub snmp_priv_key: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            enable_password: "NETGEN_ENABLE_PASSWORD".into(),
            fallback_user_password: "NETGEN_FALLBACK_USER_PASSWORD".into(),
            tacacs_key: "NETGEN_TACACS_KEY".into(),
            snmp_auth_key: "NETGEN_SNMP_AUTH_KEY".into(),
            snmp_priv_key: "NETGEN_SNMP_PRIV_KEY".into(),
        }
    }
}

impl SecretsConfig {
    fn env_var_for(&self, path: &str) -> Option<&str> {
        match path {
            "enable_password" => Some(&self.enable_password),
            "fallback_user_password" => Some(&self.fallback_user_password),
            "tacacs.key" => Some(&self.tacacs_key),
            "snmp.key" => Some(&self.snmp_auth_key),
            "snmp.privacy_key" => Some(&self.snmp_priv_key),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment on top of the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::active_path(), false),
        };

        let settings = Config::builder()
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix("NETGEN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("reading configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Apply the path and colour flags given on the command line.
    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(dir) = &args.config_dir {
            self.paths.config_dir = dir.clone();
        }
        if let Some(dir) = &args.templates_dir {
            self.paths.templates_dir = dir.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.paths.output_dir = dir.clone();
        }
        if let Some(file) = &args.log_file {
            self.logging.file = Some(file.clone());
        }
        if args.no_color {
            self.output.no_color = true;
        }
    }

    /// Credentials to resolve for every device, using the configured
    /// environment variable names.
    pub fn secret_requests(&self) -> Vec<SecretRequest> {
        default_requests()
            .into_iter()
            .map(|mut request| {
                if let Some(var) = self.secrets.env_var_for(request.path.as_str()) {
                    request.env_var = var.to_owned();
                }
                request
            })
            .collect()
    }

    /// Value at a dotted key such as `paths.output_dir`, rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        let node = key
            .split('.')
            .try_fold(&tree, |node, segment| node.get(segment))?;
        Some(match node {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// The file `load(None)` reads: `./netgen.toml` when present, else the
    /// platform path.
    pub fn active_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `netgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "netgen", "netgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

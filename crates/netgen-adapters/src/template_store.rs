//! Directory-backed template store.
//!
//! Templates live as `{vendor}_{device_type}.j2` files in one flat directory.
//!
//! # Resolution order
//!
//! 1. `{templates_dir}/{key}.j2`
//! 2. the built-in emitter for the key's vendor (see [`builtin_templates`])
//! 3. not found
//!
//! [`builtin_templates`]: crate::builtin_templates

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use netgen_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{Template, TemplateKey},
    error::NetgenResult,
};

use crate::builtin_templates;

/// Template file extension.
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Template store reading `.j2` files from a directory, with built-in
/// emitters as fallback.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    templates_dir: PathBuf,
    builtins: bool,
}

impl DirectoryTemplateStore {
    /// Create a store pointed at `templates_dir`.
    ///
    /// The directory does not need to exist; a missing directory simply
    /// holds no file templates.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            builtins: true,
        }
    }

    /// Disable the built-in emitter fallback.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    fn template_path(&self, key: &TemplateKey) -> PathBuf {
        self.templates_dir
            .join(format!("{key}.{TEMPLATE_EXTENSION}"))
    }
}

impl TemplateStore for DirectoryTemplateStore {
    #[instrument(skip(self), fields(key = %key))]
    fn find(&self, key: &TemplateKey) -> NetgenResult<Option<Template>> {
        let path = self.template_path(key);
        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!(path = %path.display(), "Using template file");
                return Ok(Some(Template::text(
                    key.clone(),
                    path.display().to_string(),
                    body,
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ApplicationError::LoadFailed {
                    path,
                    reason: e.to_string(),
                }
                .into());
            }
        }

        if let Some(vendor) = key
            .vendor()
            .filter(|vendor| self.builtins && builtin_templates::supports(vendor))
        {
            debug!(vendor, "Using built-in emitter");
            return Ok(Some(Template::builtin(key.clone(), vendor)));
        }

        Ok(None)
    }

    fn list(&self) -> NetgenResult<Vec<TemplateKey>> {
        let mut keys = Vec::new();

        if self.templates_dir.is_dir() {
            for entry in WalkDir::new(&self.templates_dir).min_depth(1).max_depth(1) {
                let entry = entry.map_err(|e| ApplicationError::LoadFailed {
                    path: self.templates_dir.clone(),
                    reason: e.to_string(),
                })?;
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
                {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(TemplateKey::from_raw(stem));
                }
            }
        } else {
            warn!(dir = %self.templates_dir.display(), "Templates directory not found");
        }
        keys.sort();

        if self.builtins {
            keys.extend(
                builtin_templates::VENDORS
                    .iter()
                    .map(|vendor| TemplateKey::from_raw(format!("{vendor}_*"))),
            );
        }
        Ok(keys)
    }
}

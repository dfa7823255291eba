//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `netgen-adapters` crate provides implementations; the CLI provides
//! the interactive [`Prompter`].

use std::path::Path;

use crate::domain::{ConfigMapping, GlobalConfig, Template, TemplateKey};
use crate::error::NetgenResult;

/// Port for loading configuration layers.
///
/// Implemented by:
/// - `netgen_adapters::layers::YamlLayerStore`
#[cfg_attr(test, mockall::automock)]
pub trait LayerStore: Send + Sync {
    /// Load the global configuration document.
    ///
    /// Missing or unparseable documents are fatal setup errors.
    fn load_global(&self) -> NetgenResult<GlobalConfig>;

    /// Load the defaults for one (lower-cased) device type.
    ///
    /// A missing document is `ApplicationError::DeviceTypeNotFound`.
    fn load_device_type(&self, device_type: &str) -> NetgenResult<ConfigMapping>;

    /// Load a batch document and return its raw device entries.
    fn load_batch(&self, path: &Path) -> NetgenResult<Vec<ConfigMapping>>;
}

/// Port for template lookup.
///
/// Implemented by:
/// - `netgen_adapters::template_store::DirectoryTemplateStore`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Find the template for a key. `Ok(None)` means "no template".
    fn find(&self, key: &TemplateKey) -> NetgenResult<Option<Template>>;

    /// All keys this store can serve.
    fn list(&self) -> NetgenResult<Vec<TemplateKey>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `netgen_adapters::renderer::TeraRenderer` (text templates + built-in emitters)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with the merged record as context.
    fn render(&self, template: &Template, record: &ConfigMapping) -> NetgenResult<String>;
}

/// Result of a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed and `overwrite` was set.
    Replaced,
    /// The file existed and was left untouched.
    AlreadyExists,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `netgen_adapters::filesystem::LocalFilesystem` (production)
/// - `netgen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> NetgenResult<()>;

    /// Write `content` to `path` as one all-or-nothing operation.
    ///
    /// The existence check and the write are atomic with respect to each
    /// other: without `overwrite`, an existing file is never replaced.
    fn write_file(&self, path: &Path, content: &str, overwrite: bool)
    -> NetgenResult<WriteOutcome>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for reading environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    /// Value of `name`, or `None` when unset or not valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}

/// Port for asking the operator for a secret.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Ask once, without echo. Returns the raw answer.
    ///
    /// Fails with `ApplicationError::PromptUnavailable` when no interactive
    /// terminal exists.
    fn ask_secret(&self, prompt: &str) -> NetgenResult<String>;
}

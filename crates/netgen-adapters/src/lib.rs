//! Infrastructure adapters for netgen.
//!
//! This crate implements the ports defined in `netgen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod environment;
pub mod filesystem;
pub mod layers;
pub mod renderer;
pub mod serial;
pub mod template_store;

// Re-export commonly used adapters
pub use environment::{MapEnvironment, ProcessEnvironment};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use layers::YamlLayerStore;
pub use renderer::TeraRenderer;
pub use serial::LineSender;
pub use template_store::DirectoryTemplateStore;

//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `netgen-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `LayerStore`: YAML layer and batch loading
//!   - `TemplateStore`: Template lookup
//!   - `TemplateRenderer`: Template rendering
//!   - `Filesystem`: Guarded output writes
//!   - `Environment`: Environment variable lookup
//!   - `Prompter`: Interactive secret entry

pub mod output;

pub use output::{
    Environment, Filesystem, LayerStore, Prompter, TemplateRenderer, TemplateStore, WriteOutcome,
};

#[cfg(test)]
pub use output::{
    MockEnvironment, MockFilesystem, MockLayerStore, MockPrompter, MockTemplateRenderer,
    MockTemplateStore,
};

//! Application layer for netgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (DeviceProcessor, SecretResolver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! composition rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BatchReport, ComposedDevice, DeviceOutcome, DeviceProcessor, ProcessingStage,
    ProcessorOptions, SecretResolver,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Environment, Filesystem, LayerStore, Prompter, TemplateRenderer, TemplateStore, WriteOutcome,
};

pub use error::ApplicationError;

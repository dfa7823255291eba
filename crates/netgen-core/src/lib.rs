//! netgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the netgen
//! network-device configuration generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            netgen-cli (CLI)             │
//! │     (Prompter, commands, output)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (DeviceProcessor, SecretResolver)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (LayerStore, TemplateStore, Renderer,   │
//! │  Filesystem, Environment, Prompter)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    netgen-adapters (Infrastructure)     │
//! │ (YamlLayerStore, TeraRenderer, etc)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (ConfigValue, deep_merge, Composer)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use netgen_core::prelude::*;
//!
//! let processor = DeviceProcessor::new(
//!     layers, templates, renderer, filesystem,
//!     SecretResolver::new(environment, prompter),
//!     default_requests(),
//!     ProcessorOptions::default(),
//! );
//! let global = processor.load_global()?;
//! let devices = processor.load_batch("devices.yml".as_ref())?;
//! let report = processor.process_batch(devices, &global)?;
//! println!("{} written, {} skipped", report.written(), report.skipped());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BatchReport, DeviceOutcome, DeviceProcessor, ProcessingStage,
        ProcessorOptions, SecretResolver,
        ports::{
            Environment, Filesystem, LayerStore, Prompter, TemplateRenderer, TemplateStore,
            WriteOutcome,
        },
    };
    pub use crate::domain::{
        ConfigComposer, ConfigMapping, ConfigValue, DeviceDescriptor, DomainError, DottedPath,
        GlobalConfig, RenderedConfig, SecretRequest, Template, TemplateKey, TemplateSource,
        deep_merge, default_requests,
    };
    pub use crate::error::{ErrorCategory, NetgenError, NetgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Command handlers.
//!
//! Each handler translates parsed arguments into calls on the core services
//! and prints the result. Adapter wiring lives in [`build_processor`].

pub mod completions;
pub mod config;
pub mod deploy;
pub mod generate;
pub mod init;
pub mod inspect;
pub mod templates;

use netgen_adapters::{
    DirectoryTemplateStore, LocalFilesystem, ProcessEnvironment, TeraRenderer, YamlLayerStore,
};
use netgen_core::application::{DeviceProcessor, ProcessorOptions, SecretResolver};

use crate::{config::AppConfig, prompt::TerminalPrompter};

/// Layer store for the configured directory and global file.
pub(crate) fn layer_store(config: &AppConfig) -> YamlLayerStore {
    YamlLayerStore::new(&config.paths.config_dir).with_global_file(&config.paths.global_file)
}

pub(crate) fn template_store(config: &AppConfig) -> DirectoryTemplateStore {
    DirectoryTemplateStore::new(&config.paths.templates_dir)
}

/// Wire the production adapters into a processor.
pub(crate) fn build_processor(config: &AppConfig, force: bool, dry_run: bool) -> DeviceProcessor {
    let options = ProcessorOptions {
        output_dir: config.paths.output_dir.clone(),
        force,
        dry_run,
    };
    DeviceProcessor::new(
        Box::new(layer_store(config)),
        Box::new(template_store(config)),
        Box::new(TeraRenderer::new()),
        Box::new(LocalFilesystem::new()),
        SecretResolver::new(Box::new(ProcessEnvironment), Box::new(TerminalPrompter)),
        config.secret_requests(),
        options,
    )
}

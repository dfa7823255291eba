//! Implementation of the `netgen templates` command.

use netgen_core::application::TemplateStore;

use crate::{
    cli::{ListFormat, TemplatesArgs},
    commands::template_store,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: TemplatesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = template_store(&config);
    let keys: Vec<String> = store.list()?.iter().map(ToString::to_string).collect();

    match args.format {
        ListFormat::List => {
            output.header(&format!(
                "Templates in {}:",
                store.templates_dir().display()
            ))?;
            if keys.is_empty() {
                output.warning("No templates found")?;
            }
            for key in &keys {
                output.data(key)?;
            }
        }
        ListFormat::Json => {
            // JSON must stay parseable even in quiet mode or through pipes.
            let json = serde_json::to_string_pretty(&keys).map_err(|e| CliError::InvalidInput {
                message: format!("cannot serialise template list: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.data(&json)?;
        }
    }

    Ok(())
}

//! `netgen inspect`: print the composed record for one device.
//!
//! Runs validation, layer loading, secret resolution and composition; never
//! renders or writes. Credentials are masked unless `--show-secrets` is set.

use tracing::{debug, instrument};

use netgen_core::domain::{ConfigMapping, ConfigValue, SecretRequest};

use crate::{
    cli::{InspectArgs, RecordFormat},
    commands::build_processor,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(hostname = %args.hostname))]
pub fn execute(args: InspectArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let processor = build_processor(&config, false, true);
    let global = processor.load_global()?;
    let devices = processor.load_batch(&args.batch)?;

    let raw = find_device(devices, &args.hostname).ok_or_else(|| CliError::DeviceNotFound {
        hostname: args.hostname.clone(),
        batch: args.batch.clone(),
    })?;

    let composed = processor.compose_device(raw, &global)?;
    debug!(template_key = %composed.descriptor.template_key(), "Device composed");

    let mut record = composed.record;
    if !args.show_secrets {
        mask_secrets(&mut record, &config.secret_requests());
    }

    output.data(&serialize(&record, args.format)?)?;
    Ok(())
}

const SECRET_MASK: &str = "********";

/// Replace every present secret with [`SECRET_MASK`].
fn mask_secrets(record: &mut ConfigMapping, requests: &[SecretRequest]) {
    for request in requests {
        if request.path.lookup(record).is_some_and(|v| !v.is_null()) {
            request.path.insert(record, ConfigValue::from(SECRET_MASK));
        }
    }
}

/// First entry whose `hostname` matches exactly.
fn find_device(devices: Vec<ConfigMapping>, hostname: &str) -> Option<ConfigMapping> {
    devices.into_iter().find(|device| {
        device
            .get("hostname")
            .and_then(|h| h.to_scalar_string())
            .is_some_and(|h| h == hostname)
    })
}

fn serialize(record: &ConfigMapping, format: RecordFormat) -> CliResult<String> {
    let failed = |e: String| CliError::InvalidInput {
        message: format!("cannot serialise record: {e}"),
        source: None,
    };
    match format {
        RecordFormat::Yaml => serde_yaml::to_string(record).map_err(|e| failed(e.to_string())),
        RecordFormat::Json => {
            serde_json::to_string_pretty(record).map_err(|e| failed(e.to_string()))
        }
    }
}

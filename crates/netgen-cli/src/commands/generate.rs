//! Default action: generate configs for a batch file or one interactively
//! described device.
//!
//! Responsibility: load the inputs, hand them to the core processor, and
//! report per-device outcomes. Setup failures abort with a non-zero exit;
//! device failures only show up in the report.

use serde_json::json;
use tracing::{info, instrument, warn};

use netgen_core::{
    application::{BatchReport, DeviceOutcome},
    domain::{ConfigMapping, GlobalConfig},
};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    commands::build_processor,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompt,
};

#[instrument(skip_all, fields(batch = ?args.batch, force = args.force, dry_run = args.dry_run))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let processor = build_processor(&config, args.force, args.dry_run);
    let global = processor.load_global()?;

    let devices = match &args.batch {
        Some(path) => {
            let devices = processor.load_batch(path)?;
            info!(devices = devices.len(), path = %path.display(), "Batch loaded");
            for (hostname, vendor) in unknown_vendors(&devices, &global) {
                warn!(%hostname, %vendor, "Vendor not listed in validation_data.vendors");
                output.warning(&format!(
                    "{hostname}: vendor '{vendor}' is not in validation_data.vendors"
                ))?;
            }
            devices
        }
        None => vec![prompt::collect_device(&global, &output)?.into_descriptor()],
    };

    if devices.is_empty() {
        output.warning("The batch file lists no devices")?;
        return Ok(());
    }

    let report = processor.process_batch(devices, &global)?;
    print_report(&report, &output)
}

/// Devices whose vendor is missing from a non-empty vendor list.
fn unknown_vendors(devices: &[ConfigMapping], global: &GlobalConfig) -> Vec<(String, String)> {
    let known = global.vendors();
    if known.is_empty() {
        return Vec::new();
    }

    devices
        .iter()
        .filter_map(|device| {
            let vendor = device.get("vendor")?.to_scalar_string()?;
            let listed = known.iter().any(|k| k.eq_ignore_ascii_case(&vendor));
            (!listed).then(|| {
                let hostname = device
                    .get("hostname")
                    .and_then(|h| h.to_scalar_string())
                    .unwrap_or_else(|| "<unnamed>".into());
                (hostname, vendor)
            })
        })
        .collect()
}

fn print_report(report: &BatchReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.data(&report_json(report).to_string())?;
        return Ok(());
    }

    for outcome in &report.outcomes {
        match outcome {
            DeviceOutcome::Written { path, replaced, .. } => {
                let verb = if *replaced { "replaced" } else { "saved" };
                output.success(&format!("Configuration {verb}: {}", path.display()))?;
            }
            DeviceOutcome::WriteSkipped { path, .. } => {
                output.warning(&format!(
                    "{} already exists, not overwriting (use --force)",
                    path.display()
                ))?;
            }
            DeviceOutcome::DryRun { path, rendered } => {
                output.info(&format!("Dry run: would write {}", path.display()))?;
                output.print(rendered.text())?;
            }
            DeviceOutcome::Skipped {
                device,
                stage,
                reason,
            } => {
                output.error(&format!("Skipped {device} ({stage}): {reason}"))?;
            }
        }
    }

    output.header(&format!(
        "{} written, {} unchanged, {} dry run, {} skipped",
        report.written(),
        report.write_skipped(),
        report.dry_run(),
        report.skipped()
    ))?;
    Ok(())
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let devices: Vec<_> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            DeviceOutcome::Written {
                path,
                rendered,
                replaced,
            } => json!({
                "hostname": rendered.hostname(),
                "status": if *replaced { "replaced" } else { "written" },
                "path": path,
            }),
            DeviceOutcome::WriteSkipped { path, rendered } => json!({
                "hostname": rendered.hostname(),
                "status": "exists",
                "path": path,
            }),
            DeviceOutcome::DryRun { path, rendered } => json!({
                "hostname": rendered.hostname(),
                "status": "dry_run",
                "path": path,
            }),
            DeviceOutcome::Skipped {
                device,
                stage,
                reason,
            } => json!({
                "hostname": device,
                "status": "skipped",
                "stage": stage.to_string(),
                "reason": reason.to_string(),
            }),
        })
        .collect();

    json!({
        "written": report.written(),
        "unchanged": report.write_skipped(),
        "dry_run": report.dry_run(),
        "skipped": report.skipped(),
        "devices": devices,
    })
}

//! `netgen deploy`: stream a generated config to a serial console.

use std::{fs, thread, time::Duration};

use tracing::{info, instrument, trace};

use netgen_adapters::serial::{LineSender, deployable_lines, open_port};

use crate::{
    cli::DeployArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(file = %args.file.display(), port = %args.port, baud = args.baud))]
pub fn execute(args: DeployArgs, output: OutputManager) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CliError::FileNotFound {
            what: "Configuration file",
            path: args.file,
        });
    }

    let config = fs::read_to_string(&args.file)
        .with_cli_context(|| format!("reading {}", args.file.display()))?;
    let total = deployable_lines(&config).count();
    let settle = Duration::from_secs_f64(args.settle);

    output.info(&format!(
        "Opening serial port {} at {} baud",
        args.port, args.baud
    ))?;
    let port = open_port(&args.port, args.baud)?;
    output.info(&format!(
        "Port is open, waiting {}s for the device to settle",
        args.settle
    ))?;
    thread::sleep(settle);

    let mut sender = LineSender::new(port, args.port.as_str(), Duration::from_secs_f64(args.delay));
    sender.wake()?;

    output.info(&format!(
        "Sending {total} lines from {}",
        args.file.display()
    ))?;
    let bar = output.progress(total as u64, "Sending");
    let sent = sender.send_config(&config, |line| {
        trace!(line, "Sending line");
        bar.println(format!("--> {line}"));
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    output.info("Last command sent, waiting for the device")?;
    thread::sleep(settle);
    let reply = sender.read_back()?;
    if !reply.trim().is_empty() {
        output.header("Last output from the device:")?;
        output.data(&reply)?;
    }

    info!(sent, "Deployment finished");
    output.success(&format!("Sent {sent} lines to {}", args.port))?;
    Ok(())
}

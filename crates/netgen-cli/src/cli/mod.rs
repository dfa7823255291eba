//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use netgen_adapters::serial::DEFAULT_BAUD_RATE;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
///
/// Without a subcommand the top-level flags drive generation: `--batch`
/// processes a device list, no flags at all starts interactive mode.
#[derive(Debug, Parser)]
#[command(
    name    = "netgen",
    bin_name = "netgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered network device configuration generator",
    long_about = "netgen composes global, regional, device-type and per-device YAML \
                  into one record per device and renders it through a vendor template.",
    after_help = "EXAMPLES:\n\
        \x20 netgen                              # interactive, one device\n\
        \x20 netgen --batch devices.yml          # every device in the file\n\
        \x20 netgen --batch devices.yml --force  # overwrite existing configs\n\
        \x20 netgen inspect -b devices.yml -n sw1 --format json\n\
        \x20 netgen deploy -f output_configs/sw1.config -p /dev/ttyUSB0",
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Generation flags used when no subcommand is given.
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments for the default (generate) action.
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    /// Batch document with a `devices` list.
    #[arg(
        short = 'b',
        long = "batch",
        value_name = "FILE",
        help = "Generate every device listed in FILE"
    )]
    pub batch: Option<PathBuf>,

    /// Replace existing output files.
    #[arg(short = 'f', long = "force", help = "Overwrite existing config files")]
    pub force: bool,

    /// Run every stage except writing.
    #[arg(long = "dry-run", help = "Render without writing any files")]
    pub dry_run: bool,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the composed record for one device.
    #[command(
        about = "Show the merged configuration record for a device",
        after_help = "EXAMPLES:\n\
            \x20 netgen inspect --batch devices.yml --hostname sw1\n\
            \x20 netgen inspect -b devices.yml -n sw1 --format json\n\
            \x20 netgen inspect -b devices.yml -n sw1 --show-secrets"
    )]
    Inspect(InspectArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 netgen templates\n\
            \x20 netgen templates --format json"
    )]
    Templates(TemplatesArgs),

    /// Stream a generated config to a serial console.
    #[command(
        about = "Send a generated config to a device over a serial port",
        after_help = "EXAMPLES:\n\
            \x20 netgen deploy --file output_configs/sw1.config --port /dev/ttyUSB0\n\
            \x20 netgen deploy -f output_configs/sw1.config -p /dev/ttyUSB0 --delay 1.0\n\
            \x20 netgen deploy -f output_configs/sw1.config -p COM3 -b 115200"
    )]
    Deploy(DeployArgs),

    /// Initialise a netgen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 netgen init           # default location\n\
            \x20 netgen init --local   # ./netgen.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 netgen completions bash > ~/.local/share/bash-completion/completions/netgen\n\
            \x20 netgen completions zsh  > ~/.zfunc/_netgen\n\
            \x20 netgen completions fish > ~/.config/fish/completions/netgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the netgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 netgen config get paths.output_dir\n\
            \x20 netgen config list\n\
            \x20 netgen config path"
    )]
    Config(ConfigCommands),
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `netgen inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Batch document to read the device from.
    #[arg(short = 'b', long = "batch", value_name = "FILE", help = "Batch file")]
    pub batch: PathBuf,

    /// Hostname of the device to show.
    #[arg(
        short = 'n',
        long = "hostname",
        value_name = "NAME",
        help = "Device hostname"
    )]
    pub hostname: String,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "yaml",
        help = "Output format"
    )]
    pub format: RecordFormat,

    /// Print resolved credentials instead of a mask.
    #[arg(long = "show-secrets", help = "Show secrets in clear text")]
    pub show_secrets: bool,
}

/// Serialization of a composed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFormat {
    Yaml,
    Json,
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Arguments for `netgen templates`.
#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "list",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `templates` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// One key per line.
    List,
    /// JSON array.
    Json,
}

// ── deploy ────────────────────────────────────────────────────────────────────

/// Arguments for `netgen deploy`.
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Generated config to send.
    #[arg(short = 'f', long = "file", value_name = "FILE", help = "Config file to send")]
    pub file: PathBuf,

    /// Serial port name.
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        help = "Serial port, e.g. /dev/ttyUSB0 or COM3"
    )]
    pub port: String,

    /// Line speed.
    #[arg(
        short = 'b',
        long = "baud",
        value_name = "RATE",
        default_value_t = DEFAULT_BAUD_RATE,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Baud rate"
    )]
    pub baud: u32,

    /// Pause between lines, in seconds.
    #[arg(
        short = 'd',
        long = "delay",
        value_name = "SECS",
        default_value_t = 0.5,
        value_parser = parse_delay,
        help = "Seconds to wait between lines"
    )]
    pub delay: f64,

    /// Pause after opening the port and after the last line, in seconds.
    #[arg(
        long = "settle",
        value_name = "SECS",
        default_value_t = 2.0,
        value_parser = parse_delay,
        help = "Seconds to let the device settle"
    )]
    pub settle: f64,
}

fn parse_delay(raw: &str) -> Result<f64, String> {
    let delay: f64 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if delay.is_finite() && delay >= 0.0 {
        Ok(delay)
    } else {
        Err("delay must be zero or a positive number of seconds".into())
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `netgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `netgen.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `netgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `netgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `paths.output_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_arguments_means_interactive() {
        let cli = Cli::parse_from(["netgen"]);
        assert!(cli.command.is_none());
        assert!(cli.generate.batch.is_none());
    }

    #[test]
    fn parse_batch_flags() {
        let cli = Cli::parse_from(["netgen", "--batch", "devices.yml", "--force", "-vv"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.batch, Some(PathBuf::from("devices.yml")));
        assert!(cli.generate.force);
        assert!(!cli.generate.dry_run);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn path_overrides_are_global() {
        let cli = Cli::parse_from([
            "netgen",
            "templates",
            "--templates-dir",
            "tpl",
            "--config-dir",
            "cfg",
        ]);
        assert!(matches!(cli.command, Some(Commands::Templates(_))));
        assert_eq!(cli.global.templates_dir, Some(PathBuf::from("tpl")));
        assert_eq!(cli.global.config_dir, Some(PathBuf::from("cfg")));
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::parse_from([
            "netgen", "inspect", "-b", "devices.yml", "-n", "sw1", "--format", "json",
        ]);
        match cli.command {
            Some(Commands::Inspect(args)) => {
                assert_eq!(args.hostname, "sw1");
                assert_eq!(args.format, RecordFormat::Json);
            }
            other => panic!("expected Inspect, got {other:?}"),
        }
    }

    #[test]
    fn deploy_delay_default_and_validation() {
        let cli = Cli::parse_from(["netgen", "deploy", "-f", "a.config", "-p", "/dev/null"]);
        match cli.command {
            Some(Commands::Deploy(args)) => {
                assert_eq!(args.delay, 0.5);
                assert_eq!(args.baud, 9600);
                assert_eq!(args.settle, 2.0);
            }
            other => panic!("expected Deploy, got {other:?}"),
        }

        let negative =
            Cli::try_parse_from(["netgen", "deploy", "-f", "a", "-p", "b", "--delay", "-1"]);
        assert!(negative.is_err());
    }

    #[test]
    fn deploy_baud_rate() {
        let cli = Cli::parse_from(["netgen", "deploy", "-f", "a", "-p", "COM3", "-b", "115200"]);
        match cli.command {
            Some(Commands::Deploy(args)) => {
                assert_eq!(args.baud, 115200);
                assert_eq!(args.port, "COM3");
            }
            other => panic!("expected Deploy, got {other:?}"),
        }

        assert!(Cli::try_parse_from(["netgen", "deploy", "-f", "a", "-p", "b", "-b", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["netgen", "deploy", "-f", "a", "-p", "b", "--settle", "-2"]).is_err()
        );
    }

    #[test]
    fn templates_alias() {
        let cli = Cli::parse_from(["netgen", "ls"]);
        assert!(matches!(cli.command, Some(Commands::Templates(_))));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["netgen", "--quiet", "--verbose", "templates"]);
        assert!(result.is_err());
    }
}

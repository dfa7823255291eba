//! Terminal prompting.
//!
//! [`TerminalPrompter`] is the prompt tier of secret resolution.
//! [`collect_device`] asks the questions of interactive mode and turns the
//! answers into a device descriptor.

use std::net::IpAddr;

use netgen_core::{
    application::{ApplicationError, ports::Prompter},
    domain::{ConfigMapping, ConfigValue, GlobalConfig},
    error::{NetgenError, NetgenResult},
    mapping,
};

use crate::{
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Host mask used for loopback interfaces.
const LOOPBACK_MASK: &str = "255.255.255.255";

/// Reads secrets from the controlling terminal without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    #[cfg(feature = "interactive")]
    fn ask_secret(&self, prompt: &str) -> NetgenResult<String> {
        use std::io::IsTerminal as _;

        let unavailable = |reason: String| ApplicationError::PromptUnavailable {
            prompt: prompt.to_owned(),
            reason,
        };

        if !std::io::stdin().is_terminal() {
            return Err(unavailable("stdin is not a terminal".into()).into());
        }

        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| unavailable(e.to_string()).into())
    }

    #[cfg(not(feature = "interactive"))]
    fn ask_secret(&self, prompt: &str) -> NetgenResult<String> {
        Err(ApplicationError::PromptUnavailable {
            prompt: prompt.to_owned(),
            reason: "built without the 'interactive' feature".into(),
        }
        .into())
    }
}

/// Answers gathered in interactive mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAnswers {
    pub vendor: String,
    pub device_type: String,
    pub hostname: String,
    pub region: Option<String>,
    pub loopback: Option<IpAddr>,
    pub snmp_location: Option<String>,
}

impl DeviceAnswers {
    /// Build the descriptor fed to the processor.
    ///
    /// Secrets are left out; the resolver fills them from the environment or
    /// asks for them.
    pub fn into_descriptor(self) -> ConfigMapping {
        let mut descriptor = mapping! {
            "hostname" => self.hostname,
            "vendor" => self.vendor,
            "device_type" => self.device_type,
        };

        if let Some(region) = self.region {
            descriptor.insert("region".into(), region.into());
        }

        if let Some(ip) = self.loopback {
            let loopback = mapping! {
                "id" => 0_i64,
                "description" => "Loopback Interface",
                "ip_address" => ip.to_string(),
                "subnet_mask" => LOOPBACK_MASK,
            };
            descriptor.insert(
                "loopbacks".into(),
                ConfigValue::Sequence(vec![loopback.into()]),
            );
        }

        let mut snmp = mapping! {
            "encryption" => "sha",
            "privacy" => "aes",
        };
        if let Some(location) = self.snmp_location {
            snmp.insert("location".into(), location.into());
        }
        descriptor.insert("snmp".into(), snmp.into());

        descriptor
    }
}

/// Whether interactive mode should offer a loopback address.
pub fn wants_loopback(global: &GlobalConfig, device_type: &str) -> bool {
    global.supports_loopback() || device_type.eq_ignore_ascii_case("core_switch")
}

fn non_empty(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Ask for one device. Invalid answers are asked again.
#[cfg(feature = "interactive")]
pub fn collect_device(global: &GlobalConfig, output: &OutputManager) -> CliResult<DeviceAnswers> {
    use std::io::IsTerminal as _;

    use dialoguer::Input;
    use netgen_core::domain::DomainValidator;

    if !std::io::stdin().is_terminal() {
        return Err(CliError::InvalidInput {
            message: "interactive mode needs a terminal; pass --batch FILE instead".into(),
            source: None,
        });
    }

    let vendor = choose(output, "Vendor", &global.vendors())?;
    let device_type = choose(output, "Device type", &global.template_styles())?;

    let hostname: String = Input::new()
        .with_prompt("Hostname")
        .validate_with(|input: &String| -> Result<(), String> {
            let hostname = DomainValidator::require_non_empty(input, "Hostname").map_err(|e| e.to_string())?;
            DomainValidator::validate_hostname(&hostname).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_failed)?;

    let regions = global.region_names();
    let region_prompt = if regions.is_empty() {
        "Region (optional)".to_owned()
    } else {
        format!("Region ({}, optional)", regions.join(", "))
    };
    let region: String = Input::new()
        .with_prompt(region_prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_failed)?;

    let loopback = if wants_loopback(global, &device_type) {
        let answer: String = Input::new()
            .with_prompt("Loopback IP (empty to skip)")
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                if input.trim().is_empty() {
                    return Ok(());
                }
                DomainValidator::validate_ip(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(prompt_failed)?;
        match non_empty(answer) {
            Some(ip) => Some(DomainValidator::validate_ip(&ip).map_err(NetgenError::from)?),
            None => None,
        }
    } else {
        None
    };

    let snmp_location: String = Input::new()
        .with_prompt("SNMP location (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_failed)?;

    Ok(DeviceAnswers {
        vendor,
        device_type,
        hostname: hostname.trim().to_owned(),
        region: non_empty(region).map(|r| r.to_lowercase()),
        loopback,
        snmp_location: non_empty(snmp_location),
    })
}

#[cfg(not(feature = "interactive"))]
pub fn collect_device(_global: &GlobalConfig, _output: &OutputManager) -> CliResult<DeviceAnswers> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

/// Menu question answered by number or name. Free text when the global
/// document declares no options.
#[cfg(feature = "interactive")]
fn choose(output: &OutputManager, label: &str, options: &[String]) -> CliResult<String> {
    use dialoguer::Input;
    use netgen_core::domain::DomainValidator;

    if options.is_empty() {
        let answer: String = Input::new()
            .with_prompt(label)
            .validate_with(|input: &String| -> Result<(), String> {
                DomainValidator::require_non_empty(input, label)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(prompt_failed)?;
        return Ok(answer.trim().to_owned());
    }

    output.header(&format!("{label}:"))?;
    for (i, option) in options.iter().enumerate() {
        output.print(&format!("  {}. {option}", i + 1))?;
    }

    let answer: String = Input::new()
        .with_prompt(format!("{label} (number or name)"))
        .validate_with(|input: &String| -> Result<(), String> {
            DomainValidator::select_choice(input, options)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_failed)?;

    Ok(DomainValidator::select_choice(&answer, options).map_err(NetgenError::from)?)
}

/// Ctrl-C at a question surfaces as an interrupted read.
#[cfg(feature = "interactive")]
fn prompt_failed(e: dialoguer::Error) -> CliError {
    match &e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            CliError::Cancelled
        }
        _ => CliError::InvalidInput {
            message: format!("could not read answer: {e}"),
            source: Some(Box::new(e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> DeviceAnswers {
        DeviceAnswers {
            vendor: "dell".into(),
            device_type: "core_switch".into(),
            hostname: "core1".into(),
            region: None,
            loopback: None,
            snmp_location: None,
        }
    }

    #[test]
    fn minimal_descriptor() {
        let descriptor = answers().into_descriptor();

        assert_eq!(descriptor["hostname"], ConfigValue::from("core1"));
        assert_eq!(descriptor["vendor"], ConfigValue::from("dell"));
        assert!(!descriptor.contains_key("region"));
        assert!(!descriptor.contains_key("loopbacks"));
        assert_eq!(
            descriptor["snmp"],
            ConfigValue::from(mapping! { "encryption" => "sha", "privacy" => "aes" })
        );
    }

    #[test]
    fn loopback_uses_host_mask() {
        let descriptor = DeviceAnswers {
            loopback: Some("10.255.0.1".parse().unwrap()),
            region: Some("eu".into()),
            snmp_location: Some("Stockholm DC1".into()),
            ..answers()
        }
        .into_descriptor();

        let loopbacks = descriptor["loopbacks"].as_sequence().unwrap();
        assert_eq!(loopbacks.len(), 1);
        let loopback = loopbacks[0].as_mapping().unwrap();
        assert_eq!(loopback["id"], ConfigValue::Integer(0));
        assert_eq!(loopback["ip_address"], ConfigValue::from("10.255.0.1"));
        assert_eq!(loopback["subnet_mask"], ConfigValue::from(LOOPBACK_MASK));
        assert_eq!(descriptor["region"], ConfigValue::from("eu"));
        assert_eq!(
            descriptor["snmp"].as_mapping().unwrap()["location"],
            ConfigValue::from("Stockholm DC1")
        );
    }

    #[test]
    fn loopback_offered_for_core_switch_or_flag() {
        let plain = GlobalConfig::new(ConfigMapping::new());
        let flagged = GlobalConfig::new(mapping! { "supports_loopback" => true });

        assert!(wants_loopback(&plain, "core_switch"));
        assert!(!wants_loopback(&plain, "access_switch"));
        assert!(wants_loopback(&flagged, "access_switch"));
    }

    #[test]
    fn blank_answers_are_absent() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" eu ".into()).as_deref(), Some("eu"));
    }

    #[test]
    fn prompter_without_terminal_is_unavailable() {
        use std::io::IsTerminal as _;

        // Test runners capture stdin; skip if a real terminal is attached.
        if std::io::stdin().is_terminal() {
            return;
        }
        let err = TerminalPrompter.ask_secret("Enable password").unwrap_err();
        assert!(!err.is_device_scoped());
        assert!(err.to_string().contains("Enable password"));
    }

    #[cfg(feature = "interactive")]
    #[test]
    fn interrupted_question_cancels() {
        use std::io;

        let interrupted = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
        assert!(matches!(prompt_failed(interrupted), CliError::Cancelled));

        let broken = dialoguer::Error::IO(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(prompt_failed(broken), CliError::InvalidInput { .. }));
    }
}

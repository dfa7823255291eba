//! Built-in vendor emitters.
//!
//! Deterministic line emitters that turn a merged record straight into
//! vendor CLI syntax. They back any `{vendor}_{device_type}` key for which
//! no template file exists.
//!
//! # Emitted sections (dell)
//!
//! ```text
//! hostname → vlans → interfaces → loopback(s) → snmp → ntp → logging
//!     → dns → tacacs → acl
//! ```
//!
//! Every section closes with a `!` line.

use thiserror::Error;

use netgen_core::domain::{ConfigMapping, ConfigValue};

/// Vendors with a built-in emitter.
pub const VENDORS: &[&str] = &["dell"];

/// A record field an emitter needs is missing or has the wrong shape.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{section}: missing or invalid '{field}'")]
pub struct EmitError {
    pub section: &'static str,
    pub field: &'static str,
}

/// True when `vendor` has a built-in emitter.
pub fn supports(vendor: &str) -> bool {
    VENDORS.contains(&vendor)
}

/// Run the emitter for `vendor`. `None` when the vendor has none.
pub fn render(vendor: &str, record: &ConfigMapping) -> Option<Result<String, EmitError>> {
    match vendor {
        "dell" => Some(dell(record)),
        _ => None,
    }
}

// ── Record access helpers ─────────────────────────────────────────────────────

fn section<'a>(record: &'a ConfigMapping, key: &str) -> Option<&'a ConfigMapping> {
    record.get(key).and_then(ConfigValue::as_mapping)
}

fn list<'a>(record: &'a ConfigMapping, key: &str) -> &'a [ConfigValue] {
    record
        .get(key)
        .and_then(ConfigValue::as_sequence)
        .unwrap_or_default()
}

fn scalar(record: &ConfigMapping, key: &str) -> Option<String> {
    record.get(key).and_then(ConfigValue::to_scalar_string)
}

/// Scalar that is present and truthy.
fn truthy(record: &ConfigMapping, key: &str) -> Option<String> {
    record
        .get(key)
        .filter(|v| v.is_truthy())
        .and_then(ConfigValue::to_scalar_string)
}

fn required(
    record: &ConfigMapping,
    key: &'static str,
    section: &'static str,
) -> Result<String, EmitError> {
    scalar(record, key).ok_or(EmitError {
        section,
        field: key,
    })
}

fn entries<'a>(
    record: &'a ConfigMapping,
    key: &'static str,
) -> impl Iterator<Item = Result<&'a ConfigMapping, EmitError>> {
    list(record, key).iter().map(move |item| {
        item.as_mapping().ok_or(EmitError {
            section: key,
            field: key,
        })
    })
}

// ── Dell OS ──────────────────────────────────────────────────────────────────

fn dell(record: &ConfigMapping) -> Result<String, EmitError> {
    let mut lines = Vec::new();
    let empty = ConfigMapping::new();

    lines.push(format!("hostname {}", required(record, "hostname", "hostname")?));
    lines.push("!".to_owned());

    for vlan in entries(record, "vlans") {
        let vlan = vlan?;
        lines.push(format!("vlan {}", required(vlan, "id", "vlans")?));
        if let Some(name) = truthy(vlan, "name") {
            lines.push(format!(" name {name}"));
        }
        lines.push("!".to_owned());
    }

    for iface in entries(record, "interfaces") {
        dell_interface(iface?, &mut lines)?;
    }

    if let Some(lo) = section(record, "loopback") {
        lines.push(format!("interface {}", required(lo, "name", "loopback")?));
        lines.push(format!(
            " ip address {} {}",
            required(lo, "ip_address", "loopback")?,
            required(lo, "subnet_mask", "loopback")?
        ));
        lines.push("!".to_owned());
    }

    for lo in entries(record, "loopbacks") {
        let lo = lo?;
        lines.push(format!("interface loopback {}", required(lo, "id", "loopbacks")?));
        if let Some(description) = truthy(lo, "description") {
            lines.push(format!(" description {description}"));
        }
        lines.push(format!(
            " ip address {} {}",
            required(lo, "ip_address", "loopbacks")?,
            required(lo, "subnet_mask", "loopbacks")?
        ));
        lines.push("!".to_owned());
    }

    let snmp = section(record, "snmp").unwrap_or(&empty);
    if let Some(community) = truthy(snmp, "community") {
        lines.push(format!("snmp-server community {community} RO"));
    }
    if let Some(contact) = truthy(snmp, "contact") {
        lines.push(format!("snmp-server contact {contact}"));
    }
    if let Some(location) = truthy(snmp, "location") {
        lines.push(format!("snmp-server location {location}"));
    }
    lines.push("!".to_owned());

    let ntp = section(record, "ntp").unwrap_or(&empty);
    for server in list(ntp, "servers") {
        lines.push(format!("ntp server {server}"));
    }
    lines.push("!".to_owned());

    let logging = section(record, "logging").unwrap_or(&empty);
    for host in list(logging, "hosts") {
        lines.push(format!("logging host {host}"));
    }
    lines.push(format!(
        "logging trap {}",
        scalar(logging, "level").unwrap_or_else(|| "informational".to_owned())
    ));
    lines.push("!".to_owned());

    let dns = section(record, "dns").unwrap_or(&empty);
    if let Some(domain) = scalar(dns, "domain_name") {
        lines.push(format!("ip domain-name {domain}"));
        for server in list(dns, "servers") {
            lines.push(format!("ip name-server {server}"));
        }
        lines.push("!".to_owned());
    }

    let tacacs = section(record, "tacacs").unwrap_or(&empty);
    for server in list(tacacs, "servers") {
        lines.push(format!("tacacs-server host {server}"));
    }
    if let Some(key) = truthy(tacacs, "key") {
        lines.push(format!("tacacs-server key {key}"));
    }
    lines.push("!".to_owned());

    for acl in entries(record, "acl") {
        let acl = acl?;
        lines.push(format!(
            "ip access-list extended {}",
            required(acl, "name", "acl")?
        ));
        let rules = acl
            .get("rules")
            .and_then(ConfigValue::as_sequence)
            .ok_or(EmitError {
                section: "acl",
                field: "rules",
            })?;
        for rule in rules {
            let rule = rule.as_mapping().ok_or(EmitError {
                section: "acl",
                field: "rules",
            })?;
            let mut entry = format!(
                " {} {} {}",
                required(rule, "action", "acl")?,
                required(rule, "protocol", "acl")?,
                required(rule, "dst", "acl")?
            );
            if let Some(port) = scalar(rule, "port") {
                entry.push_str(&format!(" eq {port}"));
            }
            lines.push(entry);
        }
        lines.push("!".to_owned());
    }

    Ok(lines.join("\n"))
}

fn dell_interface(iface: &ConfigMapping, lines: &mut Vec<String>) -> Result<(), EmitError> {
    let missing_name = EmitError {
        section: "interfaces",
        field: "name",
    };
    let names: Vec<String> = match iface.get("name") {
        Some(ConfigValue::Sequence(items)) => items
            .iter()
            .map(|n| n.to_scalar_string().ok_or(missing_name.clone()))
            .collect::<Result<_, _>>()?,
        Some(other) => vec![other.to_scalar_string().ok_or(missing_name)?],
        None => return Err(missing_name),
    };
    let mode = iface.get("mode").and_then(ConfigValue::as_str);
    let enabled = iface.get("no_shutdown").is_none_or(ConfigValue::is_truthy);
    let portfast = iface.get("spanningtree").and_then(ConfigValue::as_str) == Some("portfast");

    for name in names {
        lines.push(format!("interface {name}"));
        if let Some(description) = scalar(iface, "description") {
            lines.push(format!(" description {description}"));
        }
        match mode {
            Some("access") => {
                lines.push(" switchport mode access".to_owned());
                if let Some(vlan) = scalar(iface, "vlan") {
                    lines.push(format!(" switchport access vlan {vlan}"));
                }
            }
            Some("trunk") => {
                lines.push(" switchport mode trunk".to_owned());
                if let Some(allowed) = iface.get("allowed_vlans").filter(|v| !v.is_null()) {
                    lines.push(format!(" switchport trunk allowed vlan {allowed}"));
                }
            }
            _ => {}
        }
        lines.push(if enabled { " no shutdown" } else { " shutdown" }.to_owned());
        if portfast {
            lines.push(" spanning-tree portfast".to_owned());
        }
        lines.push("!".to_owned());
    }
    Ok(())
}

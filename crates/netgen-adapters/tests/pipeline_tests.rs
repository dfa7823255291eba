//! End-to-end generation through the real adapters (files on disk, output
//! kept in memory).

use std::{fs, path::Path};

use netgen_adapters::{
    DirectoryTemplateStore, MapEnvironment, MemoryFilesystem, TeraRenderer, YamlLayerStore,
};
use netgen_core::{application::ports::Prompter, prelude::*};
use tempfile::TempDir;

const GLOBAL: &str = r#"
default_configs:
  mtu: 1500
  ntp:
    servers: [10.0.0.1]
  snmp:
    contact: noc@example.net
    location: unknown
regions:
  eu:
    mtu: 9000
    ntp:
      servers: [10.9.0.1, 10.9.0.2]
validation_data:
  vendors: [dell, cisco]
  template_styles: [access_switch, core_switch]
"#;

const TEMPLATE: &str = "hostname {{ hostname }}\nmtu {{ mtu }}\n{% for s in ntp.servers %}ntp server {{ s }}\n{% endfor %}enable secret {{ enable_password }}\n";

struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask_secret(&self, prompt: &str) -> NetgenResult<String> {
        Err(ApplicationError::PromptUnavailable {
            prompt: prompt.to_owned(),
            reason: "tests never prompt".into(),
        }
        .into())
    }
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config");
    let templates = temp.path().join("templates");
    fs::create_dir_all(&config).unwrap();
    fs::create_dir_all(&templates).unwrap();
    fs::write(config.join("global.yml"), GLOBAL).unwrap();
    fs::write(config.join("access_switch.yml"), "stp: rstp\n").unwrap();
    fs::write(config.join("core_switch.yml"), "mtu: 9216\n").unwrap();
    fs::write(templates.join("cisco_access_switch.j2"), TEMPLATE).unwrap();
    fs::write(
        temp.path().join("devices.yml"),
        r#"
devices:
  - hostname: sto-access-01
    vendor: Cisco
    device_type: access_switch
    region: EU
    enable_password: inline-secret
  - vendor: cisco
    device_type: access_switch
  - hostname: sto-core-01
    vendor: dell
    device_type: core_switch
    region: eu
"#,
    )
    .unwrap();
    temp
}

fn processor(root: &Path, fs: MemoryFilesystem, options: ProcessorOptions) -> DeviceProcessor {
    let env = MapEnvironment::new().with("NETGEN_ENABLE_PASSWORD", "env-secret");
    DeviceProcessor::new(
        Box::new(YamlLayerStore::new(root.join("config"))),
        Box::new(DirectoryTemplateStore::new(root.join("templates"))),
        Box::new(TeraRenderer::new()),
        Box::new(fs),
        SecretResolver::new(Box::new(env), Box::new(NoPrompt)),
        vec![SecretRequest::new(
            "enable_password",
            "NETGEN_ENABLE_PASSWORD",
            "Enable password",
        )],
        options,
    )
}

#[test]
fn batch_generates_files_and_skips_invalid_device() {
    let root = workspace();
    let fs = MemoryFilesystem::new();
    let processor = processor(root.path(), fs.clone(), ProcessorOptions::default());

    let global = processor.load_global().unwrap();
    let devices = processor
        .load_batch(&root.path().join("devices.yml"))
        .unwrap();
    let report = processor.process_batch(devices, &global).unwrap();

    assert_eq!(report.written(), 2);
    assert_eq!(report.skipped(), 1);

    let access = fs
        .read_file(Path::new("output_configs/sto-access-01.config"))
        .unwrap();
    assert_eq!(
        access,
        "hostname sto-access-01\nmtu 9000\nntp server 10.9.0.1\nntp server 10.9.0.2\nenable secret inline-secret\n"
    );

    // No dell_core_switch.j2: built-in emitter.
    let core = fs
        .read_file(Path::new("output_configs/sto-core-01.config"))
        .unwrap();
    assert!(core.starts_with("hostname sto-core-01\n!"));
    assert!(core.contains("ntp server 10.9.0.1\nntp server 10.9.0.2\n!"));
    assert!(core.contains("snmp-server contact noc@example.net"));
}

#[test]
fn dry_run_writes_nothing() {
    let root = workspace();
    let fs = MemoryFilesystem::new();
    let options = ProcessorOptions {
        dry_run: true,
        ..ProcessorOptions::default()
    };
    let processor = processor(root.path(), fs.clone(), options);

    let global = processor.load_global().unwrap();
    let devices = processor
        .load_batch(&root.path().join("devices.yml"))
        .unwrap();
    let report = processor.process_batch(devices, &global).unwrap();

    assert_eq!(report.dry_run(), 2);
    assert!(fs.list_files().is_empty());
}

#[test]
fn environment_secret_fills_missing_field() {
    let root = workspace();
    let processor = processor(root.path(), MemoryFilesystem::new(), ProcessorOptions::default());
    let global = processor.load_global().unwrap();

    let composed = processor
        .compose_device(
            netgen_core::mapping! {
                "hostname" => "sw9",
                "vendor" => "cisco",
                "device_type" => "core_switch",
            },
            &global,
        )
        .unwrap();

    assert_eq!(composed.record["enable_password"], ConfigValue::from("env-secret"));
    assert_eq!(composed.record["mtu"], ConfigValue::from(9216_i64));
}

#[test]
fn unknown_device_type_is_skipped() {
    let root = workspace();
    let processor = processor(root.path(), MemoryFilesystem::new(), ProcessorOptions::default());
    let global = processor.load_global().unwrap();

    let outcome = processor
        .process_device(
            netgen_core::mapping! {
                "hostname" => "fw1",
                "vendor" => "cisco",
                "device_type" => "firewall",
            },
            &global,
        )
        .unwrap();

    assert!(matches!(
        outcome,
        DeviceOutcome::Skipped {
            stage: ProcessingStage::LoadDeviceTypeDefaults,
            ..
        }
    ));
}

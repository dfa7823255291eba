//! Device Batch Processor - main application orchestrator.
//!
//! Each device runs through a linear sequence of stages:
//!
//! ```text
//! ValidateRequiredFields → LoadDeviceTypeDefaults → ResolveSecrets → Compose
//!     → ResolveTemplate → Render → Write
//! ```
//!
//! Device-scoped failures (missing fields, missing device-type defaults,
//! missing template, render errors, write errors) end that device as
//! [`DeviceOutcome::Skipped`] and the batch moves on. Anything else (for
//! example, no way to prompt for a secret) aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, info_span, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, LayerStore, TemplateRenderer, TemplateStore, WriteOutcome},
        services::SecretResolver,
    },
    domain::{
        ConfigComposer, ConfigMapping, DeviceDescriptor, GlobalConfig, RenderedConfig,
        SecretRequest, Template, describe_raw,
    },
    error::{NetgenError, NetgenResult},
};

/// Processing stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    ValidateRequiredFields,
    LoadDeviceTypeDefaults,
    ResolveSecrets,
    Compose,
    ResolveTemplate,
    Render,
    Write,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ValidateRequiredFields => "validate required fields",
            Self::LoadDeviceTypeDefaults => "load device-type defaults",
            Self::ResolveSecrets => "resolve secrets",
            Self::Compose => "compose",
            Self::ResolveTemplate => "resolve template",
            Self::Render => "render",
            Self::Write => "write",
        })
    }
}

/// Terminal state of one device.
#[derive(Debug, Clone)]
pub enum DeviceOutcome {
    /// Output written (`replaced` when an existing file was overwritten).
    Written {
        path: PathBuf,
        rendered: RenderedConfig,
        replaced: bool,
    },
    /// Output existed and overwrite was not requested.
    WriteSkipped {
        path: PathBuf,
        rendered: RenderedConfig,
    },
    /// Dry run: everything but the write happened.
    DryRun {
        path: PathBuf,
        rendered: RenderedConfig,
    },
    /// The device could not be processed.
    Skipped {
        device: String,
        stage: ProcessingStage,
        reason: NetgenError,
    },
}

impl DeviceOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Collected outcomes of a batch, in descriptor order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DeviceOutcome>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::Written { .. }))
    }

    pub fn write_skipped(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::WriteSkipped { .. }))
    }

    pub fn dry_run(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::DryRun { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(DeviceOutcome::is_skipped)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, f: impl Fn(&DeviceOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(o)).count()
    }
}

/// Processing options fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    pub output_dir: PathBuf,
    /// Replace existing output files.
    pub force: bool,
    /// Stop before writing.
    pub dry_run: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output_configs"),
            force: false,
            dry_run: false,
        }
    }
}

/// A device that made it through composition.
#[derive(Debug, Clone)]
pub struct ComposedDevice {
    pub descriptor: DeviceDescriptor,
    pub record: ConfigMapping,
}

/// Stage failure before classification into skip / abort.
struct StageError {
    stage: ProcessingStage,
    error: NetgenError,
}

trait AtStage<T> {
    fn at(self, stage: ProcessingStage) -> Result<T, StageError>;
}

impl<T, E: Into<NetgenError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: ProcessingStage) -> Result<T, StageError> {
        self.map_err(|e| StageError {
            stage,
            error: e.into(),
        })
    }
}

/// Main device-processing service.
pub struct DeviceProcessor {
    layers: Box<dyn LayerStore>,
    templates: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    secrets: SecretResolver,
    requests: Vec<SecretRequest>,
    options: ProcessorOptions,
}

impl DeviceProcessor {
    /// Create a processor with the given adapters.
    ///
    /// `requests` lists the credentials to resolve for every device.
    pub fn new(
        layers: Box<dyn LayerStore>,
        templates: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        secrets: SecretResolver,
        requests: Vec<SecretRequest>,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            layers,
            templates,
            renderer,
            filesystem,
            secrets,
            requests,
            options,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Load the global configuration. Failure here is fatal for the run.
    pub fn load_global(&self) -> NetgenResult<GlobalConfig> {
        self.layers.load_global()
    }

    /// Load raw device entries from a batch document.
    pub fn load_batch(&self, path: &Path) -> NetgenResult<Vec<ConfigMapping>> {
        self.layers.load_batch(path)
    }

    /// Process every device in order. One bad device never aborts the rest.
    #[instrument(skip_all, fields(devices = devices.len()))]
    pub fn process_batch(
        &self,
        devices: Vec<ConfigMapping>,
        global: &GlobalConfig,
    ) -> NetgenResult<BatchReport> {
        let mut report = BatchReport::default();
        for (index, raw) in devices.into_iter().enumerate() {
            let outcome = self.process_indexed(raw, global, index)?;
            report.outcomes.push(outcome);
        }
        info!(
            written = report.written(),
            write_skipped = report.write_skipped(),
            skipped = report.skipped(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Process one device descriptor.
    pub fn process_device(
        &self,
        raw: ConfigMapping,
        global: &GlobalConfig,
    ) -> NetgenResult<DeviceOutcome> {
        self.process_indexed(raw, global, 0)
    }

    /// Run every stage up to and including composition.
    ///
    /// Used for inspecting a device's merged record without rendering.
    pub fn compose_device(
        &self,
        raw: ConfigMapping,
        global: &GlobalConfig,
    ) -> NetgenResult<ComposedDevice> {
        self.compose_stages(raw, global).map_err(|e| e.error)
    }

    fn process_indexed(
        &self,
        raw: ConfigMapping,
        global: &GlobalConfig,
        index: usize,
    ) -> NetgenResult<DeviceOutcome> {
        let device = describe_raw(&raw, index);
        let span = info_span!("device", hostname = %device);
        let _guard = span.enter();

        match self.run_stages(raw, global) {
            Ok(outcome) => Ok(outcome),
            Err(StageError { stage, error }) if error.is_device_scoped() => {
                warn!(%stage, reason = %error, "Skipping device");
                Ok(DeviceOutcome::Skipped {
                    device,
                    stage,
                    reason: error,
                })
            }
            Err(StageError { stage, error }) => {
                error!(%stage, reason = %error, "Aborting run");
                Err(error)
            }
        }
    }

    fn compose_stages(
        &self,
        raw: ConfigMapping,
        global: &GlobalConfig,
    ) -> Result<ComposedDevice, StageError> {
        use ProcessingStage::*;

        let mut descriptor =
            DeviceDescriptor::try_from_mapping(raw).at(ValidateRequiredFields)?;
        debug!(template_key = %descriptor.template_key(), "Descriptor validated");

        let device_type = self
            .layers
            .load_device_type(descriptor.device_type())
            .at(LoadDeviceTypeDefaults)?;

        let filled = self
            .secrets
            .fill_missing(&self.requests, descriptor.data_mut())
            .at(ResolveSecrets)?;
        for (path, source) in &filled {
            debug!(%path, %source, "Secret resolved");
        }

        let record = ConfigComposer::compose(global, &device_type, descriptor.data());
        debug!(keys = record.len(), "Record composed");

        Ok(ComposedDevice { descriptor, record })
    }

    fn run_stages(
        &self,
        raw: ConfigMapping,
        global: &GlobalConfig,
    ) -> Result<DeviceOutcome, StageError> {
        use ProcessingStage::*;

        let ComposedDevice { descriptor, record } = self.compose_stages(raw, global)?;
        let key = descriptor.template_key();

        let template = self.resolve_template(&key).at(ResolveTemplate)?;
        debug!(template = %template, "Template resolved");

        let text = self.renderer.render(&template, &record).at(Render)?;
        let rendered = RenderedConfig::new(descriptor.hostname(), key, record, text);

        let path = self.options.output_dir.join(descriptor.output_file_name());
        if self.options.dry_run {
            info!(path = %path.display(), "Dry run, not writing");
            return Ok(DeviceOutcome::DryRun { path, rendered });
        }

        self.filesystem
            .create_dir_all(&self.options.output_dir)
            .at(Write)?;
        let outcome = self
            .filesystem
            .write_file(&path, rendered.text(), self.options.force)
            .at(Write)?;

        Ok(match outcome {
            WriteOutcome::AlreadyExists => {
                warn!(path = %path.display(), "Output exists, not overwriting (use --force)");
                DeviceOutcome::WriteSkipped { path, rendered }
            }
            WriteOutcome::Created | WriteOutcome::Replaced => {
                info!(path = %path.display(), "Configuration saved");
                DeviceOutcome::Written {
                    path,
                    rendered,
                    replaced: outcome == WriteOutcome::Replaced,
                }
            }
        })
    }

    fn resolve_template(&self, key: &crate::domain::TemplateKey) -> NetgenResult<Template> {
        self.templates.find(key)?.ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::ports::{
            MockEnvironment, MockFilesystem, MockLayerStore, MockPrompter, MockTemplateRenderer,
            MockTemplateStore,
        },
        domain::{ConfigValue, TemplateKey},
        mapping,
    };

    fn global() -> GlobalConfig {
        GlobalConfig::new(mapping! {
            "default_configs" => mapping! { "mtu" => 1500_i64 },
            "regions" => mapping! { "eu" => mapping! { "mtu" => 9000_i64 } },
        })
    }

    fn device(hostname: &str) -> ConfigMapping {
        mapping! {
            "hostname" => hostname,
            "vendor" => "x",
            "device_type" => "y",
            "region" => "eu",
            "enable_password" => "inline",
        }
    }

    fn layers() -> MockLayerStore {
        let mut layers = MockLayerStore::new();
        layers
            .expect_load_device_type()
            .returning(|_| Ok(ConfigMapping::new()));
        layers
    }

    fn templates() -> MockTemplateStore {
        let mut templates = MockTemplateStore::new();
        templates
            .expect_find()
            .returning(|key| Ok(Some(Template::text(key.clone(), "mem", "mtu {{ mtu }}"))));
        templates
    }

    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|_, record| Ok(format!("mtu {}", record["mtu"])));
        renderer
    }

    fn resolver() -> SecretResolver {
        let mut env = MockEnvironment::new();
        env.expect_var().returning(|_| None);
        let mut prompter = MockPrompter::new();
        prompter.expect_ask_secret().never();
        SecretResolver::new(Box::new(env), Box::new(prompter))
    }

    fn enable_only() -> Vec<SecretRequest> {
        vec![SecretRequest::new(
            "enable_password",
            "NETGEN_ENABLE_PASSWORD",
            "Enable password",
        )]
    }

    fn processor(
        layers: MockLayerStore,
        templates: MockTemplateStore,
        filesystem: MockFilesystem,
        options: ProcessorOptions,
    ) -> DeviceProcessor {
        DeviceProcessor::new(
            Box::new(layers),
            Box::new(templates),
            Box::new(renderer()),
            Box::new(filesystem),
            resolver(),
            enable_only(),
            options,
        )
    }

    fn accepting_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .returning(|_, _, _| Ok(WriteOutcome::Created));
        fs
    }

    #[test]
    fn writes_rendered_record() {
        let p = processor(layers(), templates(), accepting_fs(), ProcessorOptions::default());

        let outcome = p.process_device(device("sw1"), &global()).unwrap();

        match outcome {
            DeviceOutcome::Written { path, rendered, replaced } => {
                assert_eq!(path, PathBuf::from("output_configs/sw1.config"));
                assert_eq!(rendered.text(), "mtu 9000");
                assert_eq!(rendered.template_key(), &TemplateKey::new("x", "y"));
                assert!(!replaced);
            }
            other => panic!("expected Written, got {other:?}"),
        }
    }

    #[test]
    fn missing_hostname_skips_at_validation() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        let p = processor(layers(), templates(), fs, ProcessorOptions::default());

        let mut raw = device("sw1");
        raw.remove("hostname");
        let outcome = p.process_device(raw, &global()).unwrap();

        assert!(matches!(
            outcome,
            DeviceOutcome::Skipped { stage: ProcessingStage::ValidateRequiredFields, .. }
        ));
    }

    #[test]
    fn missing_device_type_file_skips() {
        let mut layers = MockLayerStore::new();
        layers.expect_load_device_type().returning(|t| {
            Err(ApplicationError::DeviceTypeNotFound {
                device_type: t.to_owned(),
                path: PathBuf::from(format!("config/{t}.yml")),
            }
            .into())
        });
        let p = processor(layers, templates(), MockFilesystem::new(), ProcessorOptions::default());

        let outcome = p.process_device(device("sw1"), &global()).unwrap();
        assert!(matches!(
            outcome,
            DeviceOutcome::Skipped { stage: ProcessingStage::LoadDeviceTypeDefaults, .. }
        ));
    }

    #[test]
    fn missing_template_skips() {
        let mut templates = MockTemplateStore::new();
        templates.expect_find().returning(|_| Ok(None));
        let p = processor(layers(), templates, MockFilesystem::new(), ProcessorOptions::default());

        let outcome = p.process_device(device("sw1"), &global()).unwrap();
        match outcome {
            DeviceOutcome::Skipped { device, stage, reason } => {
                assert_eq!(device, "sw1");
                assert_eq!(stage, ProcessingStage::ResolveTemplate);
                assert!(reason.to_string().contains("x_y"));
            }
            other => panic!("expected Skipped, got {other:?}"),
        }
    }

    #[test]
    fn existing_output_is_write_skipped() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|_, _, overwrite| !*overwrite)
            .returning(|_, _, _| Ok(WriteOutcome::AlreadyExists));
        let p = processor(layers(), templates(), fs, ProcessorOptions::default());

        let outcome = p.process_device(device("sw1"), &global()).unwrap();
        assert!(matches!(outcome, DeviceOutcome::WriteSkipped { .. }));
    }

    #[test]
    fn force_is_passed_to_filesystem() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|_, _, overwrite| *overwrite)
            .returning(|_, _, _| Ok(WriteOutcome::Replaced));
        let options = ProcessorOptions {
            force: true,
            ..ProcessorOptions::default()
        };
        let p = processor(layers(), templates(), fs, options);

        let outcome = p.process_device(device("sw1"), &global()).unwrap();
        assert!(matches!(outcome, DeviceOutcome::Written { replaced: true, .. }));
    }

    #[test]
    fn dry_run_never_touches_filesystem() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();
        let options = ProcessorOptions {
            dry_run: true,
            ..ProcessorOptions::default()
        };
        let p = processor(layers(), templates(), fs, options);

        let outcome = p.process_device(device("sw1"), &global()).unwrap();
        assert!(matches!(outcome, DeviceOutcome::DryRun { .. }));
    }

    #[test]
    fn batch_continues_past_bad_device() {
        let p = processor(layers(), templates(), accepting_fs(), ProcessorOptions::default());
        let mut broken = device("sw2");
        broken.remove("hostname");

        let report = p
            .process_batch(vec![device("sw1"), broken, device("sw3")], &global())
            .unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.written(), 2);
        assert_eq!(report.skipped(), 1);
        assert!(report.outcomes[1].is_skipped());
    }

    #[test]
    fn prompt_failure_aborts_batch() {
        let mut env = MockEnvironment::new();
        env.expect_var().returning(|_| None);
        let mut prompter = MockPrompter::new();
        prompter.expect_ask_secret().returning(|p| {
            Err(ApplicationError::PromptUnavailable {
                prompt: p.to_owned(),
                reason: "no terminal".into(),
            }
            .into())
        });
        let p = DeviceProcessor::new(
            Box::new(layers()),
            Box::new(templates()),
            Box::new(renderer()),
            Box::new(MockFilesystem::new()),
            SecretResolver::new(Box::new(env), Box::new(prompter)),
            vec![SecretRequest::new("tacacs.key", "NETGEN_TACACS_KEY", "TACACS key")],
            ProcessorOptions::default(),
        );

        assert!(p.process_batch(vec![device("sw1")], &global()).is_err());
    }

    #[test]
    fn compose_device_includes_resolved_secrets() {
        let mut env = MockEnvironment::new();
        env.expect_var().returning(|_| Some("env-secret".into()));
        let mut prompter = MockPrompter::new();
        prompter.expect_ask_secret().never();
        let p = DeviceProcessor::new(
            Box::new(layers()),
            Box::new(MockTemplateStore::new()),
            Box::new(MockTemplateRenderer::new()),
            Box::new(MockFilesystem::new()),
            SecretResolver::new(Box::new(env), Box::new(prompter)),
            vec![SecretRequest::new("tacacs.key", "NETGEN_TACACS_KEY", "TACACS key")],
            ProcessorOptions::default(),
        );

        let composed = p.compose_device(device("sw1"), &global()).unwrap();
        let tacacs = composed.record["tacacs"].as_mapping().unwrap();
        assert_eq!(tacacs["key"], ConfigValue::from("env-secret"));
        assert_eq!(composed.record["mtu"], ConfigValue::from(9000_i64));
    }
}

use crate::domain::{entities::device::TemplateKey, value::ConfigMapping};

/// The merged record together with the text rendered from it.
///
/// Immutable once produced: fields are private and only exposed by
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedConfig {
    hostname: String,
    template_key: TemplateKey,
    record: ConfigMapping,
    text: String,
}

impl RenderedConfig {
    pub fn new(
        hostname: impl Into<String>,
        template_key: TemplateKey,
        record: ConfigMapping,
        text: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            template_key,
            record,
            text: text.into(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn template_key(&self) -> &TemplateKey {
        &self.template_key
    }

    pub fn record(&self) -> &ConfigMapping {
        &self.record
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

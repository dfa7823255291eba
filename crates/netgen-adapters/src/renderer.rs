//! Tera renderer.
//!
//! Text templates use Jinja2-compatible syntax. The merged record is the
//! context, plus `generated_at` (RFC 3339) and `template_key`.

use std::error::Error as _;

use chrono::{DateTime, Utc};
use tera::{Context, Tera};
use tracing::instrument;

use netgen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{ConfigMapping, Template, TemplateSource},
    error::NetgenResult,
};

use crate::builtin_templates;

/// Renderer for file templates and built-in emitters.
#[derive(Debug, Clone, Default)]
pub struct TeraRenderer {
    fixed_time: Option<DateTime<Utc>>,
}

impl TeraRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `generated_at` to a fixed instant (reproducible output).
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            fixed_time: Some(time),
        }
    }

    fn generated_at(&self) -> String {
        self.fixed_time.unwrap_or_else(Utc::now).to_rfc3339()
    }

    fn render_text(&self, template: &Template, body: &str, record: &ConfigMapping) -> NetgenResult<String> {
        let failed = |reason: String| ApplicationError::RenderingFailed {
            key: template.key.to_string(),
            reason,
        };

        let mut context = Context::from_serialize(record).map_err(|e| failed(error_chain(&e)))?;
        context.insert("generated_at", &self.generated_at());
        context.insert("template_key", template.key.as_str());

        Tera::one_off(body, &context, false).map_err(|e| failed(error_chain(&e)).into())
    }
}

impl TemplateRenderer for TeraRenderer {
    #[instrument(skip_all, fields(template = %template))]
    fn render(&self, template: &Template, record: &ConfigMapping) -> NetgenResult<String> {
        match &template.source {
            TemplateSource::Text(body) => self.render_text(template, body, record),
            TemplateSource::Builtin { vendor } => builtin_templates::render(vendor, record)
                .unwrap_or_else(|| {
                    Err(builtin_templates::EmitError {
                        section: "vendor",
                        field: "emitter",
                    })
                })
                .map_err(|e| {
                    ApplicationError::RenderingFailed {
                        key: template.key.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                }),
        }
    }
}

/// Tera's top-level message is generic; the cause chain says what failed.
fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use netgen_core::{
        domain::{ConfigValue, TemplateKey},
        mapping,
    };

    fn key() -> TemplateKey {
        TemplateKey::new("acme", "access_switch")
    }

    fn record() -> ConfigMapping {
        mapping! {
            "hostname" => "sw1",
            "vlans" => vec![
                ConfigValue::from(mapping! { "id" => 10_i64, "name" => "users" }),
                ConfigValue::from(mapping! { "id" => 20_i64 }),
            ],
            "snmp" => mapping! { "location" => "sto" },
        }
    }

    #[test]
    fn renders_record_fields() {
        let template = Template::text(
            key(),
            "test",
            "hostname {{ hostname }}\n{% for v in vlans %}vlan {{ v.id }}{% if v.name %} {{ v.name }}{% endif %}\n{% endfor %}snmp {{ snmp.location }}",
        );

        let text = TeraRenderer::new().render(&template, &record()).unwrap();
        assert_eq!(text, "hostname sw1\nvlan 10 users\nvlan 20\nsnmp sto");
    }

    #[test]
    fn exposes_key_and_timestamp() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let template = Template::text(key(), "test", "! {{ template_key }} {{ generated_at }}");

        let text = TeraRenderer::at(time).render(&template, &record()).unwrap();
        assert_eq!(text, "! acme_access_switch 2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn undefined_variable_is_rendering_failure() {
        let template = Template::text(key(), "test", "{{ does_not_exist.field }}");

        let err = TeraRenderer::new().render(&template, &record()).unwrap_err();
        assert!(err.is_device_scoped());
        assert!(err.to_string().contains("acme_access_switch"));
    }

    #[test]
    fn syntax_error_is_rendering_failure() {
        let template = Template::text(key(), "test", "{% for x in %}");
        assert!(TeraRenderer::new().render(&template, &record()).is_err());
    }

    #[test]
    fn builtin_dispatch() {
        let template = Template::builtin(TemplateKey::new("dell", "access_switch"), "dell");
        let text = TeraRenderer::new().render(&template, &record()).unwrap();
        assert!(text.starts_with("hostname sw1\n!\nvlan 10\n name users\n!"));
    }

    #[test]
    fn builtin_for_unknown_vendor_fails() {
        let template = Template::builtin(TemplateKey::new("nope", "x"), "nope");
        assert!(TeraRenderer::new().render(&template, &record()).is_err());
    }

    #[test]
    fn no_html_escaping() {
        let template = Template::text(key(), "test", "{{ banner }}");
        let record = mapping! { "banner" => "<authorized & only>" };
        let text = TeraRenderer::new().render(&template, &record).unwrap();
        assert_eq!(text, "<authorized & only>");
    }
}

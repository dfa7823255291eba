//! Resolved templates.
//!
//! A [`Template`] is what the template store hands to the renderer for a
//! [`TemplateKey`]: either template text loaded from disk or a reference to a
//! built-in line emitter for a vendor.

use std::fmt;

use crate::domain::entities::device::TemplateKey;

/// Where a template's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Template text (Jinja-style syntax).
    Text(String),
    /// Built-in emitter registered for a vendor.
    Builtin { vendor: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub key: TemplateKey,
    /// Human-readable origin, e.g. a file path or `builtin:dell`.
    pub origin: String,
    pub source: TemplateSource,
}

impl Template {
    pub fn text(key: TemplateKey, origin: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key,
            origin: origin.into(),
            source: TemplateSource::Text(body.into()),
        }
    }

    pub fn builtin(key: TemplateKey, vendor: impl Into<String>) -> Self {
        let vendor = vendor.into();
        Self {
            key,
            origin: format!("builtin:{vendor}"),
            source: TemplateSource::Builtin { vendor },
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, TemplateSource::Builtin { .. })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.origin)
    }
}

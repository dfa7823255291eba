//! Recursive configuration value model.
//!
//! Every layer (global defaults, region overrides, device-type defaults,
//! device input) and the final merged record is a [`ConfigMapping`]. Values
//! are a closed set of variants so that merge and traversal can type-check
//! before acting instead of guessing at runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// String-keyed mapping of configuration values.
///
/// `BTreeMap` keeps iteration deterministic so rendered output and
/// serialised records are stable between runs. Key order carries no meaning.
pub type ConfigMapping = BTreeMap<String, ConfigValue>;

/// One node in a configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null / absent value.
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Ordered sequence. Never merged element-wise.
    Sequence(Vec<ConfigValue>),
    Mapping(ConfigMapping),
}

impl ConfigValue {
    /// Empty mapping value.
    pub fn mapping() -> Self {
        Self::Mapping(ConfigMapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_mapping(&self) -> Option<&ConfigMapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut ConfigMapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness as the composition rules understand it.
    ///
    /// Null, `false`, zero, the empty string and empty collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Sequence(items) => !items.is_empty(),
            Self::Mapping(m) => !m.is_empty(),
        }
    }

    /// Scalar rendered as plain text; `None` for null and collections.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Null | Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            Self::Mapping(_) => write!(f, "<mapping>"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<ConfigMapping> for ConfigValue {
    fn from(m: ConfigMapping) -> Self {
        Self::Mapping(m)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::Sequence(items)
    }
}

// ── Dotted key paths ──────────────────────────────────────────────────────────

/// A dot-separated key path such as `tacacs.key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath {
    raw: String,
}

impl DottedPath {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Non-empty segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.').filter(|s| !s.is_empty())
    }

    /// Walk `root` along this path.
    ///
    /// Traversal through a non-mapping value, or a missing key, yields
    /// `None`. It never fails.
    pub fn lookup<'a>(&self, root: &'a ConfigMapping) -> Option<&'a ConfigValue> {
        let mut segments = self.segments();
        let mut current = root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Store `value` at this path, creating intermediate mappings.
    ///
    /// An intermediate non-mapping value is replaced by a mapping.
    pub fn insert(&self, root: &mut ConfigMapping, value: ConfigValue) {
        let segments: Vec<&str> = self.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = root;
        for segment in parents {
            let slot = current
                .entry((*segment).to_owned())
                .or_insert_with(ConfigValue::mapping);
            if slot.as_mapping().is_none() {
                *slot = ConfigValue::mapping();
            }
            let Some(next) = slot.as_mapping_mut() else {
                return;
            };
            current = next;
        }
        current.insert((*last).to_owned(), value);
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for DottedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Build a [`ConfigMapping`] from `key => value` pairs.
///
/// ```
/// use netgen_core::mapping;
/// let m = mapping! { "mtu" => 1500_i64, "name" => "core" };
/// assert_eq!(m.len(), 2);
/// ```
#[macro_export]
macro_rules! mapping {
    () => { $crate::domain::ConfigMapping::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut m = $crate::domain::ConfigMapping::new();
        $( m.insert(::std::string::String::from($key), $crate::domain::ConfigValue::from($value)); )+
        m
    }};
}

//! Domain entities.

pub mod device;
pub mod global;
pub mod rendered;
pub mod template;

pub use device::{DeviceDescriptor, REQUIRED_FIELDS, TemplateKey, describe_raw};
pub use global::{GlobalConfig, VERBATIM_KEYS};
pub use rendered::RenderedConfig;
pub use template::{Template, TemplateSource};

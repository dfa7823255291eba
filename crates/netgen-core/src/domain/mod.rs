// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for netgen.
//!
//! Pure composition logic with no I/O. Loading YAML, rendering templates,
//! reading the environment and prompting the operator are all reached through
//! ports defined in the application layer.
//!
//! - **No I/O**: no filesystem, environment, or terminal access
//! - **No async**: everything is synchronous
//! - **Immutable inputs**: layers are borrowed, the merged record is new
//!
// Public API - what the world sees
pub mod compose;
pub mod entities;
pub mod error;
pub mod merge;
pub mod secret;
pub mod value;

mod validation;

// Re-exports for convenience
pub use compose::{ConfigComposer, Layer};
pub use entities::{
    DeviceDescriptor, GlobalConfig, REQUIRED_FIELDS, RenderedConfig, Template, TemplateKey,
    TemplateSource, VERBATIM_KEYS, describe_raw,
};
pub use error::{DomainError, ErrorCategory};
pub use merge::deep_merge;
pub use secret::{ResolvedSecret, SecretRequest, SecretSource, default_requests};
pub use validation::DomainValidator;
pub use value::{ConfigMapping, ConfigValue, DottedPath};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;

    // ========================================================================
    // Cross-module scenarios
    // ========================================================================

    #[test]
    fn descriptor_to_record_end_to_end() {
        let global = GlobalConfig::new(mapping! {
            "default_configs" => mapping! { "mtu" => 1500_i64 },
            "regions" => mapping! { "eu" => mapping! { "mtu" => 9000_i64 } },
        });
        let descriptor = DeviceDescriptor::try_from_mapping(mapping! {
            "hostname" => "sw1",
            "region" => "eu",
            "vendor" => "x",
            "device_type" => "y",
        })
        .unwrap();

        let record = ConfigComposer::compose(&global, &ConfigMapping::new(), descriptor.data());

        assert_eq!(record["mtu"], ConfigValue::from(9000_i64));
        assert_eq!(descriptor.template_key().as_str(), "x_y");
    }

    #[test]
    fn inserted_secret_survives_composition() {
        let global = GlobalConfig::new(mapping! {
            "default_configs" => mapping! { "tacacs" => mapping! { "servers" => vec![ConfigValue::from("10.1.1.1")] } },
        });
        let mut device = mapping! { "hostname" => "sw1" };
        let request = SecretRequest::new("tacacs.key", "NETGEN_TACACS_KEY", "TACACS key");
        request.path.insert(&mut device, "k3y".into());

        let record = ConfigComposer::compose(&global, &ConfigMapping::new(), &device);
        let tacacs = record["tacacs"].as_mapping().unwrap();
        assert_eq!(tacacs["key"], ConfigValue::from("k3y"));
        assert!(tacacs["servers"].as_sequence().is_some());
    }
}

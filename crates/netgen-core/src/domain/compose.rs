//! Hierarchical composition of the four configuration layers.
//!
//! ```text
//! global defaults ──► region overrides ──► device-type defaults ──► device
//!    (lowest)                                                    (highest)
//! ```
//!
//! Later layers win on scalar and sequence keys; nested mappings are merged
//! key-by-key. The three verbatim global blocks (`base_commands`,
//! `banner_text`, `fallback_user`) are copied whole after the defaults.

use std::fmt;

use tracing::{debug, trace};

use crate::domain::{
    entities::GlobalConfig,
    merge::deep_merge,
    value::{ConfigMapping, ConfigValue},
};

/// Named input to composition, in precedence order (lowest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    GlobalDefaults,
    RegionOverrides,
    DeviceTypeDefaults,
    DeviceSpecific,
}

impl Layer {
    /// All layers in application order.
    pub const ORDER: [Layer; 4] = [
        Layer::GlobalDefaults,
        Layer::RegionOverrides,
        Layer::DeviceTypeDefaults,
        Layer::DeviceSpecific,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalDefaults => "global-defaults",
            Self::RegionOverrides => "region-overrides",
            Self::DeviceTypeDefaults => "device-type-defaults",
            Self::DeviceSpecific => "device-specific",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless composer applying the layers in their fixed order.
pub struct ConfigComposer;

impl ConfigComposer {
    /// Compose the final record for one device.
    ///
    /// Never fails: missing sections are empty and an unknown region is no
    /// override.
    pub fn compose(
        global: &GlobalConfig,
        device_type: &ConfigMapping,
        device: &ConfigMapping,
    ) -> ConfigMapping {
        let mut record = ConfigMapping::new();

        // 1. Global defaults, then capabilities.
        if let Some(defaults) = global.default_configs() {
            deep_merge(defaults, &mut record);
        }
        if let Some(capabilities) = global.default_capabilities() {
            deep_merge(capabilities, &mut record);
        }

        // 2. Atomic blocks replace whatever the defaults put there.
        for (key, block) in global.verbatim_blocks() {
            record.insert(key.to_owned(), block.clone());
        }
        trace!(layer = %Layer::GlobalDefaults, keys = record.len(), "Layer applied");

        // 3. Region overrides.
        let region = device
            .get("region")
            .and_then(ConfigValue::as_str)
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !region.is_empty() {
            match global.region(&region) {
                Some(overrides) => {
                    debug!(region = %region, keys = overrides.len(), "Applying region overrides");
                    deep_merge(overrides, &mut record);
                }
                None => debug!(region = %region, "No overrides for region"),
            }
        }

        // 4. Device-type defaults, 5. device-specific data.
        deep_merge(device_type, &mut record);
        trace!(layer = %Layer::DeviceTypeDefaults, keys = record.len(), "Layer applied");
        deep_merge(device, &mut record);
        trace!(layer = %Layer::DeviceSpecific, keys = record.len(), "Layer applied");

        record
    }
}

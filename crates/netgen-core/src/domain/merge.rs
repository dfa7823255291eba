//! Deep merge of one mapping into another.

use super::value::{ConfigMapping, ConfigValue};

/// Merge `source` into `destination` and return `destination`.
///
/// - A mapping in `source` is merged key-by-key into the mapping at the same
///   key in `destination`. A missing or non-mapping destination value is
///   replaced by an empty mapping first.
/// - Every other value (scalar, sequence, null) replaces the destination
///   value wholesale.
///
/// The operation is not associative: apply layers in precedence order.
pub fn deep_merge<'a>(
    source: &ConfigMapping,
    destination: &'a mut ConfigMapping,
) -> &'a mut ConfigMapping {
    for (key, value) in source {
        match value {
            ConfigValue::Mapping(nested) => {
                let slot = destination
                    .entry(key.clone())
                    .or_insert_with(ConfigValue::mapping);
                if slot.as_mapping().is_none() {
                    *slot = ConfigValue::mapping();
                }
                if let Some(inner) = slot.as_mapping_mut() {
                    deep_merge(nested, inner);
                }
            }
            other => {
                destination.insert(key.clone(), other.clone());
            }
        }
    }
    destination
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;

    #[test]
    fn nested_keys_are_unioned() {
        let source = mapping! { "a" => mapping! { "x" => 1_i64 } };
        let mut dest = mapping! { "a" => mapping! { "y" => 2_i64 } };
        deep_merge(&source, &mut dest);
        assert_eq!(dest, mapping! { "a" => mapping! { "x" => 1_i64, "y" => 2_i64 } });
    }

    #[test]
    fn merging_into_copy_of_itself_is_identity() {
        let m = mapping! {
            "mtu" => 1500_i64,
            "snmp" => mapping! { "location" => "dc1", "v3" => true },
            "ntp" => vec![ConfigValue::from("10.0.0.1"), ConfigValue::from("10.0.0.2")],
            "nothing" => ConfigValue::Null,
        };
        let mut copy = m.clone();
        deep_merge(&m, &mut copy);
        assert_eq!(copy, m);
    }

    #[test]
    fn sequences_are_replaced_not_merged() {
        let source = mapping! { "ntp" => vec![ConfigValue::from("b")] };
        let mut dest = mapping! { "ntp" => vec![ConfigValue::from("a"), ConfigValue::from("c")] };
        deep_merge(&source, &mut dest);
        assert_eq!(dest["ntp"], ConfigValue::from(vec![ConfigValue::from("b")]));
    }

    #[test]
    fn scalar_overwrites_mapping() {
        let source = mapping! { "snmp" => "disabled" };
        let mut dest = mapping! { "snmp" => mapping! { "location" => "dc1" } };
        deep_merge(&source, &mut dest);
        assert_eq!(dest["snmp"], ConfigValue::from("disabled"));
    }

    #[test]
    fn mapping_replaces_scalar_destination() {
        let source = mapping! { "snmp" => mapping! { "location" => "dc1" } };
        let mut dest = mapping! { "snmp" => "disabled" };
        deep_merge(&source, &mut dest);
        assert_eq!(dest["snmp"], ConfigValue::from(mapping! { "location" => "dc1" }));
    }

    #[test]
    fn null_in_source_replaces() {
        let source = mapping! { "banner" => ConfigValue::Null };
        let mut dest = mapping! { "banner" => "hello" };
        deep_merge(&source, &mut dest);
        assert!(dest["banner"].is_null());
    }

    #[test]
    fn order_matters() {
        let a = mapping! { "k" => "a" };
        let b = mapping! { "k" => "b" };

        let mut left = ConfigMapping::new();
        deep_merge(&a, &mut left);
        deep_merge(&b, &mut left);

        let mut right = ConfigMapping::new();
        deep_merge(&b, &mut right);
        deep_merge(&a, &mut right);

        assert_ne!(left, right);
    }

    #[test]
    fn returns_destination() {
        let source = mapping! { "x" => 1_i64 };
        let mut dest = ConfigMapping::new();
        let out = deep_merge(&source, &mut dest);
        assert_eq!(out.len(), 1);
    }
}

//! Registry of shipped resource types.
//!
//! Each submodule declares the field tables and `ResourceDef`s for one
//! FortiOS configuration area. Adding a resource type means adding a
//! static definition here; nothing else is resource-specific.

pub mod firewall;
pub mod router;
pub mod switch_controller;
pub mod system;
pub mod user;

use crate::error::CoreError;
use crate::resource::ResourceDef;

/// Every resource type, in listing order.
pub static ALL: &[&ResourceDef] = &[
    &firewall::INTERNET_SERVICE_DEFINITION,
    &firewall::INTERNET_SERVICE_DEFINITION_ENTRY,
    &firewall::INTERNET_SERVICE_DEFINITION_ENTRY_PORT_RANGE,
    &router::BFD,
    &router::BFD_NEIGHBOR,
    &router::STATIC,
    &switch_controller::QOS_DOT1P_MAP,
    &switch_controller::QOS_IP_DSCP_MAP,
    &switch_controller::QOS_IP_DSCP_MAP_MAP,
    &switch_controller::QOS_QUEUE_POLICY,
    &system::DNS,
    &user::RADIUS,
];

pub fn all() -> &'static [&'static ResourceDef] {
    ALL
}

/// Find a resource type by name. The `fmgdevice_` prefix is optional.
pub fn lookup(type_name: &str) -> Option<&'static ResourceDef> {
    let wanted = type_name.strip_prefix("fmgdevice_").unwrap_or(type_name);
    ALL.iter()
        .copied()
        .find(|def| def.type_name.strip_prefix("fmgdevice_") == Some(wanted))
}

pub fn require(type_name: &str) -> Result<&'static ResourceDef, CoreError> {
    lookup(type_name).ok_or_else(|| CoreError::UnknownResource(type_name.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::resource::KeySpec;
    use crate::schema::{self, FieldKind};

    #[test]
    fn type_names_are_unique() {
        let names: HashSet<_> = ALL.iter().map(|d| d.type_name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn lookup_accepts_short_names() {
        assert!(lookup("router_bfd").is_some());
        assert!(lookup("fmgdevice_router_bfd").is_some());
        assert!(lookup("router_ospf").is_none());
        assert!(matches!(
            require("router_ospf"),
            Err(CoreError::UnknownResource(_))
        ));
    }

    #[test]
    fn table_keys_exist_in_schema() {
        for def in ALL {
            if let KeySpec::Field(name) = def.key {
                assert!(
                    def.key_field().is_some(),
                    "{}: key field {name} missing from schema",
                    def.type_name
                );
            }
        }
    }

    #[test]
    fn block_keys_exist_in_their_tables() {
        for def in ALL {
            for entry in schema::walk(def.fields) {
                if let FieldKind::Block(spec) = entry.field.kind {
                    if let Some(key) = spec.key {
                        assert!(
                            schema::find(spec.fields, key).is_some(),
                            "{}: block {} keyed by missing {key}",
                            def.type_name,
                            entry.path
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn parent_placeholders_appear_in_paths() {
        for def in ALL {
            for parent in def.parents {
                assert!(
                    def.path.contains(&format!("{{{}}}", parent.placeholder)),
                    "{}: {} not in {}",
                    def.type_name,
                    parent.placeholder,
                    def.path
                );
            }
        }
    }
}

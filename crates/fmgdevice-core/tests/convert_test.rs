#![allow(clippy::unwrap_used)]
// Expand/flatten over every shipped resource schema.

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use fmgdevice_core::convert::{FlattenOptions, expand_object, flatten_object};
use fmgdevice_core::resources;
use fmgdevice_core::schema::{Field, FieldKind};

/// A well-formed state value for every field, nested blocks included.
fn sample(fields: &'static [Field], depth: usize) -> Map<String, Value> {
    let mut out = Map::new();
    for (i, field) in fields.iter().enumerate() {
        let value = match field.kind {
            FieldKind::String => json!(format!("{}-{depth}", field.name)),
            FieldKind::Integer => json!(i + depth * 10),
            FieldKind::StringSet => json!(["alpha", "beta"]),
            FieldKind::IpMask => json!(format!("10.{depth}.0.0 255.255.0.0")),
            FieldKind::Block(spec) => Value::Array(vec![
                Value::Object(sample(spec.fields, depth + 1)),
            ]),
        };
        out.insert(field.name.to_owned(), value);
    }
    out
}

#[test]
fn expand_then_flatten_is_identity_for_every_resource() {
    for def in resources::all() {
        let state = sample(def.fields, 0);
        let api = expand_object(def.fields, &state, "").unwrap();
        let back =
            flatten_object(def.fields, &api, Some(&state), FlattenOptions::default(), "").unwrap();
        assert_eq!(back, state, "round trip changed {}", def.type_name);
    }
}

#[test]
fn expanded_keys_are_hyphenated() {
    for def in resources::all() {
        let api = expand_object(def.fields, &sample(def.fields, 0), "").unwrap();
        for key in api.keys() {
            assert!(!key.contains('_'), "{}: {key}", def.type_name);
        }
    }
}

#[test]
fn sensitive_values_are_sent_but_never_read_back() {
    let def = resources::lookup("user_radius").unwrap();
    let state = sample(def.fields, 0);
    let api = expand_object(def.fields, &state, "").unwrap();
    assert_eq!(api["secret"], json!(["alpha", "beta"]));

    let mut masked = api.clone();
    masked.insert("secret".into(), json!(["ENC XXXX"]));
    let back = flatten_object(def.fields, &masked, None, FlattenOptions::default(), "").unwrap();
    assert!(!back.contains_key("secret"));
}

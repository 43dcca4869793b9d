// API → state conversion.
//
// FortiManager is loose about scalar shapes: single values come back
// wrapped in one-element arrays, integers arrive as strings, and set
// members are sometimes returned as a bare string. Those are normalized
// here. Anything that cannot be normalized is a `Flatten` error carrying
// the state path of the offending value.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::schema::{BlockSpec, Field, FieldKind};

/// Value of the `dynamic_sort_subtable` attribute.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubtableSort {
    /// Keep FortiManager's order.
    #[default]
    False,
    /// Same as `natural`.
    True,
    /// Integer keys compare numerically, everything else lexically.
    Natural,
    /// Keys always compare lexically.
    Alphabetical,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenOptions {
    pub sort: SubtableSort,
}

/// Flatten a FortiManager object into state attributes.
///
/// `prior` is the current state, consulted for sensitive fields and for
/// matching nested rows.
pub fn flatten_object(
    fields: &'static [Field],
    api: &Map<String, Value>,
    prior: Option<&Map<String, Value>>,
    opts: FlattenOptions,
    prefix: &str,
) -> Result<Map<String, Value>, CoreError> {
    let mut out = Map::new();
    for field in fields {
        let prior_value = prior.and_then(|p| p.get(field.name)).filter(|v| !v.is_null());

        if field.sensitive {
            if let Some(kept) = prior_value {
                out.insert(field.name.to_owned(), kept.clone());
            }
            continue;
        }

        let Some(value) = api.get(field.api_name().as_ref()) else {
            continue;
        };
        let path = format!("{prefix}{}", field.name);
        if let Some(flat) = flatten_value(field, value, prior_value, opts, &path)? {
            out.insert(field.name.to_owned(), flat);
        }
    }
    Ok(out)
}

/// Flatten one API value. `Ok(None)` means "leave the attribute unset".
pub fn flatten_value(
    field: &Field,
    value: &Value,
    prior: Option<&Value>,
    opts: FlattenOptions,
    path: &str,
) -> Result<Option<Value>, CoreError> {
    if value.is_null() {
        return Ok(None);
    }

    match field.kind {
        FieldKind::String => Ok(unwrap_single(value, path)?
            .map(|v| scalar_to_string(v, path))
            .transpose()?
            .map(Value::String)),
        FieldKind::Integer => Ok(unwrap_single(value, path)?
            .map(|v| to_integer(v, path))
            .transpose()?
            .map(Value::Number)),
        FieldKind::StringSet => {
            let mut items = match value {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| scalar_to_string(item, &format!("{path}.{i}")))
                    .collect::<Result<Vec<_>, _>>()?,
                Value::String(s) if s.is_empty() => Vec::new(),
                other => vec![scalar_to_string(other, path)?],
            };
            items.sort();
            items.dedup();
            Ok(Some(Value::Array(
                items.into_iter().map(Value::String).collect(),
            )))
        }
        FieldKind::IpMask => match value {
            Value::Array(items) if items.is_empty() => Ok(None),
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| scalar_to_string(item, &format!("{path}.{i}")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Value::String(parts.join(" "))))
            }
            other => Ok(Some(Value::String(scalar_to_string(other, path)?))),
        },
        FieldKind::Block(spec) => {
            let rows: Vec<&Value> = match value {
                Value::Array(rows) => rows.iter().collect(),
                Value::Object(_) => vec![value],
                _ => return Err(flatten_error(path, "expected a list of objects")),
            };
            let prior_rows = prior.and_then(Value::as_array);
            let mut out = Vec::with_capacity(rows.len());
            for (i, row) in rows.into_iter().enumerate() {
                let Value::Object(row) = row else {
                    return Err(flatten_error(&format!("{path}.{i}"), "expected an object"));
                };
                let prior_row = match_prior_row(&spec, row, i, prior_rows);
                out.push(Value::Object(flatten_object(
                    spec.fields,
                    row,
                    prior_row,
                    opts,
                    &format!("{path}.{i}."),
                )?));
            }
            if let Some(key) = spec.key {
                sort_rows(&mut out, key, opts.sort);
            }
            Ok(Some(Value::Array(out)))
        }
    }
}

/// Unwrap FortiManager's `["value"]` form. An empty array means unset.
fn unwrap_single<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Value>, CoreError> {
    match value {
        Value::Array(items) => match items.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(single)),
            _ => Err(flatten_error(path, "expected a single value, got a list")),
        },
        Value::Object(_) => Err(flatten_error(path, "expected a scalar, got an object")),
        other => Ok(Some(other)),
    }
}

fn scalar_to_string(value: &Value, path: &str) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "enable" } else { "disable" }.to_owned()),
        _ => Err(flatten_error(path, "expected a string")),
    }
}

fn to_integer(value: &Value, path: &str) -> Result<Number, CoreError> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.clone()),
        #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Number::from(f as i64)),
            _ => Err(flatten_error(path, &format!("{n} is not an integer"))),
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Number::from)
            .map_err(|_| flatten_error(path, &format!("'{s}' is not an integer"))),
        _ => Err(flatten_error(path, "expected an integer")),
    }
}

/// Pick the prior-state row for an API row: by key when the block has
/// one, by position otherwise.
fn match_prior_row<'a>(
    spec: &BlockSpec,
    row: &Map<String, Value>,
    index: usize,
    prior_rows: Option<&'a Vec<Value>>,
) -> Option<&'a Map<String, Value>> {
    let prior_rows = prior_rows?;
    let keyed = spec.key.and_then(|key| {
        let field = spec.fields.iter().find(|f| f.name == key)?;
        let api_key = row.get(field.api_name().as_ref())?;
        let wanted = key_text(api_key)?;
        prior_rows.iter().filter_map(Value::as_object).find(|p| {
            p.get(key)
                .and_then(key_text)
                .is_some_and(|have| have == wanted)
        })
    });
    keyed.or_else(|| prior_rows.get(index).and_then(Value::as_object))
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.len() == 1 => items.first().and_then(key_text),
        _ => None,
    }
}

fn sort_rows(rows: &mut [Value], key: &str, mode: SubtableSort) {
    let compare: fn(&str, &str) -> Ordering = match mode {
        SubtableSort::False => return,
        SubtableSort::True | SubtableSort::Natural => natural_cmp,
        SubtableSort::Alphabetical => alphabetical_cmp,
    };
    rows.sort_by(|a, b| {
        let a = a.get(key).and_then(key_text).unwrap_or_default();
        let b = b.get(key).and_then(key_text).unwrap_or_default();
        compare(&a, &b)
    });
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn alphabetical_cmp(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

fn flatten_error(path: &str, reason: &str) -> CoreError {
    CoreError::Flatten {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    static NEIGHBOR: &[Field] = &[
        Field::string("ip"),
        Field::string("interface"),
        Field::string("md5_key").sensitive(),
    ];
    static MAP_ROW: &[Field] = &[
        Field::string("name"),
        Field::integer("queue_number"),
        Field::string_set("cos_queue"),
    ];
    static DEF: &[Field] = &[
        Field::fosid(),
        Field::string("dscp"),
        Field::string("password").sensitive(),
        Field::string_set("members"),
        Field::block("neighbor", NEIGHBOR).keyed("ip"),
        Field::block("map", MAP_ROW).keyed("name"),
    ];

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn flatten(api: Value, prior: Option<Value>, sort: SubtableSort) -> Map<String, Value> {
        let prior = prior.map(obj);
        flatten_object(
            DEF,
            &obj(api),
            prior.as_ref(),
            FlattenOptions { sort },
            "",
        )
        .unwrap()
    }

    #[test]
    fn ipmask_list_is_joined() {
        static ROUTE: &[Field] = &[Field::ipmask("dst"), Field::ipmask("src")];
        let api = obj(json!({"dst": ["10.1.0.0", "255.255.0.0"], "src": []}));
        let out = flatten_object(ROUTE, &api, None, FlattenOptions::default(), "").unwrap();
        assert_eq!(out["dst"], json!("10.1.0.0 255.255.0.0"));
        assert!(!out.contains_key("src"));
    }

    #[test]
    fn renames_keys_back_to_state() {
        let out = flatten(
            json!({"id": 3, "map": [{"name": "m1", "queue-number": 2, "cos-queue": ["1", "0"]}]}),
            None,
            SubtableSort::False,
        );
        assert_eq!(
            Value::Object(out),
            json!({"fosid": 3, "map": [{"name": "m1", "queue_number": 2, "cos_queue": ["0", "1"]}]})
        );
    }

    #[test]
    fn normalizes_fortimanager_scalar_shapes() {
        let out = flatten(
            json!({"id": "7", "dscp": ["af11"], "members": "port1"}),
            None,
            SubtableSort::False,
        );
        assert_eq!(out["fosid"], json!(7));
        assert_eq!(out["dscp"], json!("af11"));
        assert_eq!(out["members"], json!(["port1"]));
    }

    #[test]
    fn empty_wrapped_scalar_is_unset() {
        let out = flatten(json!({"dscp": []}), None, SubtableSort::False);
        assert!(!out.contains_key("dscp"));
    }

    #[test]
    fn sensitive_fields_keep_prior_state() {
        let out = flatten(
            json!({
                "password": ["ENC XXXX"],
                "neighbor": [{"ip": "10.0.0.2", "md5-key": "ENC YYYY"}]
            }),
            Some(json!({
                "password": "hunter2",
                "neighbor": [
                    {"ip": "10.0.0.1", "md5_key": "one"},
                    {"ip": "10.0.0.2", "md5_key": "two"}
                ]
            })),
            SubtableSort::False,
        );
        assert_eq!(out["password"], json!("hunter2"));
        assert_eq!(out["neighbor"], json!([{"ip": "10.0.0.2", "md5_key": "two"}]));
    }

    #[test]
    fn sensitive_fields_without_prior_state_are_omitted() {
        let out = flatten(json!({"password": ["ENC XXXX"]}), None, SubtableSort::False);
        assert!(!out.contains_key("password"));
    }

    #[test]
    fn subtables_keep_api_order_by_default() {
        let out = flatten(
            json!({"neighbor": [{"ip": "10.0.0.9"}, {"ip": "10.0.0.10"}]}),
            None,
            SubtableSort::False,
        );
        assert_eq!(out["neighbor"][0]["ip"], "10.0.0.9");
    }

    #[test]
    fn natural_sort_orders_integer_keys_numerically() {
        static IDS: &[Field] = &[Field::fosid()];
        static TOP: &[Field] = &[Field::block("entry", IDS).keyed("fosid")];
        let api = obj(json!({"entry": [{"id": 10}, {"id": 9}, {"id": 100}]}));

        let natural = flatten_object(
            TOP,
            &api,
            None,
            FlattenOptions {
                sort: SubtableSort::Natural,
            },
            "",
        )
        .unwrap();
        assert_eq!(
            natural["entry"],
            json!([{"fosid": 9}, {"fosid": 10}, {"fosid": 100}])
        );

        let alpha = flatten_object(
            TOP,
            &api,
            None,
            FlattenOptions {
                sort: SubtableSort::Alphabetical,
            },
            "",
        )
        .unwrap();
        assert_eq!(
            alpha["entry"],
            json!([{"fosid": 10}, {"fosid": 100}, {"fosid": 9}])
        );
    }

    #[test]
    fn object_where_scalar_expected_is_an_error() {
        let err = flatten_object(
            DEF,
            &obj(json!({"map": [{"name": {"bad": true}}]})),
            None,
            FlattenOptions::default(),
            "",
        )
        .unwrap_err();
        match err {
            CoreError::Flatten { path, .. } => assert_eq!(path, "map.0.name"),
            other => panic!("expected Flatten error, got {other:?}"),
        }
    }

    #[test]
    fn sort_mode_parses_from_attribute() {
        assert_eq!("natural".parse::<SubtableSort>().unwrap(), SubtableSort::Natural);
        assert_eq!("false".parse::<SubtableSort>().unwrap(), SubtableSort::False);
    }
}

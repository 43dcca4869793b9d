// State → API conversion.
//
// Walks the schema rather than the input, so attributes that are not
// part of the schema (`device_name`, `dynamic_sort_subtable`, ...) are
// never sent. Absent and null attributes are skipped.

use serde_json::{Map, Number, Value};

use crate::error::CoreError;
use crate::schema::{Field, FieldKind};

/// Expand a state attribute map into a FortiManager object.
pub fn expand_object(
    fields: &'static [Field],
    attrs: &Map<String, Value>,
    prefix: &str,
) -> Result<Map<String, Value>, CoreError> {
    let mut out = Map::new();
    for field in fields {
        let Some(value) = attrs.get(field.name) else {
            continue;
        };
        let path = format!("{prefix}{}", field.name);
        if let Some(expanded) = expand_value(field, value, &path)? {
            out.insert(field.api_name().into_owned(), expanded);
        }
    }
    Ok(out)
}

/// Expand one state value. `Ok(None)` means "leave the field out".
pub fn expand_value(field: &Field, value: &Value, path: &str) -> Result<Option<Value>, CoreError> {
    if value.is_null() {
        return Ok(None);
    }

    let expanded = match field.kind {
        FieldKind::String => Value::String(scalar_to_string(value, path)?),
        FieldKind::Integer => Value::Number(to_integer(value, path)?),
        FieldKind::StringSet => {
            let mut items = match value {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| scalar_to_string(item, &format!("{path}.{i}")))
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![scalar_to_string(other, path)?],
            };
            items.sort();
            items.dedup();
            Value::Array(items.into_iter().map(Value::String).collect())
        }
        FieldKind::IpMask => {
            let parts: Vec<Value> = match value {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| scalar_to_string(item, &format!("{path}.{i}")))
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .map(Value::String)
                    .collect(),
                other => scalar_to_string(other, path)?
                    .split_whitespace()
                    .map(|part| Value::String(part.to_owned()))
                    .collect(),
            };
            Value::Array(parts)
        }
        FieldKind::Block(spec) => {
            let Value::Array(rows) = value else {
                return Err(expand_error(path, "expected a list of objects"));
            };
            let mut out = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let Value::Object(row) = row else {
                    return Err(expand_error(&format!("{path}.{i}"), "expected an object"));
                };
                out.push(Value::Object(expand_object(
                    spec.fields,
                    row,
                    &format!("{path}.{i}."),
                )?));
            }
            Value::Array(out)
        }
    };
    Ok(Some(expanded))
}

fn scalar_to_string(value: &Value, path: &str) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "enable" } else { "disable" }.to_owned()),
        _ => Err(expand_error(path, "expected a string")),
    }
}

fn to_integer(value: &Value, path: &str) -> Result<Number, CoreError> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.clone()),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Number::from)
            .map_err(|_| expand_error(path, &format!("'{s}' is not an integer"))),
        _ => Err(expand_error(path, "expected an integer")),
    }
}

fn expand_error(path: &str, reason: &str) -> CoreError {
    CoreError::Expand {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

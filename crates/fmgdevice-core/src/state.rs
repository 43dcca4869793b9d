// ── Resource state document ──
//
// The state side of every conversion: an optional resource ID plus a
// map of `snake_case` attributes. Serialized as
// `{"id": "...", "attributes": {...}}` for state files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::convert::SubtableSort;
use crate::error::CoreError;

/// Attribute selecting the managed device.
pub const DEVICE_NAME: &str = "device_name";
/// Attribute selecting the VDOM.
pub const DEVICE_VDOM: &str = "device_vdom";
/// Attribute selecting sub-table ordering on read.
pub const DYNAMIC_SORT_SUBTABLE: &str = "dynamic_sort_subtable";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Parse either a full state document or a bare attribute object.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        let Value::Object(map) = value else {
            return Err(CoreError::Validation {
                field: "state".into(),
                reason: "expected a JSON object".into(),
            });
        };
        let is_document = map.contains_key("attributes")
            && map.keys().all(|k| k == "id" || k == "attributes");
        if is_document {
            serde_json::from_value(Value::Object(map)).map_err(|e| CoreError::Validation {
                field: "state".into(),
                reason: e.to_string(),
            })
        } else {
            Ok(Self::new(map))
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone; attributes are kept for inspection.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// String view of a scalar attribute; numbers are rendered.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Replace schema attributes with freshly flattened ones, keeping the
    /// meta attributes (device, vdom, sort mode, parent keys) untouched.
    pub fn merge_flattened(&mut self, schema_names: &[&str], flattened: Map<String, Value>) {
        self.attributes
            .retain(|k, _| !schema_names.contains(&k.as_str()));
        self.attributes.extend(flattened);
    }

    pub fn subtable_sort(&self) -> Result<SubtableSort, CoreError> {
        let invalid = |got: &dyn std::fmt::Display| CoreError::Validation {
            field: DYNAMIC_SORT_SUBTABLE.into(),
            reason: format!("expected 'false', 'true', 'natural' or 'alphabetical', got {got}"),
        };
        match self.get(DYNAMIC_SORT_SUBTABLE) {
            None => Ok(SubtableSort::default()),
            Some(Value::String(raw)) if raw.is_empty() => Ok(SubtableSort::default()),
            Some(Value::Bool(true)) => Ok(SubtableSort::True),
            Some(Value::Bool(false)) => Ok(SubtableSort::False),
            Some(Value::String(raw)) => raw.parse().map_err(|_| invalid(&format!("'{raw}'"))),
            Some(other) => Err(invalid(other)),
        }
    }
}

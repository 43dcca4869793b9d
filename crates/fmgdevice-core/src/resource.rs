// ── Resource definitions ──
//
// A `ResourceDef` is everything that differs between two resource types:
// the URL template, how objects are keyed, which parent keys address a
// sub-table, and the field table. CRUD dispatch and conversions are
// shared and live in `provider` and `convert`.

use serde::Serialize;

use crate::error::CoreError;
use crate::paradict::{ParamDict, escape_segment};
use crate::schema::{self, Field};
use crate::state::ResourceData;

/// How objects of a resource type are identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "lowercase")]
pub enum KeySpec {
    /// One object per device/vdom; the resource ID is the type label.
    Singleton,
    /// Table row keyed by the named state field.
    Field(&'static str),
}

/// A parent-table key needed to address a sub-table resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentKey {
    /// State attribute holding the parent key.
    pub attr: &'static str,
    /// Placeholder in the URL template.
    pub placeholder: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResourceDef {
    /// Resource type name, e.g. `fmgdevice_router_bfd`.
    pub type_name: &'static str,
    /// CamelCase label used in error contexts and singleton IDs.
    pub label: &'static str,
    /// URL template of the table (or of the singleton object).
    pub path: &'static str,
    pub key: KeySpec,
    pub parents: &'static [ParentKey],
    #[serde(skip)]
    pub fields: &'static [Field],
}

impl ResourceDef {
    pub fn is_singleton(&self) -> bool {
        matches!(self.key, KeySpec::Singleton)
    }

    /// Schema field holding the row key, for table resources.
    pub fn key_field(&self) -> Option<&'static Field> {
        match self.key {
            KeySpec::Singleton => None,
            KeySpec::Field(name) => schema::find(self.fields, name),
        }
    }

    pub fn schema_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Table (or singleton object) URL.
    pub fn collection_path(&self, params: &ParamDict) -> Result<String, CoreError> {
        params.render(self.path, self.label)
    }

    /// URL of one row.
    pub fn member_path(&self, params: &ParamDict, key: &str) -> Result<String, CoreError> {
        let base = self.collection_path(params)?;
        Ok(format!("{base}/{}", escape_segment(key)))
    }

    /// Row key from state: the key attribute, falling back to the ID.
    pub fn key_value(&self, data: &ResourceData) -> Option<String> {
        match self.key {
            KeySpec::Singleton => None,
            KeySpec::Field(name) => data
                .get_str(name)
                .or_else(|| data.id().map(str::to_owned)),
        }
    }

    /// URL addressing the object this state describes.
    pub fn object_path(&self, params: &ParamDict, data: &ResourceData) -> Result<String, CoreError> {
        if self.is_singleton() {
            return self.collection_path(params);
        }
        let key = self
            .key_value(data)
            .ok_or_else(|| CoreError::MissingParameter {
                name: self.key_name().to_owned(),
                resource: self.label.to_owned(),
            })?;
        self.member_path(params, &key)
    }

    fn key_name(&self) -> &'static str {
        match self.key {
            KeySpec::Singleton => "",
            KeySpec::Field(name) => name,
        }
    }

    /// Static context string for CRUD errors, e.g. `error creating RouterBfd resource`.
    pub fn context(&self, verb: &str) -> String {
        format!("error {verb} {} resource", self.label)
    }
}

// ── Declarative resource schemas ──
//
// A schema is a static table of `Field`s. Nested sub-tables point at
// their own static tables, so a whole resource tree is built at compile
// time with the `const fn` builders below and walked generically by the
// expand/flatten conversions.

use std::borrow::Cow;
use std::fmt;

use crate::convert::naming::to_api_key;

/// Shape of a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar string. Enumerations (`enable`/`disable`) are strings too.
    String,
    /// Scalar integer.
    Integer,
    /// Unordered set of strings, sent as a plain array.
    StringSet,
    /// Address and netmask. `"10.1.0.0 255.255.0.0"` in state, a
    /// two-element list on the wire.
    IpMask,
    /// Ordered list of nested objects.
    Block(BlockSpec),
}

/// Nested sub-table description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    pub fields: &'static [Field],
    /// State name of the field that identifies a row, used for sorting.
    pub key: Option<&'static str>,
}

/// One schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name in state (`snake_case`).
    pub name: &'static str,
    /// Name on the wire when it is not the hyphenated state name.
    api_name: Option<&'static str>,
    pub kind: FieldKind,
    /// Never read back from FortiManager (masked on the wire).
    pub sensitive: bool,
    /// Assigned by FortiManager when absent from state.
    pub computed: bool,
}

impl Field {
    const fn with_kind(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            api_name: None,
            kind,
            sensitive: false,
            computed: false,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Integer)
    }

    pub const fn string_set(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::StringSet)
    }

    pub const fn ipmask(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::IpMask)
    }

    pub const fn block(name: &'static str, fields: &'static [Field]) -> Self {
        Self::with_kind(name, FieldKind::Block(BlockSpec { fields, key: None }))
    }

    /// The `id` attribute is reserved in state, so FortiManager's `id`
    /// is exposed as `fosid`.
    pub const fn fosid() -> Self {
        Self::integer("fosid").api("id").computed()
    }

    pub const fn api(mut self, api_name: &'static str) -> Self {
        self.api_name = Some(api_name);
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Name the row key of a block. No effect on scalar fields.
    pub const fn keyed(mut self, key: &'static str) -> Self {
        if let FieldKind::Block(spec) = self.kind {
            self.kind = FieldKind::Block(BlockSpec {
                fields: spec.fields,
                key: Some(key),
            });
        }
        self
    }

    /// Wire name of this field.
    pub fn api_name(&self) -> Cow<'static, str> {
        match self.api_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(to_api_key(self.name)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::StringSet => f.write_str("set(string)"),
            Self::IpMask => f.write_str("ipmask"),
            Self::Block(_) => f.write_str("list(object)"),
        }
    }
}

/// Look up a field by its state name.
pub fn find(fields: &'static [Field], name: &str) -> Option<&'static Field> {
    fields.iter().find(|f| f.name == name)
}

/// A field together with its dotted state path, for schema listings.
#[derive(Debug, Clone)]
pub struct FieldPath {
    pub path: String,
    pub api_path: String,
    pub field: &'static Field,
}

/// Walk a schema depth first, yielding every field with its path.
pub fn walk(fields: &'static [Field]) -> Vec<FieldPath> {
    let mut out = Vec::new();
    walk_into(fields, "", "", &mut out);
    out
}

fn walk_into(fields: &'static [Field], prefix: &str, api_prefix: &str, out: &mut Vec<FieldPath>) {
    for field in fields {
        let path = format!("{prefix}{}", field.name);
        let api_path = format!("{api_prefix}{}", field.api_name());
        if let FieldKind::Block(spec) = field.kind {
            out.push(FieldPath {
                path: path.clone(),
                api_path: api_path.clone(),
                field,
            });
            walk_into(
                spec.fields,
                &format!("{path}."),
                &format!("{api_path}."),
                out,
            );
        } else {
            out.push(FieldPath {
                path,
                api_path,
                field,
            });
        }
    }
}

//! Conversions between state attributes and FortiManager objects.
//!
//! [`expand`] turns `snake_case` state into hyphen-keyed API objects,
//! [`flatten`] does the reverse. Both are driven by the resource schema.

pub mod expand;
pub mod flatten;
pub mod naming;

pub use expand::{expand_object, expand_value};
pub use flatten::{FlattenOptions, SubtableSort, flatten_object, flatten_value};
pub use naming::{to_api_key, to_state_key};

//! Offline expand / flatten handlers.
//!
//! These run the same conversions the provider uses on the wire, without
//! a FortiManager connection. Useful for checking a state file before an
//! apply, or a captured API object before an import.

use serde_json::{Map, Value};

use fmgdevice_core::convert::{expand_object, flatten_object};
use fmgdevice_core::{FlattenOptions, ResourceData, SubtableSort};

use crate::cli::{ExpandArgs, FlattenArgs, GlobalOpts, SortMode};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<SortMode> for SubtableSort {
    fn from(mode: SortMode) -> Self {
        match mode {
            SortMode::False => Self::False,
            SortMode::True => Self::True,
            SortMode::Natural => Self::Natural,
            SortMode::Alphabetical => Self::Alphabetical,
        }
    }
}

pub fn expand(args: &ExpandArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    let data = util::read_state(&args.from_file)?;
    let object = expand_object(def.fields, data.attributes(), "")?;

    let out = output::render_single(
        &global.output,
        &object,
        |o| output::render_json(o, false),
        |o| output::render_json(o, true),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn flatten(args: &FlattenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    let object = api_object(util::read_json_file(&args.from_file)?)?;

    let mut state = match args.prior {
        Some(ref path) => util::read_state(path)?,
        None => ResourceData::default(),
    };
    let sort = match args.sort {
        Some(mode) => mode.into(),
        None => state.subtable_sort()?,
    };

    let flattened = flatten_object(
        def.fields,
        &object,
        Some(state.attributes()),
        FlattenOptions { sort },
        "",
    )?;
    state.merge_flattened(&def.schema_names(), flattened);

    let out = output::render_single(&global.output, &state, util::state_detail, |d| {
        d.id().unwrap_or_default().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// FortiManager wraps single objects in a one-element list; accept both.
fn api_object(value: Value) -> Result<Map<String, Value>, CliError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(mut rows) if rows.len() == 1 => api_object(rows.remove(0)),
        _ => Err(CliError::Validation {
            field: "from_file".into(),
            reason: "expected a FortiManager object".into(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_row_list_is_unwrapped() {
        let map = api_object(json!([{"name": "voice"}])).unwrap();
        assert_eq!(map["name"], json!("voice"));
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(api_object(json!("voice")).is_err());
        assert!(api_object(json!([{}, {}])).is_err());
    }
}

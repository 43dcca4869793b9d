//! Resource catalogue handlers (offline).

use serde::Serialize;
use tabled::Tabled;

use fmgdevice_core::resources;
use fmgdevice_core::schema::{self, FieldKind};
use fmgdevice_core::{KeySpec, ResourceDef};

use crate::cli::{GlobalOpts, ResourcesArgs, ResourcesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    name: &'static str,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Path")]
    path: &'static str,
}

impl From<&ResourceDef> for ResourceRow {
    fn from(def: &ResourceDef) -> Self {
        Self {
            name: def.type_name,
            kind: if def.is_singleton() { "singleton" } else { "table" },
            key: match def.key {
                KeySpec::Singleton => "-".into(),
                KeySpec::Field(name) => name.into(),
            },
            path: def.path,
        }
    }
}

#[derive(Clone, Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "API")]
    api: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

fn field_rows(def: &ResourceDef) -> Vec<FieldRow> {
    let key = def.key_field().map(|f| f.name);
    schema::walk(def.fields)
        .into_iter()
        .map(|fp| {
            let mut flags = Vec::new();
            if key == Some(fp.path.as_str()) {
                flags.push("key");
            }
            if fp.field.sensitive {
                flags.push("sensitive");
            }
            if fp.field.computed {
                flags.push("computed");
            }
            if matches!(fp.field.kind, FieldKind::Block(spec) if spec.key.is_some()) {
                flags.push("keyed");
            }
            FieldRow {
                field: fp.path,
                api: fp.api_path,
                kind: fp.field.kind.to_string(),
                flags: flags.join(","),
            }
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ResourcesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.command {
        ResourcesCommand::List => {
            let out = output::render_list(
                &global.output,
                resources::all(),
                |d| ResourceRow::from(*d),
                |d| d.type_name.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
        ResourcesCommand::Schema { resource } => {
            let def = util::lookup(resource)?;
            let rows = field_rows(def);
            let out =
                output::render_list(&global.output, &rows, FieldRow::clone, |r| r.field.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

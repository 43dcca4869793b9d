//! Read / apply / import / delete handlers.
//!
//! Each handler opens one provider session, runs a single CRUD call and
//! renders (or writes back) the resulting state document.

use fmgdevice_core::{Provider, ProviderConfig, ResourceData, ResourceDef};

use crate::cli::{GlobalOpts, ImportArgs, StateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Clone, Copy)]
enum Op {
    Read,
    Create,
    Update,
    Delete,
}

impl Op {
    fn progress(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Create => "Creating",
            Self::Update => "Updating",
            Self::Delete => "Deleting",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
        }
    }
}

async fn run_op(
    op: Op,
    def: &'static ResourceDef,
    mut data: ResourceData,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<ResourceData, CliError> {
    let pb = output::spinner(global, &format!("{} {}", op.progress(), def.label));
    let result = Provider::oneshot(config, |provider| async move {
        match op {
            Op::Read => provider.read(def, &mut data).await?,
            Op::Create => provider.create(def, &mut data).await?,
            Op::Update => provider.update(def, &mut data).await?,
            Op::Delete => provider.delete(def, &mut data).await?,
        }
        Ok(data)
    })
    .await;
    pb.finish_and_clear();
    Ok(result?)
}

/// Render the state, or write it back to the input file with `--write`.
fn emit(args: &StateArgs, data: &ResourceData, global: &GlobalOpts) -> Result<(), CliError> {
    if args.write {
        util::write_state(&args.from_file, data)?;
        output::success(global, &format!("State written to {}", args.from_file.display()));
        return Ok(());
    }
    let out = output::render_single(&global.output, data, util::state_detail, |d| {
        d.id().unwrap_or_default().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn read(
    args: &StateArgs,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    let data = util::read_state(&args.from_file)?;
    let data = run_op(Op::Read, def, data, config, global).await?;
    if data.id().is_none() {
        tracing::warn!(resource = def.type_name, "object no longer exists, ID cleared");
    }
    emit(args, &data, global)
}

pub async fn apply(
    args: &StateArgs,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    let data = util::read_state(&args.from_file)?;
    let op = if data.id().is_some() { Op::Update } else { Op::Create };
    let data = run_op(op, def, data, config, global).await?;
    output::success(
        global,
        &format!("{} {} {}", op.done(), def.label, data.id().unwrap_or("(unknown)")),
    );
    emit(args, &data, global)
}

pub async fn import(
    args: &ImportArgs,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    if !def.is_singleton() && args.key.is_empty() {
        return Err(CliError::Validation {
            field: "key".into(),
            reason: format!("{} is keyed by row; pass the object key", def.type_name),
        });
    }
    let overrides = util::parse_assignments(&args.set)?;

    let pb = output::spinner(global, &format!("Importing {}", def.label));
    let key = args.key.clone();
    let result = Provider::oneshot(config, |provider| async move {
        provider.import(def, &key, overrides).await
    })
    .await;
    pb.finish_and_clear();
    let data = result?;

    if let Some(ref path) = args.to_file {
        util::write_state(path, &data)?;
        output::success(global, &format!("Imported {} into {}", def.label, path.display()));
        return Ok(());
    }
    let out = output::render_single(&global.output, &data, util::state_detail, |d| {
        d.id().unwrap_or_default().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn delete(
    args: &StateArgs,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let def = util::lookup(&args.resource)?;
    let data = util::read_state(&args.from_file)?;
    let target = data.id().unwrap_or(def.label).to_owned();
    util::confirm(&format!("Delete {} {target}?", def.label), global.yes)?;

    let data = run_op(Op::Delete, def, data, config, global).await?;
    output::success(global, &format!("{} {} {target}", Op::Delete.done(), def.label));
    if args.write {
        util::write_state(&args.from_file, &data)?;
    }
    Ok(())
}

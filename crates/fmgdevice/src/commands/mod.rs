//! Command dispatch: bridges CLI args -> provider calls -> output formatting.

pub mod config_cmd;
pub mod convert;
pub mod crud;
pub mod resources;
pub mod status;
pub mod util;

use fmgdevice_core::ProviderConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a connection-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    config: ProviderConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Read(args) => crud::read(&args, config, global).await,
        Command::Apply(args) => crud::apply(&args, config, global).await,
        Command::Import(args) => crud::import(&args, config, global).await,
        Command::Delete(args) => crud::delete(&args, config, global).await,
        Command::Status => status::handle(config, global).await,
        other => Err(CliError::Internal(format!(
            "{other:?} does not need a connection"
        ))),
    }
}

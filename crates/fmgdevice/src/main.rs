mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        // Offline commands: no FortiManager connection
        Command::Config(args) => commands::config_cmd::handle(args, global),
        Command::Resources(args) => commands::resources::handle(&args, global),
        Command::Expand(args) => commands::convert::expand(&args, global),
        Command::Flatten(args) => commands::convert::flatten(&args, global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fmgdevice", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let provider_config = config::build_provider_config(global)?;
            tracing::debug!(command = ?cmd, url = %provider_config.url, "dispatching command");
            commands::dispatch(cmd, provider_config, global).await
        }
    }
}

mod api;
mod commands;
mod config;
mod error;
mod filename;
mod telemetry;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use commands::download::DownloadArgs;
use commands::upload::UploadArgs;

/// Download and upload template html content to Sendinblue.
///
/// Files are named `<numeric-template-id>. <template name (escaped)>.html`,
/// e.g. `007. Sample template title.html`.
#[derive(Debug, Parser)]
#[command(name = "template-sync", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download the first 1000 templates into DIRECTORY
    Download(DownloadArgs),
    /// Update every matching template's html content from DIRECTORY
    Upload(UploadArgs),
}

impl Commands {
    const NAMES: [&'static str; 2] = ["download", "upload"];

    const fn name(&self) -> &'static str {
        match self {
            Self::Download(_) => "download",
            Self::Upload(_) => "upload",
        }
    }
}

/// Parse failures that mean no operation was selected.
fn shows_usage(e: &clap::Error) -> bool {
    match e.kind() {
        ErrorKind::InvalidSubcommand
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => true,
        // `--foo` in first position; flags after an operation stay errors.
        ErrorKind::UnknownArgument => !std::env::args_os()
            .nth(1)
            .is_some_and(|arg| arg.to_str().is_some_and(|a| Commands::NAMES.contains(&a))),
        _ => false,
    }
}

fn main() -> ExitCode {
    let _telemetry = telemetry::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Unknown or missing operation: show usage, take no action.
        Err(e) if shows_usage(&e) => {
            tracing::debug!(kind = ?e.kind(), "no operation selected");
            let _ = Cli::command().print_long_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => e.exit(),
    };

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Download(args) => args.execute(),
        Commands::Upload(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit_err) = e.downcast_ref::<error::ExitError>() {
                eprintln!("error: {exit_err}");
                exit_err.exit_code()
            } else {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}

use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{extract, inspect, load};

#[derive(Parser, Debug)]
#[command(
    name = "pdbcontacts",
    about = "A command-line tool that mines solved protein structures for residue contacts and maps them onto genome transcripts.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log detail (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only report warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contacts from every structure file under a directory.
    Extract(extract::ExtractArgs),
    /// Report header metadata and chains of one structure file.
    Inspect(inspect::InspectArgs),
    /// Attach an interactions file to a transcript table and report what resolved.
    Load(load::LoadArgs),
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Command::Extract(args) => extract::run(&args)?,
        Command::Inspect(args) => inspect::run(&args)?,
        Command::Load(args) => load::run(&args)?,
    }

    Ok(())
}

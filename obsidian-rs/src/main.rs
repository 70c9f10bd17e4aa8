//! obsidian CLI entry point.

use clap::Parser;
use obsidian::cli::args::{Cli, Commands};
use obsidian::cli::create::{self, Day};
use obsidian::cli::output::Output;
use obsidian::cli::{links, rename, resolve, sync, templates, workspace};
use obsidian::client::{Client, ClientBuilder};
use obsidian::config::Config;
use obsidian::error::{Error, ExitCode as VaultExitCode};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Log to stderr, filtered by `OBSIDIAN_LOG` (default `warn`) or `-v`/`-vv`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("OBSIDIAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_client(cli: &Cli) -> Result<Client, Error> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut builder = ClientBuilder::new(config);
    if let Some(ref dir) = cli.vault {
        builder = builder.dir(dir);
    }
    if let Some(ref name) = cli.workspace {
        builder = builder.workspace(name);
    }
    builder.build()
}

fn run(cli: &Cli) -> Result<VaultExitCode, Error> {
    let client = build_client(cli)?;
    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Workspace => workspace::run(&client, &output)?,
        Commands::Sync(args) => sync::run(&client, args, &output)?,
        Commands::New(args) => create::new_note(&client, args, &output)?,
        Commands::Today => create::daily(&client, Day::Today, &output)?,
        Commands::Yesterday => create::daily(&client, Day::Yesterday, &output)?,
        Commands::Tomorrow => create::daily(&client, Day::Tomorrow, &output)?,
        Commands::Resolve(args) => resolve::run(&client, args, &output)?,
        Commands::Links(args) => links::links(&client, args, &output)?,
        Commands::Backlinks(args) => links::backlinks(&client, args, &output)?,
        Commands::Check => return links::check(&client, &output),
        Commands::Templates => templates::list(&client, &output)?,
        Commands::Template(args) => templates::render(&client, args, &output)?,
        Commands::Rename(args) => rename::run(&client, args, &output)?,
    }
    Ok(VaultExitCode::Success)
}

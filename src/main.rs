use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsString;

mod activities;
mod args;
mod config;
mod env;
mod http;
mod session;
mod ui;
mod utils;

use crate::args::CLIArgs;

#[derive(Debug, Parser)]
#[command(name = "egcli", about = "eGain activity search CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search activities and display them as a table
    Search(CLIArgs<activities::SearchArgs>),
    /// Search activities and export them to a spreadsheet
    Export(CLIArgs<activities::ExportArgs>),
    /// Store the eGain session token
    Login(session::LoginArgs),
    /// Manage persisted configuration
    Config(CLIArgs<config::ConfigArgs>),
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    env::bootstrap_from_args(&argv)?;
    let cli = Cli::parse_from(argv);

    match cli.command {
        Commands::Search(cmd) => activities::run_search(cmd.base, cmd.args).await?,
        Commands::Export(cmd) => activities::run_export(cmd.base, cmd.args).await?,
        Commands::Login(args) => session::run(args)?,
        Commands::Config(cmd) => config::run(cmd.base, cmd.args)?,
    }

    Ok(())
}

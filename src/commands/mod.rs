//! Command-line interface.
//!
//! `drift host` is what the browser launches; every other command is for the
//! user at a terminal.

pub mod config;
pub mod host;
pub mod init;
pub mod sounds;
pub mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the native messaging host (started by the browser)")]
    Host(host::HostArgs),
    #[command(about = "Configure nudge delays and sounds")]
    Init(init::InitArgs),
    #[command(about = "Show or edit the current configuration")]
    Config(config::ConfigArgs),
    #[command(about = "List the available nudge sounds")]
    Sounds,
    #[command(about = "Show the tab currently being monitored")]
    Status,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Host(args) => host::cmd(args).await,
            Commands::Init(args) => init::cmd(args).await,
            Commands::Config(args) => config::cmd(args).await,
            Commands::Sounds => sounds::cmd(),
            Commands::Status => status::cmd().await,
        }
    }
}

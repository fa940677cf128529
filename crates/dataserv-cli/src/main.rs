//! dataserv CLI
//!
//! Command-line interface for the farmer registry and contract generator

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dataserv_core::logging_facility;
use dataserv_core::{ExError, Result};
use dataserv_core_types::RequestContext;

mod commands;
mod config;

use commands::farmer::FarmerOp;
use config::Config;

#[derive(Debug, Parser)]
#[command(name = "dataserv")]
#[command(about = "dataserv - Proof-of-storage farmer registry", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./dataserv.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding the configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new farmer
    Register(commands::farmer::AddressArgs),
    /// Show a registered farmer
    Lookup(commands::farmer::AddressArgs),
    /// Record a liveness ping
    Ping(commands::farmer::AddressArgs),
    /// Record a completed audit
    Audit(commands::farmer::AddressArgs),
    /// Issue a storage contract to a registered farmer
    Contract(commands::contract::ContractArgs),
    /// List farmers seen within the online window
    Online(commands::online::OnlineArgs),
    /// Recompute a contract digest from its seed and size
    VerifyContract(commands::contract::VerifyArgs),
}

impl Commands {
    /// Subcommand name as typed on the command line
    fn name(&self) -> &'static str {
        match self {
            Commands::Register(_) => "register",
            Commands::Lookup(_) => "lookup",
            Commands::Ping(_) => "ping",
            Commands::Audit(_) => "audit",
            Commands::Contract(_) => "contract",
            Commands::Online(_) => "online",
            Commands::VerifyContract(_) => "verify-contract",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let ctx = RequestContext::new().with_origin(cli.command.name());

    if let Err(e) = run(cli, &ctx) {
        let err = ExError::from(e).with_request_id(ctx.request_id);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, ctx: &RequestContext) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    logging_facility::init(config.profile()?);
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        origin = ctx.origin.as_deref().unwrap_or_default()
    );
    let _guard = span.enter();

    match cli.command {
        Commands::Register(args) => commands::farmer::execute(FarmerOp::Register, args, &config),
        Commands::Lookup(args) => commands::farmer::execute(FarmerOp::Lookup, args, &config),
        Commands::Ping(args) => commands::farmer::execute(FarmerOp::Ping, args, &config),
        Commands::Audit(args) => commands::farmer::execute(FarmerOp::Audit, args, &config),
        Commands::Contract(args) => commands::contract::execute(args, &config),
        Commands::Online(args) => commands::online::execute(args, &config),
        Commands::VerifyContract(args) => commands::contract::execute_verify(args),
    }
}

//! Online farmers listing
//!
//! Usage: dataserv online [--minutes N] [--json]

use clap::Args;
use dataserv_core::ports::Clock;
use dataserv_core::status::FarmerStatus;
use dataserv_core::{DataservError, Result};

use crate::commands::{open_registry, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct OnlineArgs {
    /// Override the configured online window
    #[arg(long, allow_hyphen_values = true)]
    pub minutes: Option<i64>,

    /// Emit JSON instead of one line per farmer
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: OnlineArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    let window = match args.minutes {
        Some(minutes) => window_from_flag(minutes)?,
        None => config.online_window()?,
    };

    let farmers = registry.online(window)?;
    let now = registry.clock().now();
    let statuses: Vec<FarmerStatus> = farmers
        .iter()
        .map(|farmer| FarmerStatus::at(farmer, now))
        .collect();

    if args.json {
        return print_json(&statuses);
    }

    if statuses.is_empty() {
        println!("No farmers online");
    }
    for status in &statuses {
        println!("{}", status.summary_line());
    }
    Ok(())
}

fn window_from_flag(minutes: i64) -> Result<chrono::Duration> {
    chrono::Duration::try_minutes(minutes).ok_or_else(|| DataservError::InvalidInput {
        reason: format!("--minutes {} is out of range", minutes),
    })
}

//! Command implementations
//!
//! Each subcommand lives in its own module; [`run`] dispatches to them.

pub mod extract;
pub mod features;
pub mod seed;
pub mod shared;

use crate::cli::args::Commands;
use anyhow::Result;

/// Run the selected subcommand to completion
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Extract(args) => extract::run_extract(args).await.map(|_| ()),
        Commands::Seed(args) => seed::run_seed(args).map(|_| ()),
        Commands::Features(args) => features::run_features(args).map(|_| ()),
    }
}

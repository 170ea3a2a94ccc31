//! Shared components for CLI commands

use crate::cli::args::{LoggingArgs, OutputFormat};
use crate::models::ProcessingStats;
use anyhow::{Context, Result};
use colored::*;
use tracing::debug;

/// Set up structured logging on stderr.
///
/// `RUST_LOG` wins over the command-line level. A second call in the same
/// process keeps the first subscriber.
pub fn setup_logging(args: &LoggingArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("column_features={}", log_level)));

    let installed = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match installed {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing logger: {}", e),
    }
    Ok(())
}

/// Print run statistics in the requested format
pub fn report_stats(stats: &ProcessingStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(stats).context("Failed to serialize statistics")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "\n{} {}",
                "Master table written to".bright_green(),
                stats.output_path.display().to_string().bright_white().bold()
            );
            println!(
                "  {} {:.1}%",
                "Success rate:".bright_cyan(),
                stats.success_rate()
            );
        }
    }
    Ok(())
}

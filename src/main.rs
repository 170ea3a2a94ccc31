use clap::Parser;
use column_features::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // The master table is only written at the end of a run, so an
        // interrupted run leaves it untouched.
        tokio::select! {
            result = commands::run(command) => result,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, stopping without writing the master table...");
                    Err(anyhow::anyhow!("Processing interrupted by user"))
                }
                Err(e) => Err(anyhow::anyhow!("Failed to install CTRL+C handler: {}", e)),
            },
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("column_features - per-column feature extraction");
    println!("===============================================");
    println!();
    println!("Compute engineered per-column features for delimited datasets and");
    println!("store them in a master feature table for classifier training.");
    println!();
    println!("USAGE:");
    println!("    column_features <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    extract     Compute features for every dataset in the master table");
    println!("    seed        Build a master table from a datasets directory");
    println!("    features    Print the features of a single dataset file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Create features.csv from datasets/<domain>/<file>.csv:");
    println!("    column_features seed --datasets datasets --output features.csv");
    println!();
    println!("    # Fill in the feature columns:");
    println!("    column_features extract --master features.csv");
    println!();
    println!("    # Inspect one file as JSON:");
    println!("    column_features features datasets/shop/orders.csv --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    column_features <COMMAND> --help");
}

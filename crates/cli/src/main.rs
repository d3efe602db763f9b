use clap::{Parser, Subcommand};

mod commands;

use commands::{EvaluateArgs, ProfitArgs, WeightArgs};

#[derive(Parser)]
#[command(name = "arb-research")]
#[command(about = "Profit and shipping-weight screening for eBay/Japan arbitrage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single candidate and print the profit record
    Profit(ProfitArgs),
    /// Estimate parcel weight and dimensions
    Weight(WeightArgs),
    /// Screen a CSV of candidates and write the candidate sheet
    Evaluate(EvaluateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Profit(args) => commands::run_profit(args)?,
        Commands::Weight(args) => commands::run_weight(args)?,
        Commands::Evaluate(args) => commands::run_evaluate(args)?,
    }

    Ok(())
}

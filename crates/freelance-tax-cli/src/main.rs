mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::fiscal::{FinancialYearArgs, QuarterArgs};
use commands::gst::GstArgs;
use commands::income_tax::{AdvanceTaxArgs, TaxArgs};
use commands::ledger::SummaryArgs;

/// Freelancer income tax, advance tax and GST calculations
#[derive(Parser)]
#[command(
    name = "ftx",
    version,
    about = "Freelancer income tax, advance tax and GST calculations",
    long_about = "A CLI for Indian freelancer tax calculations with decimal precision. \
                  Compares Section 44ADA presumptive taxation against regular computation, \
                  builds the advance-tax schedule, computes GST and summarises a \
                  transaction ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Tax-law configuration file (JSON or YAML) overriding the built-in table
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare Section 44ADA and regular income tax
    Tax(TaxArgs),
    /// Build the quarterly advance-tax schedule for an annual tax figure
    AdvanceTax(AdvanceTaxArgs),
    /// Calculate GST on an invoice amount
    Gst(GstArgs),
    /// Resolve the Indian financial year for a date
    FinancialYear(FinancialYearArgs),
    /// Resolve the fiscal quarter (Q1 = April-June) for a date
    Quarter(QuarterArgs),
    /// Summarise a transaction ledger with tax, GST and advice
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

impl Commands {
    /// Whether the command reads the tax-law configuration.
    fn uses_config(&self) -> bool {
        matches!(self, Commands::Tax(_) | Commands::Summary(_))
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::Tax(_) => "tax",
            Commands::AdvanceTax(_) => "advance-tax",
            Commands::Gst(_) => "gst",
            Commands::FinancialYear(_) => "financial-year",
            Commands::Quarter(_) => "quarter",
            Commands::Summary(_) => "summary",
            Commands::Version => "version",
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.config.is_some() && !cli.command.uses_config() {
        tracing::warn!(
            command = cli.command.name(),
            "--config has no effect on this command and is ignored"
        );
    }

    let config_path = cli.config.as_deref().filter(|_| cli.command.uses_config());
    let config = match config_path.map(input::config::load_config).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Tax(args) => commands::income_tax::run_tax(args, config),
        Commands::AdvanceTax(args) => commands::income_tax::run_advance_tax(args),
        Commands::Gst(args) => commands::gst::run_gst(args),
        Commands::FinancialYear(args) => commands::fiscal::run_financial_year(args),
        Commands::Quarter(args) => commands::fiscal::run_quarter(args),
        Commands::Summary(args) => commands::ledger::run_summary(args, config),
        Commands::Version => {
            println!("ftx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

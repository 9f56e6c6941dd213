use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bioplex_discretize::output::HeaderStyle;
use bioplex_discretize::{run_batch, run_pair, BatchConfig, Method, PairConfig, PairOutcome};
use clap::{Parser, Subcommand, ValueEnum};
use log::error;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMethod {
    /// Arithmetic mean of both conditions
    Mean,
    /// Median of both conditions
    Median,
}

impl From<CliMethod> for Method {
    fn from(method: CliMethod) -> Self {
        match method {
            CliMethod::Mean => Method::Mean,
            CliMethod::Median => Method::Median,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliHeaderStyle {
    /// Tab-joined header for treated, comma-joined for untreated
    Mixed,
    /// Tab-joined header for both files
    Tab,
    /// Comma-joined header for both files
    Comma,
}

impl From<CliHeaderStyle> for HeaderStyle {
    fn from(style: CliHeaderStyle) -> Self {
        match style {
            CliHeaderStyle::Mixed => HeaderStyle::Mixed,
            CliHeaderStyle::Tab => HeaderStyle::Tab,
            CliHeaderStyle::Comma => HeaderStyle::Comma,
        }
    }
}

/// Discretize Bioplex measurement pairs into Boolean time series
#[derive(Parser)]
#[command(name = "bioplex-discretize")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discretize one treated/untreated pair
    Pair {
        /// Treated condition CSV
        #[arg(short, long)]
        treated: PathBuf,

        /// Untreated (vehicle) condition CSV
        #[arg(short, long)]
        untreated: PathBuf,

        /// Threshold statistic
        #[arg(short, long, value_enum, default_value = "median")]
        method: CliMethod,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Prefix for output file names
        #[arg(long, default_value = "Dis")]
        prefix: String,

        /// Header delimiter convention of the output files
        #[arg(long, value_enum, default_value = "mixed")]
        header_style: CliHeaderStyle,

        /// Only discretize these species (comma-separated, in output order)
        #[arg(short, long, value_delimiter = ',')]
        species: Option<Vec<String>>,

        /// Drug component fixed to 1 (treated) and 0 (untreated) in properties
        #[arg(long)]
        drug: Option<String>,

        /// Write model-checker property specifications to this JSON file
        #[arg(long)]
        properties: Option<PathBuf>,
    },

    /// Discretize every pair listed in a JSON configuration file
    Batch {
        /// Path to batch configuration JSON
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_outcome(outcome: &PairOutcome) {
    println!(
        "Discretized values of species by {}:",
        outcome.thresholds.method
    );
    for (name, value) in outcome.features.iter().zip(&outcome.thresholds.values) {
        println!("  {name:<12} {value:.4}");
    }
    println!(
        "Saved {} and {}",
        outcome.treated.output.display(),
        outcome.untreated.output.display()
    );
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Pair {
            treated,
            untreated,
            method,
            out_dir,
            prefix,
            header_style,
            species,
            drug,
            properties,
        } => {
            let mut config = PairConfig::new(treated, untreated, method.into());
            config.output_dir = out_dir;
            config.prefix = prefix;
            config.header_style = header_style.into();
            config.species = species;
            config.drug = drug;
            config.properties = properties;

            let outcome = run_pair(&config).with_context(|| {
                format!(
                    "discretizing {} / {}",
                    config.treated.display(),
                    config.untreated.display()
                )
            })?;
            print_outcome(&outcome);
            Ok(true)
        }
        Commands::Batch { config } => {
            let batch = BatchConfig::load(&config)
                .with_context(|| format!("loading batch configuration {}", config.display()))?;
            let mut all_ok = true;
            let results = run_batch(&batch)
                .with_context(|| format!("running batch {}", config.display()))?;
            for (pair, result) in batch.pairs.iter().zip(results) {
                match result {
                    Ok(outcome) => print_outcome(&outcome),
                    Err(e) => {
                        all_ok = false;
                        error!(
                            "{} / {}: {e}",
                            pair.treated.display(),
                            pair.untreated.display()
                        );
                    }
                }
            }
            Ok(all_ok)
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if run(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

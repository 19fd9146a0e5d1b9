//! Command-line pricer
//!
//! Prices one European option by Monte Carlo and prints the comparison with
//! Black-Scholes. Flags override values from `--config`, which override the
//! built-in defaults.

use clap::{Parser, ValueEnum};
use gbm_option_pricer::config::{OptionType, PricerConfig};
use gbm_option_pricer::market_data;
use gbm_option_pricer::output;
use gbm_option_pricer::pipeline::{price_option, price_option_with_paths};
use gbm_option_pricer::PricingResultT;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Monte Carlo options pricing using Geometric Brownian Motion
#[derive(Parser, Debug)]
#[command(name = "price_option", author, version, about, long_about = None)]
struct Cli {
    /// TOML file with [option] and [simulation] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Current stock price
    #[arg(long)]
    spot_price: Option<f64>,

    /// Strike price
    #[arg(long)]
    strike_price: Option<f64>,

    /// Time to expiration in years
    #[arg(long)]
    time_to_expiration: Option<f64>,

    /// Risk-free interest rate as decimal
    #[arg(long, allow_negative_numbers = true)]
    risk_free_rate: Option<f64>,

    /// Annualized volatility as decimal
    #[arg(long)]
    volatility: Option<f64>,

    /// Option type: call or put
    #[arg(long)]
    option_type: Option<OptionType>,

    /// Number of Monte Carlo simulations
    #[arg(short, long)]
    num_simulations: Option<usize>,

    /// Number of time steps per simulated path
    #[arg(long)]
    num_steps: Option<usize>,

    /// Random seed (default 42)
    #[arg(long, conflicts_with = "random")]
    seed: Option<u64>,

    /// Draw a fresh seed from OS entropy
    #[arg(long)]
    random: bool,

    /// Spread paths over all cores
    #[arg(long)]
    parallel: bool,

    /// CSV with a closing-price column; sets spot and volatility from history
    #[arg(long)]
    history_csv: Option<PathBuf>,

    /// Price column to read from --history-csv
    #[arg(long, default_value = "Close")]
    price_column: String,

    /// Write per-path terminal prices and payoffs (simulates full paths)
    #[arg(long)]
    samples_csv: Option<PathBuf>,

    /// Write report fields as key/value CSV
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

fn build_config(cli: &Cli) -> PricingResultT<PricerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PricerConfig::from_file(path)?,
        None => PricerConfig::default(),
    };

    if let Some(path) = &cli.history_csv {
        let prices = market_data::read_price_column(path, &cli.price_column)?;
        let (spot, vol) = market_data::spot_and_volatility(&prices)?;
        info!(spot, volatility = vol, "using spot and volatility from history");
        cfg.option.spot_price = spot;
        cfg.option.volatility = vol;
    }

    let opt = &mut cfg.option;
    if let Some(v) = cli.spot_price {
        opt.spot_price = v;
    }
    if let Some(v) = cli.strike_price {
        opt.strike_price = v;
    }
    if let Some(v) = cli.time_to_expiration {
        opt.time_to_expiration = v;
    }
    if let Some(v) = cli.risk_free_rate {
        opt.risk_free_rate = v;
    }
    if let Some(v) = cli.volatility {
        opt.volatility = v;
    }
    if let Some(v) = cli.option_type {
        opt.option_type = v;
    }

    let sim = &mut cfg.simulation;
    if let Some(v) = cli.num_simulations {
        sim.num_simulations = v;
    }
    if let Some(v) = cli.num_steps {
        sim.num_steps = v;
    }
    if cli.random {
        sim.random_seed = None;
    } else if let Some(seed) = cli.seed {
        sim.random_seed = Some(seed);
    }
    sim.parallel |= cli.parallel;

    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: &Cli) -> PricingResultT<()> {
    let cfg = build_config(cli)?;

    let report = match &cli.samples_csv {
        Some(path) => {
            let run = price_option_with_paths(&cfg.option, &cfg.simulation)?;
            output::write_samples_to_csv(path, &run.paths.terminal_prices(), &run.payoffs)?;
            info!(path = %path.display(), "wrote per-path samples");
            run.report
        }
        None => price_option(&cfg.option, &cfg.simulation)?,
    };

    if let Some(path) = &cli.summary_csv {
        output::write_summary_to_csv(path, &report)?;
        info!(path = %path.display(), "wrote summary");
    }

    match cli.format {
        Format::Text => println!("{}", output::render_summary(&report)),
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! olg CLI - Overlapping-generations equilibrium engine.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{OlgConfig, EXAMPLE_CONFIG};
use olg_core::grid::GridSpec;
use olg_core::short_run::ScanSettings;
use olg_core::{ShortRunMarketModel, SteadyStateModel};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "olg")]
#[command(version)]
#[command(about = "Short-run and steady-state equilibria of a two-period OLG economy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the rate grid for the short-run market-clearing rate
    Market {
        /// Wage of the young (overrides [short_run].wage)
        #[arg(short, long)]
        wage: Option<f64>,

        /// Largest accepted |demand - supply| (overrides [scan].tolerance)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Emit demand and supply curves sampled at this many rates
        #[arg(long)]
        plot: Option<usize>,
    },

    /// Solve for the steady-state capital stock
    SteadyState {
        /// Newton starting point (overrides [steady_state].initial_guess)
        #[arg(short, long)]
        initial_guess: Option<f64>,
    },

    /// Sample the capital transition map and the 45-degree diagram
    Dynamics {
        #[arg(long, default_value = "0.01")]
        k_min: f64,

        #[arg(long, default_value = "1.0")]
        k_max: f64,

        /// Number of evenly spaced capital stocks
        #[arg(short, long, default_value = "50")]
        points: usize,
    },

    /// Iterate the capital transition map from an initial stock
    Path {
        /// Initial capital stock
        #[arg(long)]
        k0: f64,

        /// Number of periods to iterate
        #[arg(short, long, default_value = "20")]
        periods: usize,
    },

    /// Validate configuration file
    Validate,

    /// Show example configuration
    ExampleConfig,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("A global tracing subscriber is already installed");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct MarketOutput {
    wage: f64,
    tolerance: f64,
    equilibrium: Option<olg_core::EquilibriumPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plot: Option<olg_core::plot::PlotData>,
}

fn run_market(
    config: &OlgConfig,
    wage: Option<f64>,
    tolerance: Option<f64>,
    plot: Option<usize>,
) -> Result<()> {
    let params = config
        .short_run
        .parameters()
        .context("Invalid [short_run] parameters")?;
    let wage = wage.unwrap_or(config.short_run.wage);
    let settings = ScanSettings {
        tolerance: tolerance.unwrap_or(config.scan.tolerance),
        ..config.scan
    };
    let mut model = ShortRunMarketModel::new(params);

    let output = match plot {
        Some(samples) => {
            let grid = &settings.grid;
            let rates = GridSpec::new(grid.lower + grid.step, grid.upper - grid.step, samples)
                .context("Invalid plot grid")?;
            let plot = model
                .market_plot(wage, rates, settings)
                .context("Failed to build market plot")?;
            MarketOutput {
                wage,
                tolerance: settings.tolerance,
                equilibrium: model.history().last().copied(),
                plot: Some(plot),
            }
        }
        None => MarketOutput {
            wage,
            tolerance: settings.tolerance,
            equilibrium: model
                .find_equilibrium_with(wage, settings)
                .context("Market scan failed")?,
            plot: None,
        },
    };

    if output.equilibrium.is_none() {
        info!("No rate on the grid clears the market; try a larger tolerance");
    }
    print_json(&output)
}

fn steady_state_model(config: &OlgConfig) -> Result<SteadyStateModel> {
    let params = config
        .steady_state
        .parameters()
        .context("Invalid [steady_state] parameters")?;
    config
        .newton
        .validate()
        .context("Invalid [newton] settings")?;
    Ok(SteadyStateModel::new(params).with_newton_settings(config.newton))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Commands::ExampleConfig = cli.command {
        println!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = OlgConfig::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    match cli.command {
        Commands::ExampleConfig => {}

        Commands::Validate => {
            config.validate().context("Configuration is invalid")?;
            info!("Configuration is valid");
            info!(
                "  Short run: alpha={} beta={} theta={} wage={}",
                config.short_run.alpha,
                config.short_run.beta,
                config.short_run.theta,
                config.short_run.wage
            );
            info!(
                "  Steady state: alpha={} beta={} theta={}",
                config.steady_state.alpha, config.steady_state.beta, config.steady_state.theta
            );
            info!(
                "  Rate grid: {} points, tolerance {}",
                config.scan.grid.len(),
                config.scan.tolerance
            );
        }

        Commands::Market {
            wage,
            tolerance,
            plot,
        } => run_market(&config, wage, tolerance, plot)?,

        Commands::SteadyState { initial_guess } => {
            let mut model = steady_state_model(&config)?;
            let guess = initial_guess.unwrap_or(config.steady_state.initial_guess);
            let k_star = model
                .find_steady_state(guess)
                .with_context(|| format!("Steady state solve failed from guess {guess}"))?;
            print_json(&model.summarize(k_star))?;
        }

        Commands::Dynamics {
            k_min,
            k_max,
            points,
        } => {
            let mut model = steady_state_model(&config)?;
            let result = model
                .dynamics_plot(k_min, k_max, points, config.steady_state.initial_guess)
                .context("Failed to compute dynamics")?;
            print_json(&result)?;
        }

        Commands::Path { k0, periods } => {
            let model = steady_state_model(&config)?;
            let path = model
                .transition_path(k0, periods)
                .with_context(|| format!("Transition path from k0 = {k0} failed"))?;
            print_json(&path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{steady_state_model, Cli, Commands};
    use crate::config::OlgConfig;
    use clap::Parser;

    #[test]
    fn parses_market_overrides() {
        let cli = Cli::try_parse_from(["olg", "market", "--wage", "0.5", "--plot", "20"])
            .expect("valid arguments");
        match cli.command {
            Commands::Market {
                wage,
                tolerance,
                plot,
            } => {
                assert_eq!(wage, Some(0.5));
                assert_eq!(tolerance, None);
                assert_eq!(plot, Some(20));
            }
            _ => panic!("expected market command"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["olg", "path", "--k0", "0.1", "-v", "-c", "olg.toml"])
            .expect("valid arguments");
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("olg.toml")));
    }

    #[test]
    fn path_requires_initial_capital() {
        assert!(Cli::try_parse_from(["olg", "path"]).is_err());
    }

    #[test]
    fn steady_state_model_rejects_bad_newton_section() {
        let mut config = OlgConfig::default();
        config.newton.max_steps = 0;
        let err = steady_state_model(&config).expect_err("zero steps");
        assert!(format!("{err:#}").contains("Invalid [newton] settings"));
    }
}

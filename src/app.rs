//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments and resolves settings
//! - builds the estimator and dispatches the subcommand

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EstimateArgs, FitArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::report::{format_currency_table, format_estimate, format_model_summary};

pub mod pipeline;

pub use pipeline::Estimator;

/// Entry point for the `hv` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();
    let settings = settings_from_cli(&cli)?;

    match cli.command {
        Command::Estimate(args) => handle_estimate(&Estimator::from_settings(&settings), &args),
        Command::Fit(args) => handle_fit(&Estimator::from_settings(&settings), &args),
        Command::Currencies => {
            print!("{}", format_currency_table(&settings.currencies));
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Settings file + environment, then CLI flags on top.
pub fn settings_from_cli(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(path) = &cli.dataset {
        settings.dataset.path = Some(path.clone());
    }
    if cli.synthetic {
        settings.dataset.synthetic = true;
    }
    if let Some(seed) = cli.seed {
        settings.dataset.seed = seed;
    }
    settings.validate()?;
    Ok(settings)
}

fn handle_estimate(estimator: &Estimator, args: &EstimateArgs) -> Result<(), AppError> {
    let features = args.features();
    let result = estimator.estimate_with_key(features, &args.currency)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| AppError::new(4, format!("Failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", format_estimate(&result, features));
    }
    Ok(())
}

fn handle_fit(estimator: &Estimator, args: &FitArgs) -> Result<(), AppError> {
    let model = estimator.model()?;

    if args.json {
        let json = serde_json::to_string_pretty(model.as_ref())
            .map_err(|e| AppError::new(4, format!("Failed to serialize model: {e}")))?;
        println!("{json}");
    } else {
        print!(
            "{}",
            format_model_summary(&model, &estimator.source().describe())
        );
    }
    Ok(())
}

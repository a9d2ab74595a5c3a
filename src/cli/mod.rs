//! Command-line parsing for the house value estimator.
//!
//! The CLI plays the role of the input form: it enforces the input ranges and
//! scales a raw annual income down to the model's units before anything reaches
//! the estimator.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::FeatureVector;

/// Raw annual income is divided by this to get `median_income`.
pub const INCOME_SCALE: f64 = 10_000.0;

pub const ANNUAL_INCOME_MIN: f64 = 5_000.0;
pub const ANNUAL_INCOME_MAX: f64 = 150_000.0;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hv", version, about = "California house value estimator")]
pub struct Cli {
    /// TOML settings file (currencies, threshold, dataset).
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Fit on a local CSV instead of downloading the reference table.
    #[arg(long, global = true, value_name = "CSV")]
    pub dataset: Option<PathBuf>,

    /// Fit on a seeded synthetic table (no network).
    #[arg(long, global = true)]
    pub synthetic: bool,

    /// Seed for `--synthetic`.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the value of one property.
    Estimate(EstimateArgs),
    /// Fit the model and print its coefficients and diagnostics.
    Fit(FitArgs),
    /// List the configured currencies.
    Currencies,
}

#[derive(Debug, Parser, Clone)]
pub struct EstimateArgs {
    /// Annual income in local currency (5,000 to 150,000).
    #[arg(long, default_value_t = 30_000.0, value_parser = parse_annual_income)]
    pub annual_income: f64,

    /// Median income already in model units (tens of thousands); overrides --annual-income.
    #[arg(long, conflicts_with = "annual_income")]
    pub income: Option<f64>,

    /// House age in years.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub age: u32,

    /// Average number of rooms.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub rooms: u32,

    /// Display currency (usd, eur, tnd).
    #[arg(short = 'c', long, default_value = "usd")]
    pub currency: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl EstimateArgs {
    pub fn features(&self) -> FeatureVector {
        let median_income = self.income.unwrap_or(self.annual_income / INCOME_SCALE);
        FeatureVector::new(median_income, f64::from(self.age), f64::from(self.rooms))
    }
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Print the fitted model as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_annual_income(raw: &str) -> Result<f64, String> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !(ANNUAL_INCOME_MIN..=ANNUAL_INCOME_MAX).contains(&v) {
        return Err(format!(
            "annual income must be between {ANNUAL_INCOME_MIN} and {ANNUAL_INCOME_MAX}"
        ));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate_args(argv: &[&str]) -> EstimateArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Command::Estimate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn defaults_match_the_input_form() {
        let args = estimate_args(&["hv", "estimate"]);
        assert_eq!(args.features(), FeatureVector::new(3.0, 20.0, 5.0));
        assert_eq!(args.currency, "usd");
        assert!(!args.json);
    }

    #[test]
    fn annual_income_is_scaled_down() {
        let args = estimate_args(&["hv", "estimate", "--annual-income", "85000", "--age", "1", "--rooms", "10"]);
        assert_eq!(args.features(), FeatureVector::new(8.5, 1.0, 10.0));
    }

    #[test]
    fn scaled_income_is_passed_through() {
        let args = estimate_args(&["hv", "estimate", "--income", "4.25", "-c", "eur"]);
        assert_eq!(args.features().median_income, 4.25);
        assert_eq!(args.currency, "eur");
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        assert!(Cli::try_parse_from(["hv", "estimate", "--age", "0"]).is_err());
        assert!(Cli::try_parse_from(["hv", "estimate", "--age", "51"]).is_err());
        assert!(Cli::try_parse_from(["hv", "estimate", "--rooms", "11"]).is_err());
        assert!(Cli::try_parse_from(["hv", "estimate", "--annual-income", "4999"]).is_err());
        assert!(Cli::try_parse_from(["hv", "estimate", "--annual-income", "200000"]).is_err());
        assert!(
            Cli::try_parse_from(["hv", "estimate", "--income", "3", "--annual-income", "30000"]).is_err()
        );
    }

    #[test]
    fn global_source_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hv", "fit", "--synthetic", "--seed", "7", "--json"]).unwrap();
        assert!(cli.synthetic);
        assert_eq!(cli.seed, Some(7));
        assert!(matches!(cli.command, Command::Fit(FitArgs { json: true })));
    }
}

//! Terminal output for the `hv` binary.
//!
//! Formatting lives here so the estimator never builds display text beyond
//! `format_amount`.

use crate::domain::{EstimationResult, FeatureVector, TrainedModel};
use crate::pricing::CurrencyTable;

/// Headline, amount and market analysis for one estimate.
pub fn format_estimate(result: &EstimationResult, features: FeatureVector) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Inputs: median_income={:.4} house_age={} average_rooms={}\n",
        features.median_income, features.house_age, features.average_rooms
    ));
    out.push_str(&format!("Estimated Price in {}\n", result.currency.code()));
    out.push_str(&format!("  {}\n", result.display));
    out.push_str(&format!("Market Analysis: {}\n", result.tier.label()));
    out
}

/// Coefficients and training diagnostics.
pub fn format_model_summary(model: &TrainedModel, origin: &str) -> String {
    let mut out = String::new();

    out.push_str("=== hv - house value model ===\n");
    out.push_str(&format!("Dataset: {origin}\n"));
    if let Some(q) = model.quality() {
        out.push_str(&format!(
            "Rows: {} | R2={:.4} | RMSE={:.4} (x100k)\n",
            q.n_rows, q.r_squared, q.rmse
        ));
    }

    out.push_str("\nCoefficients:\n");
    out.push_str(&format!("  {:<14} {:>12.6}\n", "intercept", model.intercept()));
    for (name, w) in FeatureVector::NAMES.iter().zip(model.weights()) {
        out.push_str(&format!("  {name:<14} {w:>12.6}\n"));
    }

    out
}

/// One line per configured currency.
pub fn format_currency_table(table: &CurrencyTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6} {:<6} {:>10}\n", "code", "symbol", "multiplier"));
    for (currency, spec) in table.entries() {
        out.push_str(&format!(
            "{:<6} {:<6} {:>10.4}\n",
            currency.code(),
            spec.symbol,
            spec.multiplier
        ));
    }
    out
}

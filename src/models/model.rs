//! Linear model evaluation.
//!
//! The fitter and the estimator share two primitives:
//! - build a design row for a feature vector (for OLS)
//! - predict the target given fitted coefficients
//!
//! Both use `FeatureVector::as_array`, which fixes the column order.

use crate::domain::{FeatureVector, TrainedModel};

/// Columns in a design row: the intercept plus one per feature.
pub const DESIGN_LEN: usize = FeatureVector::LEN + 1;

/// Design row for a feature vector; the constant term comes first.
pub fn design_row(features: FeatureVector) -> [f64; DESIGN_LEN] {
    let [income, age, rooms] = features.as_array();
    [1.0, income, age, rooms]
}

/// Predict the target (units of 100,000) for a feature vector.
///
/// No range checks: any input is evaluated as-is.
pub fn predict(model: &TrainedModel, features: FeatureVector) -> f64 {
    model
        .weights()
        .iter()
        .zip(features.as_array())
        .fold(model.intercept(), |acc, (w, x)| acc + w * x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_is_intercept_plus_weighted_sum() {
        let model = TrainedModel::from_coefficients(0.5, [0.4, 0.01, -0.02]);
        let y = predict(&model, FeatureVector::new(3.0, 20.0, 5.0));
        assert!((y - (0.5 + 1.2 + 0.2 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn predict_accepts_out_of_range_inputs() {
        let model = TrainedModel::from_coefficients(0.0, [1.0, 1.0, 1.0]);
        let y = predict(&model, FeatureVector::new(-5.0, 500.0, 0.0));
        assert_eq!(y, 495.0);
    }

    #[test]
    fn design_row_matches_feature_order() {
        assert_eq!(design_row(FeatureVector::new(3.0, 20.0, 5.0)), [1.0, 3.0, 20.0, 5.0]);
    }
}

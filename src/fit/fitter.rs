//! Least-squares fit of the value model.
//!
//! Given the reference rows we:
//! - validate that there are enough finite rows to identify the coefficients
//! - build the `[1, income, age, rooms]` design matrix
//! - solve OLS for `median_value`
//! - compute R² and RMSE on the training rows
//!
//! The solve is sequential and uses no randomness, so refitting the same table
//! gives bit-identical coefficients.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::info;

use crate::domain::{FeatureVector, FitQuality, ReferenceDataset, ReferenceRecord, TrainedModel};
use crate::error::EstimatorError;
use crate::math::solve_least_squares;
use crate::models::{DESIGN_LEN, design_row, predict};

/// Fewest rows that identify one weight per feature plus the intercept.
pub const MIN_ROWS: usize = FeatureVector::LEN + 1;

/// Rows per parallel chunk when accumulating residual sums.
///
/// Chunk sums are combined in index order, so diagnostics do not depend on
/// thread scheduling.
const QUALITY_CHUNK: usize = 4096;

/// Fit `median_value ~ median_income + house_age + average_rooms`.
pub fn fit(dataset: &ReferenceDataset) -> Result<TrainedModel, EstimatorError> {
    let records = dataset.records();
    let n = records.len();
    if n < MIN_ROWS {
        return Err(EstimatorError::Fit(format!(
            "Need at least {MIN_ROWS} rows to fit {} features, got {n}.",
            FeatureVector::LEN
        )));
    }
    if let Some(idx) = records.iter().position(|r| !r.is_finite()) {
        return Err(EstimatorError::Fit(format!(
            "Non-finite value in reference row {}.",
            idx + 1
        )));
    }

    let mut x = DMatrix::<f64>::zeros(n, DESIGN_LEN);
    for (i, record) in records.iter().enumerate() {
        for (j, v) in design_row(record.features()).into_iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    let y = DVector::from_iterator(n, records.iter().map(|r| r.median_value));

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        EstimatorError::Fit("Least-squares system could not be solved.".to_string())
    })?;

    let model = TrainedModel::from_coefficients(beta[0], [beta[1], beta[2], beta[3]]);
    let quality = fit_quality(&model, records);
    info!(
        rows = n,
        intercept = model.intercept(),
        weights = ?model.weights(),
        r_squared = quality.r_squared,
        rmse = quality.rmse,
        "value model fitted"
    );

    Ok(model.with_quality(quality))
}

/// R² and RMSE of `model` over `records`.
pub fn fit_quality(model: &TrainedModel, records: &[ReferenceRecord]) -> FitQuality {
    let n = records.len();
    if n == 0 {
        return FitQuality {
            n_rows: 0,
            r_squared: 0.0,
            rmse: 0.0,
        };
    }

    let mean = ordered_sum(records, |r| r.median_value) / n as f64;
    let sse = ordered_sum(records, |r| {
        let e = r.median_value - predict(model, r.features());
        e * e
    });
    let sst = ordered_sum(records, |r| {
        let d = r.median_value - mean;
        d * d
    });

    let r_squared = if sst > 0.0 {
        1.0 - sse / sst
    } else if sse == 0.0 {
        1.0
    } else {
        0.0
    };

    FitQuality {
        n_rows: n,
        r_squared,
        rmse: (sse / n as f64).sqrt(),
    }
}

fn ordered_sum<F>(records: &[ReferenceRecord], f: F) -> f64
where
    F: Fn(&ReferenceRecord) -> f64 + Sync,
{
    let partials: Vec<f64> = records
        .par_chunks(QUALITY_CHUNK)
        .map(|chunk| chunk.iter().map(&f).sum::<f64>())
        .collect();
    partials.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{SYNTHETIC_INTERCEPT, SYNTHETIC_WEIGHTS, generate_reference};

    fn record(income: f64, age: f64, rooms: f64, value: f64) -> ReferenceRecord {
        ReferenceRecord {
            median_income: income,
            house_age: age,
            average_rooms: rooms,
            median_value: value,
        }
    }

    #[test]
    fn recovers_exact_linear_relationship() {
        // value = 0.5 + 0.4*income + 0.01*age - 0.02*rooms
        let rows = [
            (1.0, 10.0, 4.0),
            (2.0, 15.0, 5.0),
            (3.0, 20.0, 4.5),
            (4.0, 5.0, 6.0),
            (5.0, 30.0, 7.0),
            (6.5, 12.0, 3.0),
        ];
        let records = rows
            .iter()
            .map(|&(i, a, r)| record(i, a, r, 0.5 + 0.4 * i + 0.01 * a - 0.02 * r))
            .collect();
        let model = fit(&ReferenceDataset::new(records, "exact")).unwrap();

        assert!((model.intercept() - 0.5).abs() < 1e-9);
        let w = model.weights();
        assert!((w[0] - 0.4).abs() < 1e-9);
        assert!((w[1] - 0.01).abs() < 1e-9);
        assert!((w[2] + 0.02).abs() < 1e-9);

        let q = model.quality().unwrap();
        assert_eq!(q.n_rows, 6);
        assert!(q.rmse < 1e-9);
        assert!((q.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn refit_is_bit_identical() {
        let ds = generate_reference(500, 11, 0.3).unwrap();
        let a = fit(&ds).unwrap();
        let b = fit(&ds).unwrap();
        assert_eq!(a.intercept().to_bits(), b.intercept().to_bits());
        for (wa, wb) in a.weights().iter().zip(b.weights()) {
            assert_eq!(wa.to_bits(), wb.to_bits());
        }
        assert_eq!(a, b);
    }

    #[test]
    fn recovers_synthetic_coefficients() {
        let ds = generate_reference(5000, 3, 0.1).unwrap();
        let model = fit(&ds).unwrap();
        assert!((model.intercept() - SYNTHETIC_INTERCEPT).abs() < 0.05);
        for (w, truth) in model.weights().iter().zip(SYNTHETIC_WEIGHTS) {
            assert!((w - truth).abs() < 0.01, "weight {w} far from {truth}");
        }
    }

    #[test]
    fn too_few_rows_is_a_fit_error() {
        let records = vec![
            record(1.0, 1.0, 1.0, 1.0),
            record(2.0, 3.0, 1.0, 2.0),
            record(3.0, 2.0, 5.0, 3.0),
        ];
        let err = fit(&ReferenceDataset::new(records, "tiny")).unwrap_err();
        assert!(matches!(err, EstimatorError::Fit(_)));
    }

    #[test]
    fn non_finite_values_are_a_fit_error() {
        let mut records: Vec<ReferenceRecord> = (0..6)
            .map(|i| record(i as f64, 2.0 * i as f64 + 1.0, 3.0, 1.0))
            .collect();
        records[4].average_rooms = f64::INFINITY;
        let err = fit(&ReferenceDataset::new(records, "bad")).unwrap_err();
        assert_eq!(err, EstimatorError::Fit("Non-finite value in reference row 5.".to_string()));
    }
}

//! Seeded synthetic reference table.
//!
//! Used for offline runs (`hv --synthetic`) and hermetic tests. Rows follow a
//! known linear relationship plus Gaussian noise, with feature ranges close to
//! the California housing census table.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FeatureVector, ReferenceDataset, ReferenceRecord};
use crate::error::EstimatorError;

/// Intercept of the generating relationship (units of 100,000).
pub const SYNTHETIC_INTERCEPT: f64 = -0.10;

/// Weights of the generating relationship, in `FeatureVector` order.
pub const SYNTHETIC_WEIGHTS: [f64; FeatureVector::LEN] = [0.44, 0.017, -0.027];

/// Standard deviation of the additive noise (units of 100,000).
pub const SYNTHETIC_NOISE_SD: f64 = 0.5;

/// Generate `rows` observations from `seed`.
///
/// The same `(rows, seed, noise_sd)` always yields the same table.
pub fn generate_reference(rows: usize, seed: u64, noise_sd: f64) -> Result<ReferenceDataset, EstimatorError> {
    if rows == 0 {
        return Err(EstimatorError::DataUnavailable(
            "Synthetic row count must be > 0.".to_string(),
        ));
    }
    let noise = Normal::new(0.0, noise_sd)
        .map_err(|e| EstimatorError::DataUnavailable(format!("Noise distribution error: {e}")))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let [w_income, w_age, w_rooms] = SYNTHETIC_WEIGHTS;

    let records = (0..rows)
        .map(|_| {
            let median_income = rng.gen_range(0.5..15.0);
            let house_age = rng.gen_range(1.0..52.0_f64).floor();
            let average_rooms = rng.gen_range(2.0..10.0);
            let signal = SYNTHETIC_INTERCEPT
                + w_income * median_income
                + w_age * house_age
                + w_rooms * average_rooms;
            ReferenceRecord {
                median_income,
                house_age,
                average_rooms,
                median_value: signal + noise.sample(&mut rng),
            }
        })
        .collect();

    Ok(ReferenceDataset::new(
        records,
        format!("synthetic (rows={rows}, seed={seed})"),
    ))
}

//! Ordinary least squares solver.
//!
//! We solve a single regression problem of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where each row `x_i` is `[1, median_income, house_age, average_rooms]`.
//!
//! Implementation choices:
//! - SVD rather than normal equations: the design matrix is tall (tens of
//!   thousands of rows, four columns) and `X^T X` squares its condition number.
//! - Nalgebra's `QR::solve` only handles square systems, so it is not an option.
//! - Near-collinear columns get the minimum-norm solution, same as LAPACK `gelsd`.

use nalgebra::{DMatrix, DVector};

/// Singular-value cutoffs tried in order, strictest first.
const TOLERANCES: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the dimensions disagree or no tolerance yields a finite
/// solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() < x.ncols() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    for &tol in &TOLERANCES {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

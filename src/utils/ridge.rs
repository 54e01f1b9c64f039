//! L2-penalized least squares via the normal equations.
//!
//! The trend and seasonal bases are fit jointly as one linear system; the
//! penalty vector lets each coefficient carry its own prior strength
//! (strong shrinkage on changepoint deltas, weak on seasonal harmonics).

use crate::error::{ForecastError, Result};

/// Solve `min ||y - X beta||^2 + sum_i penalties[i] * beta[i]^2`.
///
/// `design` holds one row per observation; `penalties` has one entry per
/// column. Uses Cholesky decomposition on the penalized normal equations.
///
/// # Arguments
/// * `design` - Design matrix rows (each of length p)
/// * `y` - Target values (length n)
/// * `penalties` - L2 penalty per coefficient (length p)
pub fn ridge_solve(design: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    if design.len() != n {
        return Err(ForecastError::ComputationError(format!(
            "design has {} rows for {} targets",
            design.len(),
            n
        )));
    }
    let p = penalties.len();
    if n == 0 || p == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    // Accumulate X'X and X'y
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (row, &target) in design.iter().zip(y) {
        if row.len() != p {
            return Err(ForecastError::ComputationError(format!(
                "design row has {} columns, expected {}",
                row.len(),
                p
            )));
        }
        for i in 0..p {
            let xi = row[i];
            xty[i] += xi * target;
            for j in i..p {
                xtx[i][j] += xi * row[j];
            }
        }
    }
    // Mirror the upper triangle and apply the penalty diagonal.
    // The extra 1e-8 keeps unpenalized columns numerically stable.
    for i in 0..p {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
        xtx[i][i] += penalties[i] + 1e-8;
    }

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::ComputationError("penalized system is not positive definite".to_string())
    })
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Decoder solver
//!
//! L2-regularised least squares for linear decoders:
//!
//! ```text
//! (AᵀA + m σ² I) D = Aᵀ Y,   σ = reg * max(A)
//! ```
//!
//! `A` is `m x n` (evaluation points x neurons), `Y` is `m x k` targets.
//! The Gram matrix is symmetric positive definite once `σ > 0`, so it is
//! factored with Cholesky.

use ndarray::{Array1, Array2, ArrayView2};
use tracing::trace;

use crate::types::{NeuralError, NeuralResult};

/// Default regularisation, relative to the peak activity
pub const DEFAULT_REGULARIZATION: f64 = 0.1;

/// Solved decoders with the fit error on the evaluation points
#[derive(Debug, Clone)]
pub struct DecoderSolution {
    /// `n_neurons x output_dimensions`
    pub decoders: Array2<f64>,
    /// Root-mean-square error over all targets
    pub rmse: f64,
}

/// Solve decoders mapping `activities` to `targets`
///
/// # Errors
/// * `ShapeMismatch` if the row counts differ
/// * `InvalidParameter` if `regularization` is negative or not finite
/// * `SingularSystem` if the Gram matrix is not positive definite (for
///   example a neuron that is silent on every point with zero
///   regularisation)
///
/// A population silent on every point decodes nothing: the decoders are
/// all zero and `rmse` measures the targets themselves.
pub fn solve_decoders(
    activities: ArrayView2<'_, f64>,
    targets: ArrayView2<'_, f64>,
    regularization: f64,
) -> NeuralResult<DecoderSolution> {
    let (m, n) = activities.dim();
    if targets.nrows() != m {
        return Err(NeuralError::ShapeMismatch {
            context: "decoder targets",
            expected: (m, targets.ncols()),
            actual: targets.dim(),
        });
    }
    if !(regularization >= 0.0) || !regularization.is_finite() {
        return Err(NeuralError::InvalidParameter {
            name: "regularization",
            reason: format!("{} must be a non-negative number", regularization),
        });
    }

    let max_activity = activities.iter().cloned().fold(0.0_f64, f64::max);
    if !(max_activity > 0.0) {
        let decoders = Array2::zeros((n, targets.ncols()));
        let rmse = root_mean_square(&targets.to_owned());
        trace!(target: "nef-neural", "Silent population, zero decoders, rmse={:.5}", rmse);
        return Ok(DecoderSolution { decoders, rmse });
    }
    let sigma = regularization * max_activity;

    let mut gram = activities.t().dot(&activities);
    let ridge = m as f64 * sigma * sigma;
    for i in 0..n {
        gram[[i, i]] += ridge;
    }
    let rhs = activities.t().dot(&targets);

    let factor = cholesky(&gram)?;
    let mut decoders = Array2::zeros((n, targets.ncols()));
    for (k, column) in rhs.columns().into_iter().enumerate() {
        let solution = cholesky_solve(&factor, &column.to_owned());
        decoders.column_mut(k).assign(&solution);
    }

    let rmse = root_mean_square(&(&activities.dot(&decoders) - &targets));
    trace!(target: "nef-neural", "Solved {}x{} decoders, rmse={:.5}", n, targets.ncols(), rmse);

    Ok(DecoderSolution { decoders, rmse })
}

fn root_mean_square(values: &Array2<f64>) -> f64 {
    let count = values.len().max(1) as f64;
    (values.mapv(|v| v * v).sum() / count).sqrt()
}

/// Lower-triangular `L` with `L Lᵀ = a`
fn cholesky(a: &Array2<f64>) -> NeuralResult<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if !(diag > 0.0) {
            return Err(NeuralError::SingularSystem(format!(
                "non-positive pivot {:e} at column {}",
                diag, j
            )));
        }
        let pivot = diag.sqrt();
        l[[j, j]] = pivot;
        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / pivot;
        }
    }
    Ok(l)
}

fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // L y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Lᵀ x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }
    x
}

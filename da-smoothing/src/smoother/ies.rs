
use da_core::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

use super::inversion::{subspace_inverse_apply, Truncation};
use super::{checked_dims, scaled_anomalies, scaled_innovation};

/// One Gauss-Newton step of the iterative ensemble smoother.
///
/// The coefficient matrix W is caller-owned state: start from the zero
/// matrix, re-run the forward model on `prior * (I + W)` between
/// calls, and pass the updated Y back in. `step_length` is the
/// Gauss-Newton damping gamma in (0, 1]. The proposed full step is
///
///   W* = S^T (S S^T + I)^{-1} (h + S W_prev)
///
/// and the result is `(1 - gamma) W_prev + gamma W*`. From `W_prev = 0`
/// with `gamma = 1` this reproduces the ES transition: X_ES = I + W.
///
/// The engine has no stopping logic and no divergence detection; both
/// belong to the outer loop.
pub fn ies(y: ArrayView2<f64>, d: ArrayView2<f64>, cdd: ArrayView1<f64>,
           w_prev: ArrayView2<f64>, step_length: f64,
           truncation: Truncation) -> Result<Array2<f64>> {
  let (m, n) = checked_dims(y, d, cdd)?;
  if w_prev.dim() != (n, n) {
    return Err(Error::shape_mismatch("coefficient matrix W",
                                     (n, n), w_prev.dim()));
  }
  if !(step_length > 0.0 && step_length <= 1.0) {
    return Err(Error::StepLength(step_length));
  }

  if m == 0 {
    return Ok(w_prev.to_owned() * (1.0 - step_length));
  }

  let s = scaled_anomalies(y, cdd);
  let mut h = scaled_innovation(d, y, cdd);
  h += &s.dot(&w_prev);

  let w_star = subspace_inverse_apply(&s, &h, truncation);
  Ok(w_prev.to_owned() * (1.0 - step_length) + w_star * step_length)
}

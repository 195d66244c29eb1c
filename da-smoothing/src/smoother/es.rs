
use da_core::Result;
use ndarray::{Array2, ArrayView1, ArrayView2};

use super::inversion::{subspace_inverse_apply, Truncation};
use super::{checked_dims, scaled_anomalies, scaled_innovation};

/// One-shot ensemble smoother update.
///
/// Returns the N-by-N transition matrix X with
/// `posterior = prior * X`; applying it is the caller's job (see
/// [`crate::ensemble::apply_transition`]). With no observations the
/// update is the identity. For linear-Gaussian forward models and
/// large N this approximates the Kalman posterior; no such guarantee
/// exists for nonlinear models.
pub fn es(y: ArrayView2<f64>, d: ArrayView2<f64>, cdd: ArrayView1<f64>,
          truncation: Truncation) -> Result<Array2<f64>> {
  let (m, n) = checked_dims(y, d, cdd)?;

  let mut x = Array2::eye(n);
  if m == 0 {
    return Ok(x);
  }

  let s = scaled_anomalies(y, cdd);
  let h = scaled_innovation(d, y, cdd);
  x += &subspace_inverse_apply(&s, &h, truncation);
  Ok(x)
}

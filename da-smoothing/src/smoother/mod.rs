
//! The analysis engines. Both smoothers share one scaling convention:
//!
//!   S = Cdd^{-1/2} (Y - mean(Y)) / sqrt(N - 1)
//!   h = Cdd^{-1/2} (D - Y) / sqrt(N - 1)
//!
//! After the rescaling the effective observation covariance is the
//! identity, so `(S S^T + I)` can be inverted in the ensemble subspace
//! without ever forming an M-by-M matrix.

use da_core::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

pub use es::es;
pub use ies::ies;
pub use inversion::Truncation;

mod es;
mod ies;
mod inversion;

/// Validate the (Y, D, Cdd) triple and return (M, N). Runs before any
/// arithmetic in both smoothers.
fn checked_dims(y: ArrayView2<f64>, d: ArrayView2<f64>,
                cdd: ArrayView1<f64>) -> Result<(usize, usize)> {
  let (m, n) = y.dim();
  if n < 2 {
    return Err(Error::EnsembleTooSmall(n));
  }
  if d.dim() != (m, n) {
    return Err(Error::shape_mismatch("perturbed observations D",
                                     (m, n), d.dim()));
  }
  if cdd.len() != m {
    return Err(Error::shape_mismatch("observation variance diagonal",
                                     m, cdd.len()));
  }
  for (index, &variance) in cdd.iter().enumerate() {
    if !(variance > 0.0) {
      return Err(Error::NonPositiveVariance { index, variance });
    }
  }
  Ok((m, n))
}

/// S: response anomalies, rescaled row-wise by the inverse stddev and
/// by 1/sqrt(N - 1). Rank is at most N - 1 after the mean removal.
fn scaled_anomalies(y: ArrayView2<f64>, cdd: ArrayView1<f64>) -> Array2<f64> {
  let (_, n) = y.dim();
  let mean = y.mean_axis(Axis(1)).expect("callers check n >= 2");
  let scale = 1.0 / ((n - 1) as f64).sqrt();

  let mut s = y.to_owned();
  for (i, mut row) in s.axis_iter_mut(Axis(0)).enumerate() {
    let w = scale / cdd[i].sqrt();
    let mu = mean[i];
    row.mapv_inplace(|v| (v - mu) * w);
  }
  s
}

/// h: the innovation D - Y under the same rescaling as S.
fn scaled_innovation(d: ArrayView2<f64>, y: ArrayView2<f64>,
                     cdd: ArrayView1<f64>) -> Array2<f64> {
  let (_, n) = y.dim();
  let scale = 1.0 / ((n - 1) as f64).sqrt();

  let mut h = &d - &y;
  for (i, mut row) in h.axis_iter_mut(Axis(0)).enumerate() {
    let w = scale / cdd[i].sqrt();
    row.mapv_inplace(|v| v * w);
  }
  h
}

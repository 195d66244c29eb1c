
//! Ensemble-subspace pseudo-inversion of (S S^T + I).

use log::debug;
use nalgebra::DMatrix;
use ndarray::Array2;

/// Relative singular-value cutoff: directions of S with
/// `sigma <= tol * sigma_max` are discarded before inversion. They
/// carry sampling noise rather than signal, and dropping them is what
/// keeps rank-deficient ensembles (N - 1 < M is routine) well posed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truncation(pub f64);

impl Default for Truncation {
  fn default() -> Truncation {
    Truncation(1e-8)
  }
}

/// Compute `S^T (S S^T + I)^{-1} H` without forming the M-by-M sum.
///
/// With S = U Sigma V^T the product collapses to
/// `V diag(sigma / (sigma^2 + 1)) U^T H`: the orthogonal complement of
/// the column space of U is annihilated by the leading S^T, so only
/// the retained singular directions contribute.
pub(super) fn subspace_inverse_apply(s: &Array2<f64>, h: &Array2<f64>,
                                     truncation: Truncation) -> Array2<f64> {
  let (m, n) = s.dim();
  debug_assert_eq!(h.dim(), (m, n));

  let s_m = DMatrix::from_row_iterator(m, n, s.iter().copied());
  let h_m = DMatrix::from_row_iterator(m, n, h.iter().copied());

  let svd = s_m.svd(true, true);
  let u = svd.u.expect("svd computed with u");
  let v_t = svd.v_t.expect("svd computed with v_t");
  let sigma = svd.singular_values;

  let sigma_max = sigma.iter().fold(0.0_f64, |a, &b| a.max(b));
  if sigma_max <= 0.0 {
    return Array2::zeros((n, n));
  }

  let mut w = DMatrix::<f64>::zeros(n, n);
  let mut kept = 0;
  for i in 0..sigma.len() {
    let sv = sigma[i];
    if sv <= truncation.0 * sigma_max {
      continue;
    }
    kept += 1;
    let gain = sv / (sv * sv + 1.0);
    let ut_h = u.column(i).transpose() * &h_m;
    w += v_t.row(i).transpose() * ut_h * gain;
  }
  debug!("subspace inversion kept {}/{} singular directions",
         kept, sigma.len());

  Array2::from_shape_fn((n, n), |(r, c)| w[(r, c)])
}

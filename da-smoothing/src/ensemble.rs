
//! Ensemble matrix construction: the perturbed-observation matrix D,
//! the predicted-response matrix Y, and application of an analysis
//! transition matrix to a parameter ensemble.

use da_core::{Error, Result};
use ndarray::{Array2, Array3, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::observation::ObservationSet;

/// Build D: each column is the observed values plus an independent
/// zero-mean Gaussian draw with the per-observation stddev.
///
/// The draws are re-centered so that each row's empirical mean is
/// exactly zero before the observed value is added. For small
/// ensembles the raw sample mean is a visible bias in the update;
/// centering removes it by construction rather than in expectation.
pub fn perturbed_observations<R>(observations: &ObservationSet,
                                 members: usize,
                                 rng: &mut R) -> Result<Array2<f64>>
  where R: Rng,
{
  if members < 2 {
    return Err(Error::EnsembleTooSmall(members));
  }

  let mut d = Array2::zeros((observations.len(), members));
  for (i, record) in observations.iter().enumerate() {
    let noise = Normal::new(0.0, record.stddev)
      .expect("ObservationSet guarantees positive stddev");
    let mut row = d.row_mut(i);
    for e in row.iter_mut() {
      *e = noise.sample(rng);
    }
    let mean = row.sum() / members as f64;
    for e in row.iter_mut() {
      *e += record.value - mean;
    }
  }
  Ok(d)
}

/// Build Y: `Y[i, e]` is member `e`'s trajectory evaluated at
/// observation `i`'s (time, y, x). Row order equals the observation
/// order, which is what keeps Y aligned with D and the covariance
/// diagonal.
pub fn responses(trajectories: &[Array3<f64>],
                 observations: &ObservationSet) -> Result<Array2<f64>> {
  if trajectories.len() < 2 {
    return Err(Error::EnsembleTooSmall(trajectories.len()));
  }
  let dim = trajectories[0].dim();
  for traj in &trajectories[1..] {
    if traj.dim() != dim {
      return Err(Error::shape_mismatch("member trajectory", dim, traj.dim()));
    }
  }

  let (nt, ny, nx) = dim;
  let mut y = Array2::zeros((observations.len(), trajectories.len()));
  for (i, r) in observations.iter().enumerate() {
    if r.time_index >= nt {
      return Err(Error::IndexOutOfBounds {
        context: "response time index",
        index: r.time_index,
        bound: nt,
      });
    }
    if r.x >= nx {
      return Err(Error::IndexOutOfBounds {
        context: "response site x",
        index: r.x,
        bound: nx,
      });
    }
    if r.y >= ny {
      return Err(Error::IndexOutOfBounds {
        context: "response site y",
        index: r.y,
        bound: ny,
      });
    }
    for (e, traj) in trajectories.iter().enumerate() {
      y[[i, e]] = traj[[r.time_index, r.y, r.x]];
    }
  }
  Ok(y)
}

/// posterior = prior * X. The transition matrix must be square with
/// one row per ensemble member.
pub fn apply_transition(prior: ArrayView2<f64>,
                        transition: ArrayView2<f64>) -> Result<Array2<f64>> {
  let (_, n) = prior.dim();
  if transition.dim() != (n, n) {
    return Err(Error::shape_mismatch("transition matrix",
                                     (n, n), transition.dim()));
  }
  Ok(prior.dot(&transition))
}

#[cfg(test)]
mod tests {
  use da_core::Error;
  use ndarray::{arr2, Array2, Array3, Axis};
  use rand::SeedableRng;
  use rand_chacha::ChaCha8Rng;

  use crate::observation::{Observation, ObservationSet};

  use super::{apply_transition, perturbed_observations, responses};

  fn small_set() -> ObservationSet {
    ObservationSet::new(vec![
      Observation { time_index: 0, x: 1, y: 2, value: 4.0, stddev: 0.5 },
      Observation { time_index: 2, x: 3, y: 1, value: -1.0, stddev: 2.0 },
    ])
    .unwrap()
  }

  #[test]
  fn perturbations_are_centered_exactly() {
    let obs = small_set();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let d = perturbed_observations(&obs, 7, &mut rng).unwrap();

    assert_eq!(d.dim(), (2, 7));
    for (i, row) in d.axis_iter(Axis(0)).enumerate() {
      let mean = row.sum() / 7.0;
      assert!((mean - obs.get(i).unwrap().value).abs() < 1e-12);
    }
    // Draws differ across members.
    assert_ne!(d[[0, 0]], d[[0, 1]]);
  }

  #[test]
  fn single_member_rejected() {
    let obs = small_set();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = perturbed_observations(&obs, 1, &mut rng).unwrap_err();
    assert_eq!(err, Error::EnsembleTooSmall(1));
  }

  #[test]
  fn responses_index_by_observation_order() {
    let obs = small_set();
    let t0 = Array3::from_shape_fn((3, 4, 5), |(t, y, x)| {
      (t * 100 + y * 10 + x) as f64
    });
    let t1 = &t0 + 1000.0;
    let y = responses(&[t0, t1], &obs).unwrap();

    assert_eq!(y.dim(), (2, 2));
    assert_eq!(y[[0, 0]], 21.0);
    assert_eq!(y[[0, 1]], 1021.0);
    assert_eq!(y[[1, 0]], 213.0);
  }

  #[test]
  fn mismatched_trajectories_rejected() {
    let obs = small_set();
    let t0 = Array3::zeros((3, 4, 5));
    let t1 = Array3::zeros((3, 4, 4));
    assert!(responses(&[t0, t1], &obs).is_err());
  }

  #[test]
  fn out_of_bounds_observation_rejected() {
    let obs = ObservationSet::new(vec![Observation {
      time_index: 9,
      x: 0,
      y: 0,
      value: 0.0,
      stddev: 1.0,
    }])
    .unwrap();
    let t = vec![Array3::zeros((3, 4, 5)), Array3::zeros((3, 4, 5))];
    let err = responses(&t, &obs).unwrap_err();
    assert_eq!(err, Error::IndexOutOfBounds {
      context: "response time index",
      index: 9,
      bound: 3,
    });
  }

  #[test]
  fn transition_shape_checked() {
    let a = Array2::<f64>::zeros((6, 4));
    let x = Array2::<f64>::eye(3);
    assert!(apply_transition(a.view(), x.view()).is_err());
  }

  #[test]
  fn identity_transition_is_a_no_op() {
    let a = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    let x = Array2::eye(2);
    let b = apply_transition(a.view(), x.view()).unwrap();
    assert_eq!(a, b);
  }
}

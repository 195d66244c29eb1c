
//! Twin experiment: recover a spatially varying diffusivity field of
//! the stochastic heat equation from a handful of point measurements,
//! with ES and IES analysis steps.

use da_core::{Result, RngStreams};
use da_pde::{Boundary, Diffusion2d, GridField};
use da_smoothing::{apply_transition, es, ies, perturbed_observations,
                   responses, ObservationSet, Truncation};
use log::info;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rayon::prelude::*;

/// Floor for prior diffusivity draws. The analysis itself places no
/// positivity constraint on the parameters; the explicit stepper does.
pub const ALPHA_MIN: f64 = 0.1;

/// Fixed geometry and integrator settings shared by the truth run and
/// every ensemble member.
#[derive(Debug, Clone)]
pub struct Experiment {
  pub ny: usize,
  pub nx: usize,
  pub steps: usize,
  pub integrator: Diffusion2d,
  pub boundary: Boundary,
  pub initial_interior: f64,
}

impl Experiment {
  /// Number of parameters P: one diffusivity per grid cell.
  pub fn cells(&self) -> usize {
    self.ny * self.nx
  }

  pub fn initial_field(&self) -> GridField {
    GridField::filled(self.ny, self.nx, self.initial_interior, self.boundary)
  }

  /// Reshape one ensemble column back into a (ny, nx) diffusivity
  /// field. Columns are row-major flattenings.
  pub fn member_field(&self, column: ArrayView1<f64>) -> Array2<f64> {
    column
      .to_owned()
      .into_shape((self.ny, self.nx))
      .expect("column length equals the cell count")
  }

  /// Prior parameter ensemble: one Gaussian diffusivity field per
  /// column, clamped to [`ALPHA_MIN`].
  pub fn prior_ensemble(&self, members: usize, mean: f64, stddev: f64,
                        streams: &RngStreams) -> Array2<f64> {
    let normal = Normal::new(mean, stddev)
      .expect("prior stddev must be non-negative");
    let mut rng = streams.prior();
    let mut a = Array2::random_using((self.cells(), members), normal, &mut rng);
    a.mapv_inplace(|v| v.max(ALPHA_MIN));
    a
  }

  pub fn truth_trajectory(&self, alpha: ArrayView2<f64>,
                          streams: &RngStreams) -> Array3<f64> {
    let mut rng = streams.truth();
    self.integrator
      .integrate(&self.initial_field(), alpha, 0..self.steps, &mut rng)
  }

  /// Run the forward model once per member. The runs are independent
  /// and dispatched on the rayon pool; each consumes its own stream,
  /// so the collected trajectories are identical for any degree of
  /// parallelism, and the order-preserving collect keeps trajectory
  /// `e` aligned with ensemble column `e`.
  pub fn run_ensemble(&self, alphas: ArrayView2<f64>,
                      streams: &RngStreams) -> Vec<Array3<f64>> {
    let initial = self.initial_field();
    let (_, members) = alphas.dim();
    (0..members)
      .into_par_iter()
      .map(|e| {
        let alpha = self.member_field(alphas.column(e));
        let mut rng = streams.member(e);
        self.integrator
          .integrate(&initial, alpha.view(), 0..self.steps, &mut rng)
      })
      .collect()
  }

  /// One-shot ES assimilation of `observations` into `prior`.
  pub fn assimilate_es(&self, prior: ArrayView2<f64>,
                       observations: &ObservationSet,
                       streams: &RngStreams) -> Result<Array2<f64>> {
    let members = prior.dim().1;
    let trajectories = self.run_ensemble(prior, streams);
    let y = responses(&trajectories, observations)?;
    let d = perturbed_observations(observations, members,
                                   &mut streams.perturbations())?;
    let x = es(y.view(), d.view(), observations.variances().view(),
               Truncation::default())?;
    apply_transition(prior, x.view())
  }

  /// Gauss-Newton IES loop with a fixed iteration count, re-running
  /// the forward model on `prior * (I + W)` between steps. Divergence
  /// checks (norm growth of W) stay with the caller of this harness,
  /// matching the step-function contract of [`da_smoothing::ies`].
  pub fn assimilate_ies(&self, prior: ArrayView2<f64>,
                        observations: &ObservationSet,
                        streams: &RngStreams,
                        iterations: usize,
                        step_length: f64) -> Result<Array2<f64>> {
    let members = prior.dim().1;
    let d = perturbed_observations(observations, members,
                                   &mut streams.perturbations())?;
    let cdd = observations.variances();

    let mut w = Array2::zeros((members, members));
    let mut posterior = prior.to_owned();
    for iteration in 0..iterations {
      let trajectories = self.run_ensemble(posterior.view(), streams);
      let y = responses(&trajectories, observations)?;
      w = ies(y.view(), d.view(), cdd.view(), w.view(), step_length,
              Truncation::default())?;

      let mut x = Array2::eye(members);
      x += &w;
      posterior = apply_transition(prior, x.view())?;

      info!("ies iteration {}: |W|_F = {:.3e}",
            iteration, frobenius_norm(w.view()));
    }
    Ok(posterior)
  }
}

pub fn frobenius_norm(a: ArrayView2<f64>) -> f64 {
  a.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Column-wise (over members) mean of a parameter ensemble.
pub fn ensemble_mean(a: ArrayView2<f64>) -> Array1<f64> {
  a.mean_axis(Axis(1)).expect("ensemble has at least one member")
}

/// Mean absolute error of the ensemble-mean parameters against truth.
pub fn mean_abs_error(a: ArrayView2<f64>, truth: ArrayView1<f64>) -> f64 {
  let mean = ensemble_mean(a);
  assert_eq!(mean.len(), truth.len());
  mean.iter()
    .zip(truth.iter())
    .map(|(m, t)| (m - t).abs())
    .sum::<f64>() / truth.len() as f64
}

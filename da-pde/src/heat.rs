
//! Explicit forward-Euler integration of the 2-D diffusion equation
//! with injected Gaussian process noise, one trajectory per call.

use std::ops::Range;

use ndarray::{s, Array2, Array3, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::field::GridField;

/// Five-point-stencil stepper for `du/dt = alpha(x, y) * laplacian(u)`.
///
/// Stability is the caller's contract: `dt` must not exceed
/// `dx^2 / (4 * max(alpha))` (see [`Diffusion2d::max_stable_dt`]).
/// Violating the bound yields unbounded, non-physical output rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diffusion2d {
  pub dx: f64,
  pub dt: f64,
  /// Stddev of the process noise added to every interior cell after
  /// each deterministic update. Must be non-negative; zero disables
  /// the noise.
  pub noise_scale: f64,
}

impl Diffusion2d {
  /// Largest forward-Euler step the stencil tolerates for this
  /// diffusivity field.
  pub fn max_stable_dt(alpha: ArrayView2<f64>, dx: f64) -> f64 {
    let max = alpha.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    dx * dx / (4.0 * max)
  }

  /// Integrate from `initial`, producing one frame per step of the
  /// half-open `steps` range. Frame 0 is the initial field. Edge cells
  /// keep their pinned values in every frame; neither the stencil nor
  /// the process noise touches them.
  pub fn integrate<R>(&self, initial: &GridField, alpha: ArrayView2<f64>,
                      steps: Range<usize>, rng: &mut R) -> Array3<f64>
    where R: Rng,
  {
    let (ny, nx) = initial.dim();
    assert_eq!(alpha.dim(), (ny, nx),
               "diffusivity shape {:?} does not match field shape {:?}",
               alpha.dim(), initial.dim());

    let frames = steps.end.saturating_sub(steps.start);
    let mut trajectory = Array3::zeros((frames, ny, nx));
    if frames == 0 {
      return trajectory;
    }

    let noise = Normal::new(0.0, self.noise_scale)
      .expect("noise scale must be finite and non-negative");
    let r = self.dt / (self.dx * self.dx);

    let mut u = initial.values().to_owned();
    trajectory.slice_mut(s![0, .., ..]).assign(&u);

    let mut next: Array2<f64> = u.clone();
    for k in 1..frames {
      for i in 1..ny - 1 {
        for j in 1..nx - 1 {
          let lap = u[[i + 1, j]] + u[[i - 1, j]]
            + u[[i, j + 1]] + u[[i, j - 1]]
            - 4.0 * u[[i, j]];
          next[[i, j]] = u[[i, j]] + r * alpha[[i, j]] * lap + noise.sample(rng);
        }
      }
      trajectory.slice_mut(s![k, .., ..]).assign(&next);
      std::mem::swap(&mut u, &mut next);
    }

    trajectory
  }
}

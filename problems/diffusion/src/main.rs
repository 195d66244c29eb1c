
use da_core::RngStreams;
use da_pde::{Boundary, Diffusion2d};
use da_smoothing::ObservationSet;
use diffusion::{ensemble_mean, mean_abs_error, Experiment};
use log::info;
use ndarray::Array2;

const NY: usize = 10;
const NX: usize = 10;
const STEPS: usize = 50;
const MEMBERS: usize = 50;
const MASTER_SEED: u64 = 1;

const DX: f64 = 1.0;
/// Stable for any diffusivity up to 10.
const DT: f64 = DX * DX / (4.0 * 10.0);
const PROCESS_NOISE: f64 = 0.05;
const OBS_STDDEV: f64 = 0.5;

const PRIOR_MEAN: f64 = 2.0;
const PRIOR_STDDEV: f64 = 0.8;

const IES_ITERATIONS: usize = 4;
const IES_STEP_LENGTH: f64 = 0.6;

fn main() {
  env_logger::init();

  let streams = RngStreams::new(MASTER_SEED);
  let experiment = Experiment {
    ny: NY,
    nx: NX,
    steps: STEPS,
    integrator: Diffusion2d {
      dx: DX,
      dt: DT,
      noise_scale: PROCESS_NOISE,
    },
    boundary: Boundary::uniform(0.0),
    initial_interior: 100.0,
  };

  // True diffusivity: a smooth left-to-right gradient, unknown to the
  // ensemble.
  let alpha_true = Array2::from_shape_fn((NY, NX), |(_, j)| {
    2.0 + 6.0 * j as f64 / (NX - 1) as f64
  });
  let truth = experiment.truth_trajectory(alpha_true.view(), &streams);

  let sites = [(NX / 2, NY / 2), (2, 2), (NX - 3, NY - 3)];
  let times = [10, 20, 30, 40, 49];
  let observations = ObservationSet::sample_trajectory(
    truth.view(), &sites, &times, OBS_STDDEV,
    &mut streams.measurements())
    .expect("observation sampling");
  info!("assimilating {} observations with {} members",
        observations.len(), MEMBERS);

  let prior = experiment.prior_ensemble(MEMBERS, PRIOR_MEAN, PRIOR_STDDEV,
                                        &streams);
  let alpha_flat = alpha_true.iter().cloned().collect::<ndarray::Array1<f64>>();

  let prior_err = mean_abs_error(prior.view(), alpha_flat.view());
  info!("prior mean abs error: {:.4}", prior_err);

  let posterior_es = experiment
    .assimilate_es(prior.view(), &observations, &streams)
    .expect("es analysis");
  let es_err = mean_abs_error(posterior_es.view(), alpha_flat.view());
  info!("es posterior mean abs error: {:.4}", es_err);

  let posterior_ies = experiment
    .assimilate_ies(prior.view(), &observations, &streams,
                    IES_ITERATIONS, IES_STEP_LENGTH)
    .expect("ies analysis");
  let ies_err = mean_abs_error(posterior_ies.view(), alpha_flat.view());
  info!("ies posterior mean abs error: {:.4}", ies_err);

  let center = (NY / 2) * NX + NX / 2;
  println!("true alpha at center:          {:.3}", alpha_flat[center]);
  println!("prior mean at center:          {:.3}",
           ensemble_mean(prior.view())[center]);
  println!("es posterior mean at center:   {:.3}",
           ensemble_mean(posterior_es.view())[center]);
  println!("ies posterior mean at center:  {:.3}",
           ensemble_mean(posterior_ies.view())[center]);
  println!("mean abs error: prior {:.4}, es {:.4}, ies {:.4}",
           prior_err, es_err, ies_err);
}

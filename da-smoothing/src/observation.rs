
//! Point-in-time, point-in-space measurements. The order of records
//! fixes the row layout of every Y/D matrix built against the set.

use da_core::{Error, Result};
use ndarray::{Array1, ArrayView3};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// One scalar measurement: a grid site, a time step, the measured
/// value and its error stddev.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
  pub time_index: usize,
  pub x: usize,
  pub y: usize,
  pub value: f64,
  pub stddev: f64,
}

/// Immutable ordered sequence of measurements. Row `i` of Y and D
/// refers to record `i`; the diagonal observation-error covariance is
/// the `variances` vector in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
  records: Vec<Observation>,
}

impl ObservationSet {
  pub fn new(records: Vec<Observation>) -> Result<ObservationSet> {
    for (index, r) in records.iter().enumerate() {
      if !(r.stddev > 0.0) {
        return Err(Error::NonPositiveStddev {
          index,
          stddev: r.stddev,
        });
      }
    }
    Ok(ObservationSet { records })
  }

  pub fn empty() -> ObservationSet {
    ObservationSet {
      records: Vec::new(),
    }
  }

  /// Twin-experiment constructor: sample the true trajectory at every
  /// (site, time) pair, perturbing each value with N(0, stddev)
  /// measurement noise. Sites are `(x, y)` pairs; the trajectory is
  /// indexed `[time, y, x]`.
  pub fn sample_trajectory<R>(truth: ArrayView3<f64>,
                              sites: &[(usize, usize)],
                              times: &[usize],
                              stddev: f64,
                              rng: &mut R) -> Result<ObservationSet>
    where R: Rng,
  {
    if !(stddev > 0.0) {
      return Err(Error::NonPositiveStddev { index: 0, stddev });
    }
    let (nt, ny, nx) = truth.dim();
    let noise = Normal::new(0.0, stddev).expect("stddev checked above");

    let mut records = Vec::with_capacity(sites.len() * times.len());
    for &time_index in times {
      if time_index >= nt {
        return Err(Error::IndexOutOfBounds {
          context: "observation time index",
          index: time_index,
          bound: nt,
        });
      }
      for &(x, y) in sites {
        if x >= nx {
          return Err(Error::IndexOutOfBounds {
            context: "observation site x",
            index: x,
            bound: nx,
          });
        }
        if y >= ny {
          return Err(Error::IndexOutOfBounds {
            context: "observation site y",
            index: y,
            bound: ny,
          });
        }
        records.push(Observation {
          time_index,
          x,
          y,
          value: truth[[time_index, y, x]] + noise.sample(rng),
          stddev,
        });
      }
    }
    Ok(ObservationSet { records })
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn get(&self, i: usize) -> Option<&Observation> {
    self.records.get(i)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Observation> {
    self.records.iter()
  }

  /// Measured values, one per row of Y/D.
  pub fn values(&self) -> Array1<f64> {
    self.records.iter().map(|r| r.value).collect()
  }

  pub fn stddevs(&self) -> Array1<f64> {
    self.records.iter().map(|r| r.stddev).collect()
  }

  /// Diagonal of the observation-error covariance.
  pub fn variances(&self) -> Array1<f64> {
    self.records.iter().map(|r| r.stddev * r.stddev).collect()
  }
}

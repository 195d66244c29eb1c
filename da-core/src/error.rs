
use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Precondition violations. Every variant is reported before any
/// computation touches the inputs; no partial results are returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("ensemble must have at least two members, got {0}")]
  EnsembleTooSmall(usize),
  #[error("{context}: expected shape {expected}, got {got}")]
  ShapeMismatch {
    context: &'static str,
    expected: String,
    got: String,
  },
  #[error("observation {index} has non-positive stddev {stddev}")]
  NonPositiveStddev { index: usize, stddev: f64 },
  #[error("observation {index} has non-positive variance {variance}")]
  NonPositiveVariance { index: usize, variance: f64 },
  #[error("step length must lie in (0, 1], got {0}")]
  StepLength(f64),
  #[error("{context}: index {index} out of bounds ({bound})")]
  IndexOutOfBounds {
    context: &'static str,
    index: usize,
    bound: usize,
  },
}

impl Error {
  pub fn shape_mismatch<E, G>(context: &'static str, expected: E, got: G) -> Error
    where E: ::std::fmt::Debug,
          G: ::std::fmt::Debug,
  {
    Error::ShapeMismatch {
      context,
      expected: format!("{:?}", expected),
      got: format!("{:?}", got),
    }
  }
}

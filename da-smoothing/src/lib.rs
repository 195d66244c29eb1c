
//! Ensemble smoother analysis steps (ES and the Gauss-Newton IES) plus
//! the matrix plumbing around them: observation bookkeeping, the
//! perturbed-observation matrix D and the predicted-response matrix Y.
//!
//! Only diagonal observation-error covariances are supported; both
//! smoothers run the "exact inversion" scheme, rescaling anomalies and
//! innovations by the inverse square root of the variances so the
//! effective covariance is the identity and the update can be assembled
//! in the ensemble subspace.

pub use da_core::{Error, Result, RngStreams};

pub use ensemble::{apply_transition, perturbed_observations, responses};
pub use observation::{Observation, ObservationSet};
pub use smoother::{es, ies, Truncation};

pub mod ensemble;
pub mod observation;
pub mod smoother;


//! Shared foundation for the ensemble smoother crates: the error
//! taxonomy and deterministic random-stream splitting.

pub use error::{Error, Result};
pub use streams::RngStreams;

pub mod error;
pub mod streams;

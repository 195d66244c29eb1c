
//! Stochastic forward model: a dense 2-D field with pinned Dirichlet
//! edges and an explicit finite-difference integrator for the
//! diffusion equation with spatially varying diffusivity.

pub use field::{Boundary, GridField};
pub use heat::Diffusion2d;

pub mod field;
pub mod heat;

//! CremaLB: a CPU lattice Boltzmann core.
//!
//! The crate is organised around four layers:
//!
//! * [`descriptor`] — compile-time velocity-set schemas (D2Q9, D3Q19, ...),
//!   selected through const generics so the inner loops see `q`, `c` and `t`
//!   as constants.
//! * [`dynamics`] — the per-cell collision operator family. Every cell of a
//!   lattice can carry its own operator, including composite wrappers that
//!   complete missing boundary populations before delegating to a wrapped
//!   bulk operator.
//! * [`lattice`] — `BlockLattice2D`/`BlockLattice3D`: contiguous cell grids
//!   with in-place pair-swap streaming and a cache-blocked fused
//!   collide-and-stream kernel.
//! * [`boundary`] + [`processor`] — the boundary-condition instantiation
//!   framework (one call installs the right composite dynamics and
//!   finite-difference processors on every face, edge and corner of the
//!   bounding box) and the data-processor pipeline that runs after each step.
//!
//! [`multiphase`] adds Shan-Chen inter-particle force couplers, and
//! [`setup`]/[`fields`] hold the usual initial-condition helpers.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod descriptor;
pub mod lb;
pub mod cell;
pub mod dynamics;
pub mod lattice;
pub mod processor;
pub mod boundary;
pub mod multiphase;
pub mod fields;
pub mod setup;
pub mod utils;

/// Floating-point type used throughout the solver. One concrete type per
/// build; the numerics below assume at least double precision.
pub type Scalar = f64;

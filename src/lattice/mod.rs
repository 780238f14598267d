//! Atomic block lattices: contiguous grids of cells with in-place streaming.

pub mod lattice2d;
pub mod lattice3d;

pub use lattice2d::BlockLattice2D;
pub use lattice3d::BlockLattice3D;

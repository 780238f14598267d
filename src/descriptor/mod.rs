//! Compile-time velocity-set schemas.
//!
//! A descriptor pins down everything the kernels need to know about a
//! velocity set: direction count `Q`, space dimension `D`, the integer
//! lattice vectors, the quadrature weights, the sound speed and the layout of
//! the per-cell external scalars. Descriptors are zero-sized types; the
//! const generics `<D, Q, E>` let cells and lattices store populations in
//! fixed-size arrays and let the compiler unroll the per-direction loops.
//!
//! Ordering convention (required by the pair-swap streaming and by
//! `opposite`): `C[0]` is the rest vector and `C[i + Q/2] = -C[i]` for
//! `1 <= i <= Q/2`, with the first half pointing into the lexicographically
//! negative half-space.

use crate::Scalar;

pub mod d2;
pub mod d3;

pub use d2::{AdvectionD2Q5, D2Q9, ForcedD2Q9, MrtD2Q9, ShanChenD2Q9};
pub use d3::{AdvectionD3Q7, D3Q13, D3Q19, ForcedD3Q19, ShanChenD3Q19};

/// Moment-space tables of a multiple-relaxation-time descriptor.
///
/// `m` maps populations to moments, `inv_m` is its inverse, and `s` is the
/// base relaxation vector whose shear rows are replaced by the dynamic omega
/// and whose bulk row by lambda at collision time.
#[derive(Debug)]
pub struct MrtData<const Q: usize> {
    pub m: [[Scalar; Q]; Q],
    pub inv_m: [[Scalar; Q]; Q],
    pub s: [Scalar; Q],
    pub shear_indexes: &'static [usize],
    pub bulk_index: usize,
}

/// Compile-time schema of a velocity set.
///
/// Indexing into `C` and `W` is never bounds-checked by the callers, which
/// loop over `0..Q`; the tables must therefore be complete.
pub trait Descriptor<const D: usize, const Q: usize, const E: usize>:
    Copy + Clone + Default + 'static
{
    /// Discrete velocities; `C[0]` is the rest vector.
    const C: [[i64; D]; Q];
    /// Quadrature weights, summing to one.
    const W: [Scalar; Q];
    /// Speed of sound squared.
    const CS2: Scalar;
    const INV_CS2: Scalar;
    /// Range of the lattice vectors; one for all nearest-neighbour sets.
    const VICINITY: i64 = 1;

    /// Offset of the body-force vector (length `D`) in the external scalars.
    const FORCE_OFFSET: Option<usize> = None;
    /// Offset of the cached density (length 1).
    const DENSITY_OFFSET: Option<usize> = None;
    /// Offset of the cached momentum (length `D`).
    const MOMENTUM_OFFSET: Option<usize> = None;
    /// Offset of the advecting velocity (length `D`), for passive scalars.
    const VELOCITY_OFFSET: Option<usize> = None;

    /// Moment-space tables, present on MRT descriptors only.
    const MRT: Option<&'static MrtData<Q>> = None;

    /// Algebraic scaling constant; one for the standard lattices here.
    const SKORDOS_FACTOR: Scalar = 1.0;

    #[inline]
    fn opposite(i: usize) -> usize {
        if i == 0 {
            0
        } else if i <= Q / 2 {
            i + Q / 2
        } else {
            i - Q / 2
        }
    }

    #[inline]
    fn rho_bar(rho: Scalar) -> Scalar {
        rho - 1.0
    }

    #[inline]
    fn full_rho(rho_bar: Scalar) -> Scalar {
        rho_bar + 1.0
    }

    #[inline]
    fn inv_rho(rho_bar: Scalar) -> Scalar {
        1.0 / (rho_bar + 1.0)
    }
}

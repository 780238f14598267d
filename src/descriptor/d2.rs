//! Two-dimensional velocity sets.

use super::{Descriptor, MrtData};
use crate::Scalar;

const D2Q9_C: [[i64; 2]; 9] = [
    [0, 0],
    [-1, 1],
    [-1, 0],
    [-1, -1],
    [0, -1],
    [1, -1],
    [1, 0],
    [1, 1],
    [0, 1],
];

const D2Q9_W: [Scalar; 9] = [
    4.0 / 9.0,
    1.0 / 36.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 9.0,
];

/// Standard D2Q9 set, no external scalars.
#[derive(Debug, Clone, Copy, Default)]
pub struct D2Q9;

impl Descriptor<2, 9, 0> for D2Q9 {
    const C: [[i64; 2]; 9] = D2Q9_C;
    const W: [Scalar; 9] = D2Q9_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
}

/// D2Q9 with a per-cell body force.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForcedD2Q9;

impl Descriptor<2, 9, 2> for ForcedD2Q9 {
    const C: [[i64; 2]; 9] = D2Q9_C;
    const W: [Scalar; 9] = D2Q9_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const FORCE_OFFSET: Option<usize> = Some(0);
}

/// D2Q9 with force, density cache and momentum cache, for Shan-Chen
/// multiphase coupling.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShanChenD2Q9;

impl Descriptor<2, 9, 5> for ShanChenD2Q9 {
    const C: [[i64; 2]; 9] = D2Q9_C;
    const W: [Scalar; 9] = D2Q9_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const FORCE_OFFSET: Option<usize> = Some(0);
    const DENSITY_OFFSET: Option<usize> = Some(2);
    const MOMENTUM_OFFSET: Option<usize> = Some(3);
}

// Moment basis after Yu, Luo and Shi: density, energy, energy squared,
// momentum and heat flux per axis, diagonal and off-diagonal stress. The
// rows are expressed in this crate's velocity ordering.
static MRT_D2Q9_DATA: MrtData<9> = MrtData {
    m: [
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        [-4.0, 2.0, -1.0, 2.0, -1.0, 2.0, -1.0, 2.0, -1.0],
        [4.0, 1.0, -2.0, 1.0, -2.0, 1.0, -2.0, 1.0, -2.0],
        [0.0, -1.0, -1.0, -1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        [0.0, -1.0, 2.0, -1.0, 0.0, 1.0, -2.0, 1.0, 0.0],
        [0.0, 1.0, 0.0, -1.0, -1.0, -1.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 0.0, -1.0, 2.0, -1.0, 0.0, 1.0, -2.0],
        [0.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
        [0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0],
    ],
    // The rows of m are mutually orthogonal; the inverse is the transpose
    // with each column divided by the row norm (9, 36, 36, 6, 12, 6, 12, 4, 4).
    inv_m: [
        [1.0 / 9.0, -1.0 / 9.0, 1.0 / 9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [
            1.0 / 9.0,
            1.0 / 18.0,
            1.0 / 36.0,
            -1.0 / 6.0,
            -1.0 / 12.0,
            1.0 / 6.0,
            1.0 / 12.0,
            0.0,
            -1.0 / 4.0,
        ],
        [
            1.0 / 9.0,
            -1.0 / 36.0,
            -1.0 / 18.0,
            -1.0 / 6.0,
            1.0 / 6.0,
            0.0,
            0.0,
            1.0 / 4.0,
            0.0,
        ],
        [
            1.0 / 9.0,
            1.0 / 18.0,
            1.0 / 36.0,
            -1.0 / 6.0,
            -1.0 / 12.0,
            -1.0 / 6.0,
            -1.0 / 12.0,
            0.0,
            1.0 / 4.0,
        ],
        [
            1.0 / 9.0,
            -1.0 / 36.0,
            -1.0 / 18.0,
            0.0,
            0.0,
            -1.0 / 6.0,
            1.0 / 6.0,
            -1.0 / 4.0,
            0.0,
        ],
        [
            1.0 / 9.0,
            1.0 / 18.0,
            1.0 / 36.0,
            1.0 / 6.0,
            1.0 / 12.0,
            -1.0 / 6.0,
            -1.0 / 12.0,
            0.0,
            -1.0 / 4.0,
        ],
        [
            1.0 / 9.0,
            -1.0 / 36.0,
            -1.0 / 18.0,
            1.0 / 6.0,
            -1.0 / 6.0,
            0.0,
            0.0,
            1.0 / 4.0,
            0.0,
        ],
        [
            1.0 / 9.0,
            1.0 / 18.0,
            1.0 / 36.0,
            1.0 / 6.0,
            1.0 / 12.0,
            1.0 / 6.0,
            1.0 / 12.0,
            0.0,
            1.0 / 4.0,
        ],
        [
            1.0 / 9.0,
            -1.0 / 36.0,
            -1.0 / 18.0,
            0.0,
            0.0,
            1.0 / 6.0,
            -1.0 / 6.0,
            -1.0 / 4.0,
            0.0,
        ],
    ],
    // Conserved moments relax at rate zero; the energy and heat-flux rates
    // follow the reference above. Rows 7 and 8 carry the shear viscosity and
    // are set to the dynamic omega, row 2 to the bulk relaxation lambda.
    s: [0.0, 1.1, 1.1, 0.0, 1.1, 0.0, 1.1, 0.0, 0.0],
    shear_indexes: &[7, 8],
    bulk_index: 2,
};

/// D2Q9 with moment-space (MRT) relaxation tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MrtD2Q9;

impl Descriptor<2, 9, 0> for MrtD2Q9 {
    const C: [[i64; 2]; 9] = D2Q9_C;
    const W: [Scalar; 9] = D2Q9_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const MRT: Option<&'static MrtData<9>> = Some(&MRT_D2Q9_DATA);
}

/// D2Q5 advection-diffusion set; the advecting velocity lives in the
/// external scalars.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvectionD2Q5;

impl Descriptor<2, 5, 2> for AdvectionD2Q5 {
    const C: [[i64; 2]; 5] = [[0, 0], [-1, 0], [0, -1], [1, 0], [0, 1]];
    const W: [Scalar; 5] = [1.0 / 3.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0];
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const VELOCITY_OFFSET: Option<usize> = Some(0);
}

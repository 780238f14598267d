//! Three-dimensional velocity sets.

use super::Descriptor;
use crate::Scalar;

const D3Q19_C: [[i64; 3]; 19] = [
    [0, 0, 0],
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [-1, -1, 0],
    [-1, 1, 0],
    [-1, 0, -1],
    [-1, 0, 1],
    [0, -1, -1],
    [0, -1, 1],
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 1, 0],
    [1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [0, 1, 1],
    [0, 1, -1],
];

const D3Q19_W: [Scalar; 19] = [
    1.0 / 3.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Standard D3Q19 set.
#[derive(Debug, Clone, Copy, Default)]
pub struct D3Q19;

impl Descriptor<3, 19, 0> for D3Q19 {
    const C: [[i64; 3]; 19] = D3Q19_C;
    const W: [Scalar; 19] = D3Q19_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
}

/// D3Q19 with a per-cell body force.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForcedD3Q19;

impl Descriptor<3, 19, 3> for ForcedD3Q19 {
    const C: [[i64; 3]; 19] = D3Q19_C;
    const W: [Scalar; 19] = D3Q19_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const FORCE_OFFSET: Option<usize> = Some(0);
}

/// D3Q19 with force, density cache and momentum cache for Shan-Chen
/// coupling.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShanChenD3Q19;

impl Descriptor<3, 19, 7> for ShanChenD3Q19 {
    const C: [[i64; 3]; 19] = D3Q19_C;
    const W: [Scalar; 19] = D3Q19_W;
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
    const FORCE_OFFSET: Option<usize> = Some(0);
    const DENSITY_OFFSET: Option<usize> = Some(3);
    const MOMENTUM_OFFSET: Option<usize> = Some(4);
}

/// D3Q13: rest vector plus the twelve edge vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct D3Q13;

impl Descriptor<3, 13, 0> for D3Q13 {
    const C: [[i64; 3]; 13] = [
        [0, 0, 0],
        [-1, -1, 0],
        [-1, 1, 0],
        [-1, 0, -1],
        [-1, 0, 1],
        [0, -1, -1],
        [0, -1, 1],
        [1, 1, 0],
        [1, -1, 0],
        [1, 0, 1],
        [1, 0, -1],
        [0, 1, 1],
        [0, 1, -1],
    ];
    const W: [Scalar; 13] = [
        1.0 / 2.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
    ];
    const CS2: Scalar = 1.0 / 3.0;
    const INV_CS2: Scalar = 3.0;
}

/// D3Q7 advection-diffusion set.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvectionD3Q7;

impl Descriptor<3, 7, 3> for AdvectionD3Q7 {
    const C: [[i64; 3]; 7] = [
        [0, 0, 0],
        [-1, 0, 0],
        [0, -1, 0],
        [0, 0, -1],
        [1, 0, 0],
        [0, 1, 0],
        [0, 0, 1],
    ];
    const W: [Scalar; 7] = [
        1.0 / 4.0,
        1.0 / 8.0,
        1.0 / 8.0,
        1.0 / 8.0,
        1.0 / 8.0,
        1.0 / 8.0,
        1.0 / 8.0,
    ];
    const CS2: Scalar = 1.0 / 4.0;
    const INV_CS2: Scalar = 4.0;
    const VELOCITY_OFFSET: Option<usize> = Some(0);
}

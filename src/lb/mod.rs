//! Per-direction kernels shared by every collision operator.
//!
//! These functions are the performance-sensitive inner loops: they take the
//! population array and the moment values directly, never a cell, and are
//! monomorphised per descriptor so that `Q`, `C` and `W` are compile-time
//! constants.

pub mod advection;
pub mod force;
pub mod index;
pub mod moments;
pub mod mrt;
pub mod off_equilibrium;

use crate::descriptor::Descriptor;
use crate::Scalar;

/// Upper-triangular, row-major storage for the symmetric stress tensor.
/// Only the first `d(d+1)/2` entries are meaningful.
pub type StressVector = [Scalar; 6];

/// Number of independent entries of a symmetric rank-2 tensor in `d`
/// dimensions.
#[inline]
pub const fn tensor_size(d: usize) -> usize {
    d * (d + 1) / 2
}

/// Indices into [`StressVector`] for 2D tensors.
pub mod sym2 {
    pub const XX: usize = 0;
    pub const XY: usize = 1;
    pub const YY: usize = 2;
}

/// Indices into [`StressVector`] for 3D tensors.
pub mod sym3 {
    pub const XX: usize = 0;
    pub const XY: usize = 1;
    pub const XZ: usize = 2;
    pub const YY: usize = 3;
    pub const YZ: usize = 4;
    pub const ZZ: usize = 5;
}

#[inline]
pub fn norm_sqr<const D: usize>(v: &[Scalar; D]) -> Scalar {
    let mut acc = 0.0;
    for k in 0..D {
        acc += v[k] * v[k];
    }
    acc
}

/// Second-order (Ma^2) truncated Maxwellian, in rescaled-density form.
#[inline]
pub fn bgk_equilibrium<Dsc, const D: usize, const Q: usize, const E: usize>(
    i: usize,
    rho_bar: Scalar,
    inv_rho: Scalar,
    j: &[Scalar; D],
    j_sqr: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let mut c_j = 0.0;
    for k in 0..D {
        c_j += Dsc::C[i][k] as Scalar * j[k];
    }
    Dsc::W[i]
        * (rho_bar
            + Dsc::INV_CS2 * c_j
            + Dsc::INV_CS2 / 2.0 * inv_rho * (Dsc::INV_CS2 * c_j * c_j - j_sqr))
}

/// BGK collision; returns `uSqr` for the statistics.
#[inline]
pub fn bgk_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j);
    for i in 0..Q {
        f[i] *= 1.0 - omega;
        f[i] += omega * bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, inv_rho, j, j_sqr);
    }
    j_sqr * inv_rho * inv_rho
}

/// Incompressible BGK: the Ma^2 term is preceded by 1 instead of 1/rho.
#[inline]
pub fn bgk_inc_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let j_sqr = norm_sqr(j);
    for i in 0..Q {
        f[i] *= 1.0 - omega;
        f[i] += omega * bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, 1.0, j, j_sqr);
    }
    j_sqr
}

/// Regularized (RLB) collision: rebuild every population from the leading
/// moments, keeping `(1-omega)` of the off-equilibrium stress. Exploits
/// `fneq(i) == fneq(opposite(i))`.
#[inline]
pub fn rlb_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    pi_neq: &StressVector,
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j);
    f[0] = bgk_equilibrium::<Dsc, D, Q, E>(0, rho_bar, inv_rho, j, j_sqr)
        + (1.0 - omega) * off_equilibrium::fneq_from_pi::<Dsc, D, Q, E>(0, pi_neq);
    for i in 1..=Q / 2 {
        f[i] = bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, inv_rho, j, j_sqr);
        f[i + Q / 2] = bgk_equilibrium::<Dsc, D, Q, E>(i + Q / 2, rho_bar, inv_rho, j, j_sqr);
        let f_neq = (1.0 - omega) * off_equilibrium::fneq_from_pi::<Dsc, D, Q, E>(i, pi_neq);
        f[i] += f_neq;
        f[i + Q / 2] += f_neq;
    }
    j_sqr * inv_rho * inv_rho
}

/// Constant-mean-density BGK collision: rescales towards the target average
/// density while relaxing.
#[inline]
pub fn bgk_const_rho_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    ratio_rho: Scalar,
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j);
    for i in 0..Q {
        let f_eq = bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, inv_rho, j, j_sqr);
        f[i] = ratio_rho * f_eq + Dsc::W[i] * (ratio_rho - 1.0) + (1.0 - omega) * (f[i] - f_eq);
    }
    j_sqr * inv_rho * inv_rho
}

/// Full regularization: `f = feq + fneq(Pi)`, no relaxation factor. This is
/// the completion used by boundary closures and by order-1 recomposition.
#[inline]
pub fn regularize<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    j_sqr: Scalar,
    pi_neq: &StressVector,
) where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    f[0] = bgk_equilibrium::<Dsc, D, Q, E>(0, rho_bar, inv_rho, j, j_sqr)
        + off_equilibrium::fneq_from_pi::<Dsc, D, Q, E>(0, pi_neq);
    for i in 1..=Q / 2 {
        f[i] = bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, inv_rho, j, j_sqr);
        f[i + Q / 2] = bgk_equilibrium::<Dsc, D, Q, E>(i + Q / 2, rho_bar, inv_rho, j, j_sqr);
        let f_neq = off_equilibrium::fneq_from_pi::<Dsc, D, Q, E>(i, pi_neq);
        f[i] += f_neq;
        f[i + Q / 2] += f_neq;
    }
}

/// Closed-form Smagorinsky effective relaxation rate.
///
/// The exact root of the subgrid closure is expanded to second order:
/// `omega_eff = omega0 (1 - alpha |Pi| + 2 alpha^2 |Pi|^2)` with
/// `alpha = prefactor / rho`. The truncated form is the contract; no Newton
/// iteration.
pub mod smagorinsky {
    use super::*;

    #[inline]
    pub fn prefactor<Dsc, const D: usize, const Q: usize, const E: usize>(
        omega0: Scalar,
        c_smago: Scalar,
    ) -> Scalar
    where
        Dsc: Descriptor<D, Q, E>,
    {
        let x = c_smago * omega0 * Dsc::INV_CS2;
        0.5 * x * x
    }

    #[inline]
    pub fn recompute_prefactor(old_omega0: Scalar, new_omega0: Scalar, old_prefactor: Scalar) -> Scalar {
        old_prefactor * (new_omega0 / old_omega0) * (new_omega0 / old_omega0)
    }

    #[inline]
    pub fn effective_omega<Dsc, const D: usize, const Q: usize, const E: usize>(
        omega0: Scalar,
        prefactor: Scalar,
        rho_bar: Scalar,
        pi_neq: &StressVector,
    ) -> Scalar
    where
        Dsc: Descriptor<D, Q, E>,
    {
        let pi_norm_sqr = tensor_norm_sqr::<D>(pi_neq);
        let pi_norm = pi_norm_sqr.sqrt();
        let alpha = prefactor * Dsc::inv_rho(rho_bar);
        let linear = alpha * pi_norm;
        let square = 2.0 * alpha * alpha * pi_norm_sqr;
        omega0 * (1.0 - linear + square)
    }
}

/// Frobenius norm squared of a symmetric tensor in upper-triangular storage;
/// off-diagonal entries count twice.
#[inline]
pub fn tensor_norm_sqr<const D: usize>(pi: &StressVector) -> Scalar {
    let mut acc = 0.0;
    let mut ind = 0;
    for a in 0..D {
        acc += pi[ind] * pi[ind];
        ind += 1;
        for _b in (a + 1)..D {
            acc += 2.0 * pi[ind] * pi[ind];
            ind += 1;
        }
    }
    acc
}

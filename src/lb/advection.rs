//! First-order (advection-diffusion) kernels for passive-scalar lattices.
//!
//! The advected density plays the role of rho; the advecting velocity is
//! imposed through the external velocity slot, so the equilibrium is linear
//! in `j_eq = rho * u_fluid`.

use super::norm_sqr;
use crate::descriptor::Descriptor;
use crate::Scalar;

/// First-order equilibrium `t_i (rho_bar + invCs2 c_i . j_eq)`.
#[inline]
pub fn ma1_equilibrium<Dsc, const D: usize, const Q: usize, const E: usize>(
    i: usize,
    rho_bar: Scalar,
    j_eq: &[Scalar; D],
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let mut c_j = 0.0;
    for k in 0..D {
        c_j += Dsc::C[i][k] as Scalar * j_eq[k];
    }
    Dsc::W[i] * (rho_bar + Dsc::INV_CS2 * c_j)
}

/// Equilibrium first moment from the external velocity slot.
#[inline]
pub fn get_j_eq<Dsc, const D: usize, const Q: usize, const E: usize>(
    external: &[Scalar; E],
    rho_bar: Scalar,
) -> [Scalar; D]
where
    Dsc: Descriptor<D, Q, E>,
{
    let offset = Dsc::VELOCITY_OFFSET
        .expect("advection-diffusion dynamics requires an external velocity field");
    let rho = Dsc::full_rho(rho_bar);
    let mut j_eq = [0.0; D];
    for k in 0..D {
        j_eq[k] = rho * external[offset + k];
    }
    j_eq
}

/// BGK relaxation towards the first-order equilibrium (no correction term).
#[inline]
pub fn no_corr_bgk_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j_eq: &[Scalar; D],
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j_eq);
    for i in 0..Q {
        f[i] *= 1.0 - omega;
        f[i] += omega * ma1_equilibrium::<Dsc, D, Q, E>(i, rho_bar, j_eq);
    }
    j_sqr * inv_rho * inv_rho
}

/// Regularized relaxation: rebuild from the equilibrium plus `(1-omega)` of
/// the off-equilibrium first moment.
#[inline]
pub fn no_corr_rlb_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j_eq: &[Scalar; D],
    j_neq: &[Scalar; D],
    omega: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j_eq);
    for i in 0..Q {
        f[i] = ma1_equilibrium::<Dsc, D, Q, E>(i, rho_bar, j_eq)
            + (1.0 - omega) * fneq_from_j::<Dsc, D, Q, E>(i, j_neq);
    }
    j_sqr * inv_rho * inv_rho
}

/// Off-equilibrium part reconstructed from the first moment only.
#[inline]
pub fn fneq_from_j<Dsc, const D: usize, const Q: usize, const E: usize>(
    i: usize,
    j_neq: &[Scalar; D],
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let mut c_j = 0.0;
    for k in 0..D {
        c_j += Dsc::C[i][k] as Scalar * j_neq[k];
    }
    Dsc::W[i] * Dsc::INV_CS2 * c_j
}

/// Project the populations onto equilibrium plus first-moment
/// off-equilibrium.
#[inline]
pub fn regularize_ma1<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j_adv: &[Scalar; D],
    j_eq: &[Scalar; D],
) where
    Dsc: Descriptor<D, Q, E>,
{
    let mut j_neq = [0.0; D];
    for k in 0..D {
        j_neq[k] = j_adv[k] - j_eq[k];
    }
    for i in 0..Q {
        f[i] = ma1_equilibrium::<Dsc, D, Q, E>(i, rho_bar, j_eq)
            + fneq_from_j::<Dsc, D, Q, E>(i, &j_neq);
    }
}

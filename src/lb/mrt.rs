//! Moment-space (multiple-relaxation-time) collision.

use super::{bgk_equilibrium, norm_sqr};
use crate::descriptor::Descriptor;
use crate::Scalar;

/// MRT collision step; returns `uSqr` for the statistics.
///
/// Populations are mapped to moments through the descriptor matrix `M` (the
/// `+t_i` shift of the rescaled populations cancels in the difference
/// `m - m_eq`), the off-equilibrium moments relax component-wise, and the
/// result is mapped back through `M^-1`. The shear rows of the relaxation
/// vector are set to `omega`, the bulk row to `lambda`; the remaining rows
/// keep the descriptor's base rates. Panics when the descriptor carries no
/// MRT tables.
pub fn mrt_collision<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    rho_bar: Scalar,
    j: &[Scalar; D],
    omega: Scalar,
    lambda: Scalar,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    let mrt = Dsc::MRT
        .expect("MRT collision requires a descriptor with moment-space tables");

    let inv_rho = Dsc::inv_rho(rho_bar);
    let j_sqr = norm_sqr(j);

    // Relaxation rates for this collision.
    let mut rt = mrt.s;
    for &i in mrt.shear_indexes {
        rt[i] = omega;
    }
    rt[mrt.bulk_index] = lambda;

    // Off-equilibrium part in population space, then in moment space.
    let mut f_neq = [0.0; Q];
    for i in 0..Q {
        f_neq[i] = f[i] - bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, inv_rho, j, j_sqr);
    }
    let mut m_neq = [0.0; Q];
    for k in 0..Q {
        let mut acc = 0.0;
        for i in 0..Q {
            acc += mrt.m[k][i] * f_neq[i];
        }
        m_neq[k] = acc * rt[k];
    }

    // Back to population space.
    for i in 0..Q {
        let mut acc = 0.0;
        for k in 0..Q {
            acc += mrt.inv_m[i][k] * m_neq[k];
        }
        f[i] -= acc;
    }
    j_sqr * inv_rho * inv_rho
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MrtD2Q9;
    use crate::lb::{bgk_collision, moments};

    // MRT step with every relaxation rate forced to omega, bypassing the
    // descriptor's base rates.
    fn mrt_all_at(f: &mut [Scalar; 9], rho_bar: Scalar, j: &[Scalar; 2], omega: Scalar) {
        let mrt = MrtD2Q9::MRT.unwrap();
        let inv_rho = MrtD2Q9::inv_rho(rho_bar);
        let j_sqr = norm_sqr(j);
        let mut f_neq = [0.0; 9];
        for i in 0..9 {
            f_neq[i] = f[i] - bgk_equilibrium::<MrtD2Q9, 2, 9, 0>(i, rho_bar, inv_rho, j, j_sqr);
        }
        let mut m_neq = [0.0; 9];
        for k in 0..9 {
            let mut acc = 0.0;
            for i in 0..9 {
                acc += mrt.m[k][i] * f_neq[i];
            }
            m_neq[k] = acc * omega;
        }
        for i in 0..9 {
            let mut acc = 0.0;
            for k in 0..9 {
                acc += mrt.inv_m[i][k] * m_neq[k];
            }
            f[i] -= acc;
        }
    }

    #[test]
    fn collapsed_relaxation_vector_reduces_to_bgk() {
        let omega = 1.37;
        let mut f = [0.0; 9];
        for (i, v) in f.iter_mut().enumerate() {
            *v = 0.05 + 0.01 * (i as Scalar) - 0.002 * (i * i) as Scalar;
        }
        let mut f_bgk = f;
        let (rho_bar, j) = moments::get_rho_bar_j::<MrtD2Q9, 2, 9, 0>(&f);
        mrt_all_at(&mut f, rho_bar, &j, omega);
        bgk_collision::<MrtD2Q9, 2, 9, 0>(&mut f_bgk, rho_bar, &j, omega);
        for i in 0..9 {
            assert!(
                (f[i] - f_bgk[i]).abs() < 1e-13,
                "population {i}: {} vs {}",
                f[i],
                f_bgk[i]
            );
        }
    }

    #[test]
    fn conserved_moments_are_untouched() {
        let mut f = [0.0; 9];
        for (i, v) in f.iter_mut().enumerate() {
            *v = 0.1 + 0.004 * i as Scalar;
        }
        let (rho_bar, j) = moments::get_rho_bar_j::<MrtD2Q9, 2, 9, 0>(&f);
        mrt_collision::<MrtD2Q9, 2, 9, 0>(&mut f, rho_bar, &j, 1.2, 1.6);
        let (rb, jj) = moments::get_rho_bar_j::<MrtD2Q9, 2, 9, 0>(&f);
        assert!((rb - rho_bar).abs() < 1e-13);
        assert!((jj[0] - j[0]).abs() < 1e-13);
        assert!((jj[1] - j[1]).abs() < 1e-13);
    }
}

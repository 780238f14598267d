//! Body-force terms.

use crate::descriptor::Descriptor;
use crate::Scalar;

/// Guo forcing term, applied after the relaxation step.
///
/// Adds `(1 - omega/2) t_i ((c_i - u) invCs2 + invCs2^2 (c_i . u) c_i) . F`
/// to each population, with `F` read from the cell's external force slot.
#[inline]
pub fn add_guo_force<Dsc, const D: usize, const Q: usize, const E: usize>(
    f: &mut [Scalar; Q],
    external: &[Scalar; E],
    u: &[Scalar; D],
    omega: Scalar,
    amplitude: Scalar,
) where
    Dsc: Descriptor<D, Q, E>,
{
    let offset = Dsc::FORCE_OFFSET
        .expect("Guo forcing requires a descriptor with an external force field");
    for i in 0..Q {
        let mut c_u = 0.0;
        for k in 0..D {
            c_u += Dsc::C[i][k] as Scalar * u[k];
        }
        c_u *= Dsc::INV_CS2 * Dsc::INV_CS2;
        let mut force_term = 0.0;
        for k in 0..D {
            force_term += ((Dsc::C[i][k] as Scalar - u[k]) * Dsc::INV_CS2
                + c_u * Dsc::C[i][k] as Scalar)
                * external[offset + k];
        }
        f[i] += force_term * Dsc::W[i] * (1.0 - omega / 2.0) * amplitude;
    }
}

/// Read one force component from the external scalars, or zero for
/// descriptors without a force field. The gate is the presence of the force
/// slot itself, not a hard-coded field size.
#[inline]
pub fn external_force_component<Dsc, const D: usize, const Q: usize, const E: usize>(
    external: &[Scalar; E],
    k: usize,
) -> Scalar
where
    Dsc: Descriptor<D, Q, E>,
{
    match Dsc::FORCE_OFFSET {
        Some(offset) => external[offset + k],
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ForcedD2Q9;
    use crate::lb::moments;

    #[test]
    fn guo_force_injects_momentum_not_mass() {
        let mut f = [0.0; 9];
        for (i, v) in f.iter_mut().enumerate() {
            *v = ForcedD2Q9::W[i] * 0.9 + 0.001 * i as Scalar;
        }
        let external = [2e-4, -1e-4];
        let u = [0.01, 0.02];
        let omega: Scalar = 1.1;
        let (rho_before, j_before) = moments::get_rho_bar_j::<ForcedD2Q9, 2, 9, 2>(&f);
        add_guo_force::<ForcedD2Q9, 2, 9, 2>(&mut f, &external, &u, omega, 1.0);
        let (rho_after, j_after) = moments::get_rho_bar_j::<ForcedD2Q9, 2, 9, 2>(&f);
        assert!((rho_before - rho_after).abs() < 1e-15);
        let gain = 1.0 - omega / 2.0;
        assert!((j_after[0] - j_before[0] - gain * external[0]).abs() < 1e-15);
        assert!((j_after[1] - j_before[1] - gain * external[1]).abs() < 1e-15);
    }

    #[test]
    fn force_component_defaults_to_zero() {
        use crate::descriptor::D2Q9;
        let external = [0.0; 0];
        assert_eq!(external_force_component::<D2Q9, 2, 9, 0>(&external, 0), 0.0);
    }
}

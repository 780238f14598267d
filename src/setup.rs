//! Initial- and boundary-condition helpers.

use crate::cell::Cell;
use crate::core::geometry::{contained2d, contained3d, Box2D, Box3D};
use crate::descriptor::Descriptor;
use crate::dynamics::Dynamics;
use crate::lattice::{BlockLattice2D, BlockLattice3D};
use crate::lb;
use crate::Scalar;

pub use crate::core::error::relaxation_from_viscosity;

/// Overwrite a cell's populations with the equilibrium of `(rho, u)`,
/// evaluated through the governing dynamics. Pure write, no reads.
pub fn ini_cell_at_equilibrium<Dsc, const D: usize, const Q: usize, const E: usize>(
    cell: &mut Cell<Dsc, D, Q, E>,
    dynamics: &Dynamics<Dsc, D, Q, E>,
    rho: Scalar,
    u: [Scalar; D],
) where
    Dsc: Descriptor<D, Q, E>,
{
    let mut j = [0.0; D];
    for k in 0..D {
        j[k] = rho * u[k];
    }
    let j_sqr = lb::norm_sqr(&j);
    let rho_bar = Dsc::rho_bar(rho);
    for i in 0..Q {
        cell[i] = dynamics.compute_equilibrium(i, rho_bar, &j, j_sqr);
    }
}

/// Initialize a domain at equilibrium; `f(x, y)` supplies `(rho, u)` per
/// cell.
pub fn initialize_at_equilibrium_2d<Dsc, const Q: usize, const E: usize, F>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    f: F,
) where
    Dsc: Descriptor<2, Q, E>,
    F: Fn(i64, i64) -> (Scalar, [Scalar; 2]),
{
    assert!(contained2d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            let (rho, u) = f(x, y);
            let dynamics = lattice.dynamics_at(x, y).clone();
            ini_cell_at_equilibrium(lattice.cell_mut(x, y), &dynamics, rho, u);
        }
    }
}

pub fn initialize_at_equilibrium_3d<Dsc, const Q: usize, const E: usize, F>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    domain: Box3D,
    f: F,
) where
    Dsc: Descriptor<3, Q, E>,
    F: Fn(i64, i64, i64) -> (Scalar, [Scalar; 3]),
{
    assert!(contained3d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                let (rho, u) = f(x, y, z);
                let dynamics = lattice.dynamics_at(x, y, z).clone();
                ini_cell_at_equilibrium(lattice.cell_mut(x, y, z), &dynamics, rho, u);
            }
        }
    }
}

/// Impose a boundary velocity on every cell of `domain`. Cells governed by
/// the shared background dynamics are left alone: the velocity datum lives
/// in the cell-owned boundary composite.
pub fn set_boundary_velocity_2d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    u: [Scalar; 2],
) where
    Dsc: Descriptor<2, Q, E>,
{
    assert!(contained2d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            if let Some(dynamics) = lattice.cell_mut(x, y).dynamics_mut() {
                dynamics.define_velocity(u);
            }
        }
    }
}

pub fn set_boundary_velocity_3d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    domain: Box3D,
    u: [Scalar; 3],
) where
    Dsc: Descriptor<3, Q, E>,
{
    assert!(contained3d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                if let Some(dynamics) = lattice.cell_mut(x, y, z).dynamics_mut() {
                    dynamics.define_velocity(u);
                }
            }
        }
    }
}

/// Impose a boundary density (pressure) on every cell of `domain`.
pub fn set_boundary_density_2d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    rho: Scalar,
) where
    Dsc: Descriptor<2, Q, E>,
{
    assert!(contained2d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            if let Some(dynamics) = lattice.cell_mut(x, y).dynamics_mut() {
                dynamics.define_density(rho);
            }
        }
    }
}

pub fn set_boundary_density_3d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    domain: Box3D,
    rho: Scalar,
) where
    Dsc: Descriptor<3, Q, E>,
{
    assert!(contained3d(domain, lattice.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                if let Some(dynamics) = lattice.cell_mut(x, y, z).dynamics_mut() {
                    dynamics.define_density(rho);
                }
            }
        }
    }
}

/// Write a constant body force into the external force slot of every cell.
pub fn set_external_force_2d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    force: [Scalar; 2],
) where
    Dsc: Descriptor<2, Q, E>,
{
    assert!(contained2d(domain, lattice.bounding_box()));
    let offset = Dsc::FORCE_OFFSET.expect("descriptor carries no external force field");
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            let cell = lattice.cell_mut(x, y);
            cell.set_external(offset, force[0]);
            cell.set_external(offset + 1, force[1]);
        }
    }
}

pub fn set_external_force_3d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    domain: Box3D,
    force: [Scalar; 3],
) where
    Dsc: Descriptor<3, Q, E>,
{
    assert!(contained3d(domain, lattice.bounding_box()));
    let offset = Dsc::FORCE_OFFSET.expect("descriptor carries no external force field");
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                let cell = lattice.cell_mut(x, y, z);
                cell.set_external(offset, force[0]);
                cell.set_external(offset + 1, force[1]);
                cell.set_external(offset + 2, force[2]);
            }
        }
    }
}

/// Write the advecting velocity of a passive-scalar lattice.
pub fn set_advection_velocity_2d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    u: [Scalar; 2],
) where
    Dsc: Descriptor<2, Q, E>,
{
    assert!(contained2d(domain, lattice.bounding_box()));
    let offset = Dsc::VELOCITY_OFFSET.expect("descriptor carries no external velocity field");
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            let cell = lattice.cell_mut(x, y);
            cell.set_external(offset, u[0]);
            cell.set_external(offset + 1, u[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::D2Q9;

    #[test]
    fn equilibrium_initialization_reproduces_the_moments() {
        let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
            BlockLattice2D::new(4, 4, Dynamics::bgk(1.0));
        let lattice_domain = lattice.bounding_box();
        initialize_at_equilibrium_2d(&mut lattice, lattice_domain, |x, _| {
            (1.0 + 0.01 * x as Scalar, [0.02, -0.01])
        });
        let rho = lattice.compute_density(3, 2);
        let u = lattice.compute_velocity(3, 2);
        assert!((rho - 1.03).abs() < 1e-12);
        assert!((u[0] - 0.02).abs() < 1e-12);
        assert!((u[1] + 0.01).abs() < 1e-12);
    }
}

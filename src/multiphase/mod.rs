//! Shan-Chen inter-particle force couplers.
//!
//! Each step, the couplers cache per-component density and raw momentum in
//! the external scalars, evaluate the inter-particle force from the
//! neighbouring densities (or a pseudopotential of them), and write the
//! corrected momentum back into the external momentum slot that the
//! external-moment dynamics reads at the next collision. For each external
//! slot there is exactly one writer per step.
//!
//! Neighbour lookups wrap around the lattice, which is exact on periodic
//! lattices; on non-periodic ones pass a domain shrunk by one cell.

use crate::core::geometry::Box2D;
use crate::descriptor::Descriptor;
use crate::lattice::BlockLattice2D;
use crate::lb::{force, moments};
use crate::processor::{BoxedScope2D, LatticeProcessor2D, ProcessorGenerator2D};
use crate::Scalar;
use std::sync::Arc;

/// Pluggable pseudopotential; shared between a generator and the
/// processors it produces.
pub type PsiFunction = Arc<dyn Fn(Scalar) -> Scalar>;

/// A unit of work coupling several lattices of the same descriptor.
pub trait LatticeCoupling2D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattices: &mut [&mut BlockLattice2D<Dsc, Q, E>]);
}

/// Run a coupling against its lattices; call once per time step, between
/// the `collide_and_stream` calls of the coupled components.
pub fn execute_coupling_2d<Dsc, const Q: usize, const E: usize>(
    coupling: &mut dyn LatticeCoupling2D<Dsc, Q, E>,
    lattices: &mut [&mut BlockLattice2D<Dsc, Q, E>],
) where
    Dsc: Descriptor<2, Q, E>,
{
    coupling.process(lattices);
}

/// Cache the per-cell density and raw momentum of `domain` plus a one-cell
/// halo into the external scalars. The density is queried through the
/// dynamics so that user-defined boundary values are respected; the momentum
/// is the raw first moment, deliberately not the dynamics velocity.
/// `per_cell` observes every visited halo coordinate (unwrapped) and its
/// density.
fn cache_moments_with_halo<Dsc, const Q: usize, const E: usize, F>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    rho_ofs: usize,
    j_ofs: usize,
    mut per_cell: F,
) where
    Dsc: Descriptor<2, Q, E>,
    F: FnMut(i64, i64, Scalar),
{
    let (nx, ny) = (lattice.nx(), lattice.ny());
    for x in domain.x0 - 1..=domain.x1 + 1 {
        for y in domain.y0 - 1..=domain.y1 + 1 {
            let (xw, yw) = (x.rem_euclid(nx), y.rem_euclid(ny));
            let rho = lattice.compute_density(xw, yw);
            let j = moments::get_j::<Dsc, 2, Q, E>(lattice.cell(xw, yw).populations());
            let cell = lattice.cell_mut(xw, yw);
            cell.set_external(rho_ofs, rho);
            cell.set_external(j_ofs, j[0]);
            cell.set_external(j_ofs + 1, j[1]);
            per_cell(x, y, rho);
        }
    }
}

/// Multi-component Shan-Chen coupling with interaction strength `G`.
pub struct ShanChenMultiComponent2D {
    g: Scalar,
    domain: Box2D,
}

impl ShanChenMultiComponent2D {
    pub fn new(g: Scalar, domain: Box2D) -> Self {
        ShanChenMultiComponent2D { g, domain }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeCoupling2D<Dsc, Q, E> for ShanChenMultiComponent2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattices: &mut [&mut BlockLattice2D<Dsc, Q, E>]) {
        let num_species = lattices.len();
        assert!(num_species >= 2, "multi-component coupling needs at least two lattices");
        let rho_ofs = Dsc::DENSITY_OFFSET.expect("Shan-Chen coupling requires a density field");
        let j_ofs = Dsc::MOMENTUM_OFFSET.expect("Shan-Chen coupling requires a momentum field");
        let (nx, ny) = (lattices[0].nx(), lattices[0].ny());
        let domain = self.domain;

        for lattice in lattices.iter_mut() {
            cache_moments_with_halo(lattice, domain, rho_ofs, j_ofs, |_, _, _| {});
        }

        let mut omega = vec![0.0; num_species];
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                // Relaxation-weighted common velocity.
                let mut weighted_density = 0.0;
                for (s, lattice) in lattices.iter().enumerate() {
                    omega[s] = lattice.dynamics_at(x, y).omega();
                    weighted_density += omega[s] * lattice.cell(x, y).get_external(rho_ofs);
                }
                let mut u_tot = [0.0; 2];
                for k in 0..2 {
                    for (s, lattice) in lattices.iter().enumerate() {
                        u_tot[k] += lattice.cell(x, y).get_external(j_ofs + k) * omega[s];
                    }
                    u_tot[k] /= weighted_density;
                }

                // Interaction potential: sum_i t_i rho_s(x + c_i) c_i.
                let mut rho_contribution = vec![[0.0; 2]; num_species];
                for i in 0..Q {
                    let xn = (x + Dsc::C[i][0]).rem_euclid(nx);
                    let yn = (y + Dsc::C[i][1]).rem_euclid(ny);
                    for (s, lattice) in lattices.iter().enumerate() {
                        let rho = lattice.cell(xn, yn).get_external(rho_ofs);
                        for k in 0..2 {
                            rho_contribution[s][k] += Dsc::W[i] * rho * Dsc::C[i][k] as Scalar;
                        }
                    }
                }

                // Momentum correction from the potential of all other
                // species plus any external body force.
                for s in 0..num_species {
                    let cell = lattices[s].cell_mut(x, y);
                    let rho = cell.get_external(rho_ofs);
                    for k in 0..2 {
                        let mut force_contribution =
                            force::external_force_component::<Dsc, 2, Q, E>(cell.externals(), k);
                        for (partner, contribution) in rho_contribution.iter().enumerate() {
                            if partner != s {
                                force_contribution -= self.g * contribution[k];
                            }
                        }
                        let momentum = (u_tot[k] + force_contribution / omega[s]) * rho;
                        cell.set_external(j_ofs + k, momentum);
                    }
                }
            }
        }
    }
}

/// Single-component Shan-Chen coupling with a pluggable pseudopotential.
pub struct ShanChenSingleComponent2D {
    g: Scalar,
    domain: Box2D,
    psi: PsiFunction,
}

impl ShanChenSingleComponent2D {
    pub fn new(g: Scalar, domain: Box2D, psi: PsiFunction) -> Self {
        ShanChenSingleComponent2D { g, domain, psi }
    }
}

/// The identity pseudopotential `psi(rho) = rho`.
pub fn psi_rho() -> PsiFunction {
    Arc::new(|rho| rho)
}

/// The saturation pseudopotential of Shan and Chen (1994),
/// `psi(rho) = psi0 (1 - exp(-rho/rho0))`.
pub fn psi_shan_chen_94(psi0: Scalar, rho0: Scalar) -> PsiFunction {
    Arc::new(move |rho| psi0 * (1.0 - (-rho / rho0).exp()))
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E>
    for ShanChenSingleComponent2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        let rho_ofs = Dsc::DENSITY_OFFSET.expect("Shan-Chen coupling requires a density field");
        let j_ofs = Dsc::MOMENTUM_OFFSET.expect("Shan-Chen coupling requires a momentum field");
        let domain = self.domain;

        // Pseudopotential on the domain plus a one-cell halo.
        let halo_ny = (domain.get_ny() + 2) as usize;
        let mut psi_field =
            vec![0.0; (domain.get_nx() + 2) as usize * halo_ny];
        let halo_index = |x: i64, y: i64| {
            ((x - (domain.x0 - 1)) * halo_ny as i64 + (y - (domain.y0 - 1))) as usize
        };
        let psi = &self.psi;
        cache_moments_with_halo(lattice, domain, rho_ofs, j_ofs, |x, y, rho| {
            psi_field[halo_index(x, y)] = psi(rho);
        });

        let psi_at = |field: &Vec<Scalar>, x: i64, y: i64| field[halo_index(x, y)];
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                let mut rho_contribution = [0.0; 2];
                for i in 0..Q {
                    let psi = psi_at(&psi_field, x + Dsc::C[i][0], y + Dsc::C[i][1]);
                    for k in 0..2 {
                        rho_contribution[k] += Dsc::W[i] * psi * Dsc::C[i][k] as Scalar;
                    }
                }
                let omega = lattice.dynamics_at(x, y).omega();
                let psi_here = psi_at(&psi_field, x, y);
                let cell = lattice.cell_mut(x, y);
                for k in 0..2 {
                    let mut force_contribution =
                        force::external_force_component::<Dsc, 2, Q, E>(cell.externals(), k);
                    force_contribution -= self.g * psi_here * rho_contribution[k];
                    let momentum = cell.get_external(j_ofs + k) + force_contribution / omega;
                    cell.set_external(j_ofs + k, momentum);
                }
            }
        }
    }
}

/// Generator for the single-component coupler, so it can be registered on a
/// lattice with `add_internal_processor` and run after every time step like
/// any other internal processor.
pub struct ShanChenSingleComponentGenerator2D {
    scope: BoxedScope2D,
    g: Scalar,
    psi: PsiFunction,
}

impl ShanChenSingleComponentGenerator2D {
    pub fn new(g: Scalar, domain: Box2D, psi: PsiFunction) -> Self {
        ShanChenSingleComponentGenerator2D {
            scope: BoxedScope2D::new(domain),
            g,
            psi,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for ShanChenSingleComponentGenerator2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64) {
        self.scope.shift(dx, dy);
    }

    fn multiply(&mut self, scale: i64) {
        self.scope.multiply(scale);
    }

    fn divide(&mut self, scale: i64) {
        self.scope.divide(scale);
    }

    fn extract(&mut self, sub_domain: Box2D) -> bool {
        self.scope.extract(sub_domain)
    }

    fn generate(&self) -> Box<dyn LatticeProcessor2D<Dsc, Q, E>> {
        Box::new(ShanChenSingleComponent2D::new(
            self.g,
            self.scope.domain,
            Arc::clone(&self.psi),
        ))
    }
}

//! The collision-operator family.
//!
//! Every cell of a lattice is governed by a [`Dynamics`] value: a bulk
//! collision operator (BGK and friends), a degenerate wall operator
//! (bounce-back), or a composite that wraps a base operator and customises
//! one aspect of it (boundary completion, regularization). The operator set
//! is closed, so dispatch is a plain `match` that the compiler can inline
//! into the hot loop; composite chains put their base behind a `Box`.

pub mod boundary;

pub use boundary::{BoundaryClosure, BoundaryData, BoundaryDynamics};

use crate::core::statistics::{gather_statistics, BlockStatistics, AVG_RHO_BAR};
use crate::descriptor::Descriptor;
use crate::lb::{self, force, moments, mrt, smagorinsky, StressVector};
use crate::Scalar;

/// Ids of the generic dynamics parameters.
pub mod params {
    /// Relaxation rate tied to the shear viscosity.
    pub const OMEGA_SHEAR: usize = 0;
    /// Relaxation rate tied to the bulk viscosity.
    pub const OMEGA_BULK: usize = 1;
}

#[derive(Debug, Clone)]
pub enum Dynamics<Dsc, const D: usize, const Q: usize, const E: usize>
where
    Dsc: Descriptor<D, Q, E>,
{
    /// Dead cell: no collision, unit density, zero velocity.
    NoDynamics,
    /// Full-way bounce-back; reports a fictitious density.
    BounceBack { rho: Scalar },
    /// Bounce-back that accumulates the momentum exchanged with the fluid
    /// into caller-subscribed statistics sum slots.
    MomentumExchange {
        rho: Scalar,
        force_ids: [usize; D],
        fluid_directions: Vec<usize>,
    },
    /// Single-relaxation-time collision, second order in Ma.
    Bgk { omega: Scalar },
    /// BGK with the Ma^2 term preceded by 1 instead of 1/rho.
    IncBgk { omega: Scalar },
    /// BGK that pins the lattice-average density to one.
    ConstRhoBgk { omega: Scalar },
    /// Regularized collision: off-equilibrium projected onto its
    /// second-moment part before relaxing.
    RegularizedBgk { omega: Scalar },
    /// BGK with the local relaxation rate corrected by the Smagorinsky
    /// subgrid closure.
    SmagorinskyBgk {
        omega0: Scalar,
        prefactor: Scalar,
    },
    SmagorinskyRegularized {
        omega0: Scalar,
        prefactor: Scalar,
    },
    /// Moment-space relaxation; `lambda` is the bulk-viscosity rate.
    Mrt { omega: Scalar, lambda: Scalar },
    /// BGK plus the forcing term of Guo; the force lives in the external
    /// scalars and the physical velocity is `(j + F/2)/rho`.
    GuoForceBgk { omega: Scalar },
    /// BGK whose density and momentum are read from the external scalars,
    /// as written by a multiphase coupling processor.
    ExternalMomentBgk { omega: Scalar },
    /// Passive-scalar BGK; the advecting velocity is an external field.
    AdvectionBgk { omega: Scalar },
    AdvectionRlb { omega: Scalar },
    /// Composite: regularize the populations, then let the base collide.
    Rlb(Box<Dynamics<Dsc, D, Q, E>>),
    /// Composite boundary closure; see [`boundary`].
    Boundary(BoundaryDynamics<Dsc, D, Q, E>),
}

impl<Dsc, const D: usize, const Q: usize, const E: usize> Dynamics<Dsc, D, Q, E>
where
    Dsc: Descriptor<D, Q, E>,
{
    pub fn bgk(omega: Scalar) -> Self {
        Dynamics::Bgk { omega }
    }

    pub fn inc_bgk(omega: Scalar) -> Self {
        Dynamics::IncBgk { omega }
    }

    pub fn const_rho_bgk(omega: Scalar) -> Self {
        Dynamics::ConstRhoBgk { omega }
    }

    pub fn regularized_bgk(omega: Scalar) -> Self {
        Dynamics::RegularizedBgk { omega }
    }

    pub fn smagorinsky_bgk(omega0: Scalar, c_smago: Scalar) -> Self {
        Dynamics::SmagorinskyBgk {
            omega0,
            prefactor: smagorinsky::prefactor::<Dsc, D, Q, E>(omega0, c_smago),
        }
    }

    pub fn smagorinsky_regularized(omega0: Scalar, c_smago: Scalar) -> Self {
        Dynamics::SmagorinskyRegularized {
            omega0,
            prefactor: smagorinsky::prefactor::<Dsc, D, Q, E>(omega0, c_smago),
        }
    }

    pub fn mrt(omega: Scalar) -> Self {
        Dynamics::Mrt { omega, lambda: omega }
    }

    pub fn mrt_with_lambda(omega: Scalar, lambda: Scalar) -> Self {
        Dynamics::Mrt { omega, lambda }
    }

    pub fn guo_force_bgk(omega: Scalar) -> Self {
        Dynamics::GuoForceBgk { omega }
    }

    pub fn external_moment_bgk(omega: Scalar) -> Self {
        Dynamics::ExternalMomentBgk { omega }
    }

    pub fn advection_bgk(omega: Scalar) -> Self {
        Dynamics::AdvectionBgk { omega }
    }

    pub fn advection_rlb(omega: Scalar) -> Self {
        Dynamics::AdvectionRlb { omega }
    }

    pub fn bounce_back() -> Self {
        Dynamics::BounceBack { rho: 0.0 }
    }

    pub fn bounce_back_with_rho(rho: Scalar) -> Self {
        Dynamics::BounceBack { rho }
    }

    pub fn momentum_exchange(force_ids: [usize; D]) -> Self {
        Dynamics::MomentumExchange {
            rho: 0.0,
            force_ids,
            fluid_directions: Vec::new(),
        }
    }

    pub fn no_dynamics() -> Self {
        Dynamics::NoDynamics
    }

    pub fn rlb(base: Dynamics<Dsc, D, Q, E>) -> Self {
        Dynamics::Rlb(Box::new(base))
    }

    pub fn boundary(closure: BoundaryClosure, base: Dynamics<Dsc, D, Q, E>) -> Self {
        Dynamics::Boundary(BoundaryDynamics::new(closure, base))
    }

    /// Directions along which a momentum-exchange wall cell receives fluid
    /// populations.
    pub fn set_fluid_directions(&mut self, directions: Vec<usize>) {
        match self {
            Dynamics::MomentumExchange { fluid_directions, .. } => {
                *fluid_directions = directions;
            }
            _ => panic!("fluid directions only apply to momentum-exchange bounce-back"),
        }
    }

    /// Replace the base of a composite, consuming self. Panics on
    /// non-composite dynamics.
    pub fn with_new_base(mut self, base: Dynamics<Dsc, D, Q, E>) -> Self {
        match &mut self {
            Dynamics::Boundary(b) => b.replace_base(base),
            Dynamics::Rlb(inner) => *inner = Box::new(base),
            _ => panic!("with_new_base requires a composite dynamics"),
        }
        self
    }

    /// The wrapped base dynamics of a composite.
    pub fn base_dynamics(&self) -> Option<&Dynamics<Dsc, D, Q, E>> {
        match self {
            Dynamics::Boundary(b) => Some(b.base()),
            Dynamics::Rlb(inner) => Some(inner),
            _ => None,
        }
    }

    /// Collision step on one cell's populations.
    pub fn collide(
        &self,
        f: &mut [Scalar; Q],
        external: &mut [Scalar; E],
        takes_statistics: bool,
        statistics: &mut BlockStatistics,
    ) {
        match self {
            Dynamics::NoDynamics => {}
            Dynamics::BounceBack { .. } => {
                for i in 1..=Q / 2 {
                    f.swap(i, i + Q / 2);
                }
            }
            Dynamics::MomentumExchange {
                force_ids,
                fluid_directions,
                ..
            } => {
                // Momentum balance before the swap: one contribution for the
                // loss into the obstacle, one for the gain in the subsequent
                // streaming step.
                if takes_statistics {
                    let mut momentum = [0.0; D];
                    for &i in fluid_directions {
                        for k in 0..D {
                            momentum[k] += 2.0 * Dsc::C[i][k] as Scalar * f[i];
                        }
                    }
                    for k in 0..D {
                        statistics.gather_sum(force_ids[k], -momentum[k]);
                    }
                }
                for i in 1..=Q / 2 {
                    f.swap(i, i + Q / 2);
                }
            }
            Dynamics::Bgk { omega } => {
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                let u_sqr = lb::bgk_collision::<Dsc, D, Q, E>(f, rho_bar, &j, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::IncBgk { omega } => {
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                let u_sqr = lb::bgk_inc_collision::<Dsc, D, Q, E>(f, rho_bar, &j, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::ConstRhoBgk { omega } => {
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                // Average density of the previous step drives the rescaling.
                let ratio_rho = 1.0 / Dsc::full_rho(statistics.get_average(AVG_RHO_BAR));
                let u_sqr =
                    lb::bgk_const_rho_collision::<Dsc, D, Q, E>(f, rho_bar, &j, ratio_rho, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::RegularizedBgk { omega } => {
                let (rho_bar, j, pi) = moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f);
                let u_sqr = lb::rlb_collision::<Dsc, D, Q, E>(f, rho_bar, &j, &pi, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::SmagorinskyBgk { omega0, prefactor } => {
                let (rho_bar, j, pi) = moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f);
                let omega = smagorinsky::effective_omega::<Dsc, D, Q, E>(
                    *omega0, *prefactor, rho_bar, &pi,
                );
                let u_sqr = lb::bgk_collision::<Dsc, D, Q, E>(f, rho_bar, &j, omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::SmagorinskyRegularized { omega0, prefactor } => {
                let (rho_bar, j, pi) = moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f);
                let omega = smagorinsky::effective_omega::<Dsc, D, Q, E>(
                    *omega0, *prefactor, rho_bar, &pi,
                );
                let u_sqr = lb::rlb_collision::<Dsc, D, Q, E>(f, rho_bar, &j, &pi, omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::Mrt { omega, lambda } => {
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                let u_sqr = mrt::mrt_collision::<Dsc, D, Q, E>(f, rho_bar, &j, *omega, *lambda);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::GuoForceBgk { omega } => {
                let (rho_bar, j_raw) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                let offset = Dsc::FORCE_OFFSET
                    .expect("Guo-force dynamics requires an external force field");
                let inv_rho = Dsc::inv_rho(rho_bar);
                let rho = Dsc::full_rho(rho_bar);
                let mut u = [0.0; D];
                let mut j = [0.0; D];
                for k in 0..D {
                    u[k] = (j_raw[k] + external[offset + k] / 2.0) * inv_rho;
                    j[k] = rho * u[k];
                }
                let u_sqr = lb::bgk_collision::<Dsc, D, Q, E>(f, rho_bar, &j, *omega);
                force::add_guo_force::<Dsc, D, Q, E>(f, external, &u, *omega, 1.0);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::ExternalMomentBgk { omega } => {
                let rho_offset = Dsc::DENSITY_OFFSET
                    .expect("external-moment dynamics requires a density field");
                let j_offset = Dsc::MOMENTUM_OFFSET
                    .expect("external-moment dynamics requires a momentum field");
                let rho_bar = Dsc::rho_bar(external[rho_offset]);
                let mut j = [0.0; D];
                for k in 0..D {
                    j[k] = external[j_offset + k];
                }
                let u_sqr = lb::bgk_collision::<Dsc, D, Q, E>(f, rho_bar, &j, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::AdvectionBgk { omega } => {
                let rho_bar = moments::get_rho_bar::<Dsc, D, Q, E>(f);
                let j_eq = lb::advection::get_j_eq::<Dsc, D, Q, E>(external, rho_bar);
                let u_sqr =
                    lb::advection::no_corr_bgk_collision::<Dsc, D, Q, E>(f, rho_bar, &j_eq, *omega);
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::AdvectionRlb { omega } => {
                let rho_bar = moments::get_rho_bar::<Dsc, D, Q, E>(f);
                let j_eq = lb::advection::get_j_eq::<Dsc, D, Q, E>(external, rho_bar);
                let j_raw = moments::get_j::<Dsc, D, Q, E>(f);
                let mut j_neq = [0.0; D];
                for k in 0..D {
                    j_neq[k] = j_raw[k] - j_eq[k];
                }
                let u_sqr = lb::advection::no_corr_rlb_collision::<Dsc, D, Q, E>(
                    f, rho_bar, &j_eq, &j_neq, *omega,
                );
                if takes_statistics {
                    gather_statistics(statistics, rho_bar, u_sqr);
                }
            }
            Dynamics::Rlb(base) => {
                let (rho_bar, j, pi) = moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f);
                let j_sqr = lb::norm_sqr(&j);
                base.regularize_cell(f, external, rho_bar, &j, j_sqr, &pi);
                base.collide(f, external, takes_statistics, statistics);
            }
            Dynamics::Boundary(b) => b.collide(f, external, takes_statistics, statistics),
        }
    }

    /// Equilibrium population for direction `i`.
    pub fn compute_equilibrium(
        &self,
        i: usize,
        rho_bar: Scalar,
        j: &[Scalar; D],
        j_sqr: Scalar,
    ) -> Scalar {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => 0.0,
            Dynamics::IncBgk { .. } => lb::bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, 1.0, j, j_sqr),
            Dynamics::AdvectionBgk { .. } | Dynamics::AdvectionRlb { .. } => {
                lb::advection::ma1_equilibrium::<Dsc, D, Q, E>(i, rho_bar, j)
            }
            Dynamics::Rlb(base) => base.compute_equilibrium(i, rho_bar, j, j_sqr),
            Dynamics::Boundary(b) => b.base().compute_equilibrium(i, rho_bar, j, j_sqr),
            _ => lb::bgk_equilibrium::<Dsc, D, Q, E>(i, rho_bar, Dsc::inv_rho(rho_bar), j, j_sqr),
        }
    }

    /// Rebuild the populations from the leading moments.
    pub fn regularize_cell(
        &self,
        f: &mut [Scalar; Q],
        external: &[Scalar; E],
        rho_bar: Scalar,
        j: &[Scalar; D],
        j_sqr: Scalar,
        pi_neq: &StressVector,
    ) {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => {}
            Dynamics::AdvectionBgk { .. } | Dynamics::AdvectionRlb { .. } => {
                let j_eq = lb::advection::get_j_eq::<Dsc, D, Q, E>(external, rho_bar);
                lb::advection::regularize_ma1::<Dsc, D, Q, E>(f, rho_bar, j, &j_eq);
            }
            Dynamics::Rlb(base) => base.regularize_cell(f, external, rho_bar, j, j_sqr, pi_neq),
            Dynamics::Boundary(b) => {
                b.base()
                    .regularize_cell(f, external, rho_bar, j, j_sqr, pi_neq)
            }
            _ => lb::regularize::<Dsc, D, Q, E>(f, rho_bar, j, j_sqr, pi_neq),
        }
    }

    pub fn compute_rho_bar(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        match self {
            Dynamics::NoDynamics => 1.0 - Dsc::SKORDOS_FACTOR,
            Dynamics::BounceBack { rho } | Dynamics::MomentumExchange { rho, .. } => {
                Dsc::rho_bar(*rho)
            }
            Dynamics::ExternalMomentBgk { .. } => {
                Dsc::rho_bar(external[Dsc::DENSITY_OFFSET.unwrap()])
            }
            Dynamics::Rlb(base) => base.compute_rho_bar(f, external),
            Dynamics::Boundary(b) => b.compute_rho_bar(f, external),
            _ => moments::get_rho_bar::<Dsc, D, Q, E>(f),
        }
    }

    pub fn compute_density(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        match self {
            Dynamics::NoDynamics => 1.0,
            Dynamics::BounceBack { rho } | Dynamics::MomentumExchange { rho, .. } => *rho,
            _ => Dsc::full_rho(self.compute_rho_bar(f, external)),
        }
    }

    pub fn compute_velocity(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> [Scalar; D] {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => [0.0; D],
            Dynamics::GuoForceBgk { .. } => {
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                let offset = Dsc::FORCE_OFFSET.unwrap();
                let inv_rho = Dsc::inv_rho(rho_bar);
                let mut u = [0.0; D];
                for k in 0..D {
                    u[k] = (j[k] + external[offset + k] / 2.0) * inv_rho;
                }
                u
            }
            Dynamics::ExternalMomentBgk { .. } => {
                let rho = external[Dsc::DENSITY_OFFSET.unwrap()];
                let j_offset = Dsc::MOMENTUM_OFFSET.unwrap();
                let mut u = [0.0; D];
                for k in 0..D {
                    u[k] = external[j_offset + k] / rho;
                }
                u
            }
            Dynamics::Rlb(base) => base.compute_velocity(f, external),
            Dynamics::Boundary(b) => b.compute_velocity(f, external),
            _ => moments::compute_u_lb::<Dsc, D, Q, E>(f),
        }
    }

    pub fn compute_rho_bar_j(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> (Scalar, [Scalar; D]) {
        match self {
            Dynamics::NoDynamics => (1.0 - Dsc::SKORDOS_FACTOR, [0.0; D]),
            Dynamics::BounceBack { rho } | Dynamics::MomentumExchange { rho, .. } => {
                (Dsc::rho_bar(*rho), [0.0; D])
            }
            Dynamics::ExternalMomentBgk { .. } => {
                let rho_bar = Dsc::rho_bar(external[Dsc::DENSITY_OFFSET.unwrap()]);
                let j_offset = Dsc::MOMENTUM_OFFSET.unwrap();
                let mut j = [0.0; D];
                for k in 0..D {
                    j[k] = external[j_offset + k];
                }
                (rho_bar, j)
            }
            Dynamics::Rlb(base) => base.compute_rho_bar_j(f, external),
            Dynamics::Boundary(b) => b.compute_rho_bar_j(f, external),
            _ => moments::get_rho_bar_j::<Dsc, D, Q, E>(f),
        }
    }

    pub fn compute_rho_bar_j_pi_neq(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> (Scalar, [Scalar; D], StressVector) {
        match self {
            Dynamics::NoDynamics => (1.0 - Dsc::SKORDOS_FACTOR, [0.0; D], [0.0; 6]),
            Dynamics::BounceBack { rho } | Dynamics::MomentumExchange { rho, .. } => {
                (Dsc::rho_bar(*rho), [0.0; D], [0.0; 6])
            }
            Dynamics::Rlb(base) => base.compute_rho_bar_j_pi_neq(f, external),
            Dynamics::Boundary(b) => b.compute_rho_bar_j_pi_neq(f, external),
            _ => moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f),
        }
    }

    pub fn compute_deviatoric_stress(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> StressVector {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => [0.0; 6],
            Dynamics::Rlb(base) => base.compute_deviatoric_stress(f, external),
            Dynamics::Boundary(b) => b.compute_deviatoric_stress(f, external),
            _ => {
                let (_, _, pi) = moments::compute_rho_bar_j_pi_neq::<Dsc, D, Q, E>(f);
                pi
            }
        }
    }

    pub fn compute_temperature(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => 0.0,
            Dynamics::Rlb(base) => base.compute_temperature(f, external),
            Dynamics::Boundary(b) => b.compute_temperature(f, external),
            // Isothermal families.
            _ => 1.0,
        }
    }

    pub fn compute_heat_flux(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> [Scalar; D] {
        match self {
            Dynamics::Rlb(base) => base.compute_heat_flux(f, external),
            Dynamics::Boundary(b) => b.compute_heat_flux(f, external),
            _ => [0.0; D],
        }
    }

    pub fn compute_pressure(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => 0.0,
            _ => {
                Dsc::CS2 * self.compute_density(f, external) * self.compute_temperature(f, external)
            }
        }
    }

    pub fn compute_e_bar(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => 0.0,
            Dynamics::Rlb(base) => base.compute_e_bar(f, external),
            Dynamics::Boundary(b) => b.compute_e_bar(f, external),
            _ => moments::get_e_bar::<Dsc, D, Q, E>(f),
        }
    }

    /// Custom moments are outside the closed operator set.
    pub fn compute_moment(&self, _f: &[Scalar; Q], _external: &[Scalar; E], _id: usize) -> Scalar {
        unimplemented!("custom moments are not provided by this operator family")
    }

    pub fn omega(&self) -> Scalar {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => 0.0,
            Dynamics::Bgk { omega }
            | Dynamics::IncBgk { omega }
            | Dynamics::ConstRhoBgk { omega }
            | Dynamics::RegularizedBgk { omega }
            | Dynamics::Mrt { omega, .. }
            | Dynamics::GuoForceBgk { omega }
            | Dynamics::ExternalMomentBgk { omega }
            | Dynamics::AdvectionBgk { omega }
            | Dynamics::AdvectionRlb { omega } => *omega,
            Dynamics::SmagorinskyBgk { omega0, .. }
            | Dynamics::SmagorinskyRegularized { omega0, .. } => *omega0,
            Dynamics::Rlb(base) => base.omega(),
            Dynamics::Boundary(b) => b.base().omega(),
        }
    }

    pub fn set_omega(&mut self, new_omega: Scalar) {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => {}
            Dynamics::Bgk { omega }
            | Dynamics::IncBgk { omega }
            | Dynamics::ConstRhoBgk { omega }
            | Dynamics::RegularizedBgk { omega }
            | Dynamics::Mrt { omega, .. }
            | Dynamics::GuoForceBgk { omega }
            | Dynamics::ExternalMomentBgk { omega }
            | Dynamics::AdvectionBgk { omega }
            | Dynamics::AdvectionRlb { omega } => *omega = new_omega,
            Dynamics::SmagorinskyBgk { omega0, prefactor }
            | Dynamics::SmagorinskyRegularized { omega0, prefactor } => {
                *prefactor = smagorinsky::recompute_prefactor(*omega0, new_omega, *prefactor);
                *omega0 = new_omega;
            }
            Dynamics::Rlb(base) => base.set_omega(new_omega),
            Dynamics::Boundary(b) => b.base.set_omega(new_omega),
        }
    }

    /// Generic parameter access; unknown ids read as zero and are not
    /// written.
    pub fn parameter(&self, which: usize) -> Scalar {
        if which == params::OMEGA_BULK {
            if let Dynamics::Mrt { lambda, .. } = self {
                return *lambda;
            }
            return 0.0;
        }
        if which == params::OMEGA_SHEAR {
            return self.omega();
        }
        0.0
    }

    pub fn set_parameter(&mut self, which: usize, value: Scalar) {
        if which == params::OMEGA_BULK {
            if let Dynamics::Mrt { lambda, .. } = self {
                *lambda = value;
            }
        } else if which == params::OMEGA_SHEAR {
            self.set_omega(value);
        }
    }

    /// Impose a density on a boundary cell; no-op in the bulk.
    pub fn define_density(&mut self, rho: Scalar) {
        if let Dynamics::Boundary(b) = self {
            b.define_density(rho);
        }
    }

    /// Impose a velocity on a boundary cell; no-op in the bulk.
    pub fn define_velocity(&mut self, u: [Scalar; D]) {
        if let Dynamics::Boundary(b) = self {
            b.define_velocity(u);
        }
    }

    pub fn define_temperature(&mut self, theta: Scalar) {
        if let Dynamics::Boundary(b) = self {
            b.define_temperature(theta);
        }
    }

    /// Size of the moment representation: order 0 decomposes into rho-bar,
    /// j and the full off-equilibrium populations, order 1 into rho-bar, j
    /// and the off-equilibrium stress; externals are always appended.
    pub fn num_decomposed_variables(&self, order: usize) -> usize {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => Q + E,
            Dynamics::Rlb(base) => base.num_decomposed_variables(order),
            Dynamics::Boundary(b) => b.base().num_decomposed_variables(order),
            _ => {
                if order == 0 {
                    1 + D + Q + E
                } else {
                    1 + D + lb::tensor_size(D) + E
                }
            }
        }
    }

    pub fn decompose(&self, f: &[Scalar; Q], external: &[Scalar; E], order: usize) -> Vec<Scalar> {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => {
                let mut raw = Vec::with_capacity(Q + E);
                raw.extend_from_slice(f);
                raw.extend_from_slice(external);
                raw
            }
            Dynamics::Rlb(base) => base.decompose(f, external, order),
            Dynamics::Boundary(b) => b.base().decompose(f, external, order),
            _ => {
                let mut raw = vec![0.0; self.num_decomposed_variables(order)];
                let (rho_bar, j) = moments::get_rho_bar_j::<Dsc, D, Q, E>(f);
                raw[0] = rho_bar;
                raw[1..1 + D].copy_from_slice(&j);
                if order == 0 {
                    let j_sqr = lb::norm_sqr(&j);
                    for i in 0..Q {
                        raw[1 + D + i] = f[i] - self.compute_equilibrium(i, rho_bar, &j, j_sqr);
                    }
                    raw[1 + D + Q..].copy_from_slice(external);
                } else {
                    let pi = moments::compute_pi_neq::<Dsc, D, Q, E>(f, rho_bar, &j);
                    let n = lb::tensor_size(D);
                    raw[1 + D..1 + D + n].copy_from_slice(&pi[..n]);
                    raw[1 + D + n..].copy_from_slice(external);
                }
                raw
            }
        }
    }

    pub fn recompose(
        &self,
        f: &mut [Scalar; Q],
        external: &mut [Scalar; E],
        raw: &[Scalar],
        order: usize,
    ) {
        assert_eq!(raw.len(), self.num_decomposed_variables(order));
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => {
                f.copy_from_slice(&raw[..Q]);
                external.copy_from_slice(&raw[Q..]);
            }
            Dynamics::Rlb(base) => base.recompose(f, external, raw, order),
            Dynamics::Boundary(b) => b.base().recompose(f, external, raw, order),
            _ => {
                let rho_bar = raw[0];
                let mut j = [0.0; D];
                j.copy_from_slice(&raw[1..1 + D]);
                let j_sqr = lb::norm_sqr(&j);
                if order == 0 {
                    for i in 0..Q {
                        f[i] = self.compute_equilibrium(i, rho_bar, &j, j_sqr) + raw[1 + D + i];
                    }
                    external.copy_from_slice(&raw[1 + D + Q..]);
                } else {
                    let n = lb::tensor_size(D);
                    let mut pi = [0.0; 6];
                    pi[..n].copy_from_slice(&raw[1 + D..1 + D + n]);
                    external.copy_from_slice(&raw[1 + D + n..]);
                    self.regularize_cell(f, external, rho_bar, &j, j_sqr, &pi);
                }
            }
        }
    }

    /// Change space and time scales of a moment representation. Density is
    /// invariant, velocities scale with `dt/dx`, off-equilibrium terms with
    /// `dt`.
    pub fn rescale(&self, raw: &mut [Scalar], x_dx_inv: Scalar, x_dt: Scalar, order: usize) {
        match self {
            Dynamics::NoDynamics
            | Dynamics::BounceBack { .. }
            | Dynamics::MomentumExchange { .. } => {}
            Dynamics::Rlb(base) => base.rescale(raw, x_dx_inv, x_dt, order),
            Dynamics::Boundary(b) => b.base().rescale(raw, x_dx_inv, x_dt, order),
            _ => {
                assert_eq!(raw.len(), self.num_decomposed_variables(order));
                let vel_scale = x_dt * x_dx_inv;
                for v in raw[1..1 + D].iter_mut() {
                    *v *= vel_scale;
                }
                let n_neq = if order == 0 { Q } else { lb::tensor_size(D) };
                for v in raw[1 + D..1 + D + n_neq].iter_mut() {
                    *v *= x_dt;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ForcedD2Q9, D2Q9};

    fn seeded_stats() -> BlockStatistics {
        let mut stats = BlockStatistics::new();
        stats.subscribe_average();
        stats.subscribe_average();
        stats.subscribe_max();
        stats.evaluate_seeded(&[0.0, 0.0], &[], &[0.0], &[], 1);
        stats
    }

    #[test]
    fn bounce_back_swaps_halves() {
        let dynamics: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bounce_back_with_rho(1.0);
        let mut f = [0.0; 9];
        for i in 0..9 {
            f[i] = i as Scalar;
        }
        let mut external = [0.0; 0];
        let mut stats = seeded_stats();
        dynamics.collide(&mut f, &mut external, true, &mut stats);
        assert_eq!(f[0], 0.0);
        for i in 1..=4 {
            assert_eq!(f[i], (i + 4) as Scalar);
            assert_eq!(f[i + 4], i as Scalar);
        }
        assert_eq!(dynamics.compute_density(&f, &external), 1.0);
        assert_eq!(dynamics.compute_velocity(&f, &external), [0.0, 0.0]);
    }

    #[test]
    fn decompose_recompose_round_trips_order_0() {
        let dynamics: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bgk(0.9);
        let mut f = [0.0; 9];
        for (i, v) in f.iter_mut().enumerate() {
            *v = 0.11 * (i as Scalar + 1.0) - 0.003 * (i * i) as Scalar;
        }
        let external = [0.0; 0];
        let raw = dynamics.decompose(&f, &external, 0);
        assert_eq!(raw.len(), dynamics.num_decomposed_variables(0));
        let mut f2 = [0.0; 9];
        let mut ext2 = [0.0; 0];
        dynamics.recompose(&mut f2, &mut ext2, &raw, 0);
        for i in 0..9 {
            assert!((f[i] - f2[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn decompose_recompose_round_trips_order_1_on_regular_cells() {
        // An order-1 representation only keeps the second-moment part of the
        // off-equilibrium; it is exact on cells in regularized form.
        let dynamics: Dynamics<D2Q9, 2, 9, 0> = Dynamics::regularized_bgk(1.1);
        let mut f = [0.0; 9];
        let j = [0.04, -0.01];
        let j_sqr = lb::norm_sqr(&j);
        let mut pi = [0.0; 6];
        pi[0] = 1e-3;
        pi[1] = -2e-4;
        pi[2] = 6e-4;
        lb::regularize::<D2Q9, 2, 9, 0>(&mut f, 0.05, &j, j_sqr, &pi);
        let external = [0.0; 0];
        let raw = dynamics.decompose(&f, &external, 1);
        let mut f2 = [0.0; 9];
        let mut ext2 = [0.0; 0];
        dynamics.recompose(&mut f2, &mut ext2, &raw, 1);
        for i in 0..9 {
            assert!((f[i] - f2[i]).abs() < 1e-13, "population {i}");
        }
    }

    #[test]
    fn guo_velocity_includes_half_force() {
        let dynamics: Dynamics<ForcedD2Q9, 2, 9, 2> = Dynamics::guo_force_bgk(1.0);
        let mut f = [0.0; 9];
        let j = [0.0, 0.0];
        let j_sqr = 0.0;
        for i in 0..9 {
            f[i] = lb::bgk_equilibrium::<ForcedD2Q9, 2, 9, 2>(i, 0.0, 1.0, &j, j_sqr);
        }
        let external = [1e-3, 0.0];
        let u = dynamics.compute_velocity(&f, &external);
        assert!((u[0] - 5e-4).abs() < 1e-15);
        assert!(u[1].abs() < 1e-15);
    }

    #[test]
    fn smagorinsky_reduces_to_bgk_at_zero_stress() {
        let d_smago: Dynamics<D2Q9, 2, 9, 0> = Dynamics::smagorinsky_bgk(1.2, 0.14);
        let d_bgk: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bgk(1.2);
        let j = [0.03, 0.02];
        let j_sqr = lb::norm_sqr(&j);
        let mut f1 = [0.0; 9];
        for i in 0..9 {
            f1[i] = lb::bgk_equilibrium::<D2Q9, 2, 9, 0>(i, 0.0, 1.0, &j, j_sqr);
        }
        let mut f2 = f1;
        let mut external = [0.0; 0];
        let mut stats = seeded_stats();
        d_smago.collide(&mut f1, &mut external, false, &mut stats);
        d_bgk.collide(&mut f2, &mut external, false, &mut stats);
        for i in 0..9 {
            assert!((f1[i] - f2[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn composite_base_replacement() {
        let composite: Dynamics<D2Q9, 2, 9, 0> = Dynamics::boundary(
            BoundaryClosure::RegularizedVelocity {
                direction: 1,
                orientation: 1,
            },
            Dynamics::no_dynamics(),
        );
        let rebased = composite.with_new_base(Dynamics::bgk(1.4));
        assert!((rebased.omega() - 1.4).abs() < 1e-15);
        assert!(matches!(
            rebased.base_dynamics(),
            Some(Dynamics::Bgk { .. })
        ));
    }
}

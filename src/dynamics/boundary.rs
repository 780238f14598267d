//! Boundary composite dynamics.
//!
//! A boundary cell has populations that never receive a streamed value
//! (those pointing away from the wall into the fluid). A
//! [`BoundaryDynamics`] wraps a bulk operator and, before every collision,
//! runs a completion scheme that reconstructs the missing populations from
//! the imposed boundary data. Moment queries never see the incomplete
//! populations: they are answered either analytically from the imposed data
//! or from a completed temporary copy.

use super::Dynamics;
use crate::core::statistics::BlockStatistics;
use crate::descriptor::Descriptor;
use crate::lb::{self, index, moments, StressVector};
use crate::Scalar;
use std::marker::PhantomData;

/// Imposed boundary values, interpreted according to the closure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryData<const D: usize> {
    pub rho_bar: Scalar,
    pub u: [Scalar; D],
    pub theta_bar: Scalar,
}

impl<const D: usize> Default for BoundaryData<D> {
    fn default() -> Self {
        BoundaryData {
            rho_bar: 0.0,
            u: [0.0; D],
            theta_bar: 0.0,
        }
    }
}

/// Completion scheme of a boundary cell. Flat-wall closures carry the wall
/// axis and the outward normal sign; corner and edge closures carry the
/// normal tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryClosure {
    /// Velocity Dirichlet, populations rebuilt by regularization.
    RegularizedVelocity { direction: usize, orientation: i64 },
    /// Density Dirichlet, populations rebuilt by regularization.
    RegularizedDensity { direction: usize, orientation: i64 },
    /// Velocity Dirichlet, populations replaced by equilibrium.
    EquilibriumVelocity { direction: usize, orientation: i64 },
    /// Density Dirichlet, populations replaced by equilibrium.
    EquilibriumDensity { direction: usize, orientation: i64 },
    /// Velocity Dirichlet with no local completion; a finite-difference
    /// processor rebuilds the cell.
    VelocityDirichlet { direction: usize, orientation: i64 },
    /// Density Dirichlet with no local completion.
    DensityDirichlet { direction: usize, orientation: i64 },
    /// Non-equilibrium bounce-back closure of Zou and He.
    ZouHeVelocity { direction: usize, orientation: i64 },
    ZouHePressure { direction: usize, orientation: i64 },
    /// Analytical closure of Inamuro (two-dimensional lattices).
    InamuroVelocity { direction: usize, orientation: i64 },
    InamuroPressure { direction: usize, orientation: i64 },
    /// Plain velocity storage for outer edges and corners; a processor
    /// rebuilds the cell.
    StoreVelocity,
    StoreDensityAndVelocity,
    StoreTemperatureAndVelocity,
    /// Inner (concave) 2D corner: moments averaged over the two adjoining
    /// flat walls.
    InnerCornerVelocity2D { x_normal: i64, y_normal: i64 },
    /// Inner 3D edge along `plane`, normals on the two remaining axes in
    /// cyclic order.
    InnerEdgeVelocity3D { plane: usize, normal1: i64, normal2: i64 },
    InnerCornerVelocity3D { x_normal: i64, y_normal: i64, z_normal: i64 },
    /// Scalar (temperature) Dirichlet on an advection-diffusion lattice.
    AdvectionDirichlet { direction: usize, orientation: i64 },
    RegularizedAdvectionDirichlet { direction: usize, orientation: i64 },
    /// Scalar Dirichlet on a 2D advection-diffusion corner.
    AdvectionCorner2D { x_normal: i64, y_normal: i64 },
    /// Scalar Dirichlet on a 3D advection-diffusion edge along `plane`.
    AdvectionEdge3D { plane: usize, normal1: i64, normal2: i64 },
    AdvectionCorner3D { x_normal: i64, y_normal: i64, z_normal: i64 },
}

impl BoundaryClosure {
    /// Does this closure impose a velocity (as opposed to a density)?
    fn imposes_velocity(&self) -> bool {
        use BoundaryClosure::*;
        matches!(
            self,
            RegularizedVelocity { .. }
                | EquilibriumVelocity { .. }
                | VelocityDirichlet { .. }
                | ZouHeVelocity { .. }
                | InamuroVelocity { .. }
        )
    }

    fn imposes_density(&self) -> bool {
        use BoundaryClosure::*;
        matches!(
            self,
            RegularizedDensity { .. }
                | EquilibriumDensity { .. }
                | DensityDirichlet { .. }
                | ZouHePressure { .. }
                | InamuroPressure { .. }
                | AdvectionDirichlet { .. }
                | RegularizedAdvectionDirichlet { .. }
                | AdvectionCorner2D { .. }
                | AdvectionEdge3D { .. }
                | AdvectionCorner3D { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct BoundaryDynamics<Dsc, const D: usize, const Q: usize, const E: usize>
where
    Dsc: Descriptor<D, Q, E>,
{
    pub closure: BoundaryClosure,
    pub data: BoundaryData<D>,
    pub base: Box<Dynamics<Dsc, D, Q, E>>,
    _descriptor: PhantomData<Dsc>,
}

impl<Dsc, const D: usize, const Q: usize, const E: usize> BoundaryDynamics<Dsc, D, Q, E>
where
    Dsc: Descriptor<D, Q, E>,
{
    pub fn new(closure: BoundaryClosure, base: Dynamics<Dsc, D, Q, E>) -> Self {
        BoundaryDynamics {
            closure,
            data: BoundaryData::default(),
            base: Box::new(base),
            _descriptor: PhantomData,
        }
    }

    /// Replace the wrapped base dynamics, keeping closure and data.
    pub fn replace_base(&mut self, base: Dynamics<Dsc, D, Q, E>) {
        self.base = Box::new(base);
    }

    pub fn base(&self) -> &Dynamics<Dsc, D, Q, E> {
        &self.base
    }

    /// Collision: complete the populations, then let the base collide.
    pub fn collide(
        &self,
        f: &mut [Scalar; Q],
        external: &mut [Scalar; E],
        takes_statistics: bool,
        statistics: &mut BlockStatistics,
    ) {
        self.complete_populations(f, external);
        self.base.collide(f, external, takes_statistics, statistics);
    }

    /// Run the completion scheme in place.
    pub fn complete_populations(&self, f: &mut [Scalar; Q], external: &[Scalar; E]) {
        use BoundaryClosure::*;
        match self.closure {
            RegularizedVelocity { .. } | RegularizedDensity { .. } => {
                let (direction, orientation) = self.wall_tag();
                let (rho_bar, j) = self.compute_rho_bar_j(f, external);
                let j_sqr = lb::norm_sqr(&j);
                let pi = boundary_pi_neq::<Dsc, D, Q, E>(
                    &self.base, f, direction, orientation, rho_bar, &j, j_sqr,
                );
                self.base
                    .regularize_cell(f, external, rho_bar, &j, j_sqr, &pi);
            }
            EquilibriumVelocity { .. } | EquilibriumDensity { .. } => {
                let (rho_bar, j) = self.compute_rho_bar_j(f, external);
                let j_sqr = lb::norm_sqr(&j);
                for i in 0..Q {
                    f[i] = self.base.compute_equilibrium(i, rho_bar, &j, j_sqr);
                }
            }
            ZouHeVelocity { direction, orientation }
            | ZouHePressure { direction, orientation } => {
                let (rho_bar, j) = self.compute_rho_bar_j(f, external);
                self.zou_he(f, direction, orientation, rho_bar, &j);
            }
            InamuroVelocity { direction, orientation } => {
                let rho = Dsc::full_rho(self.dirichlet_rho_bar(f, direction, orientation));
                self.inamuro(f, direction, orientation, rho, &self.data.u);
            }
            InamuroPressure { direction, orientation } => {
                let rho = Dsc::full_rho(self.data.rho_bar);
                let j = self.density_dirichlet_j(f, direction, orientation);
                let inv_rho = Dsc::inv_rho(self.data.rho_bar);
                let mut u = [0.0; D];
                for k in 0..D {
                    u[k] = j[k] * inv_rho;
                }
                self.inamuro(f, direction, orientation, rho, &u);
            }
            AdvectionDirichlet { direction, orientation } => {
                self.advection_density_closure(f, direction, orientation);
            }
            RegularizedAdvectionDirichlet { direction, orientation } => {
                self.advection_regularized_closure(f, external, direction, orientation);
            }
            AdvectionCorner2D { x_normal, y_normal } => {
                self.advection_bounce_back_closure(f, external, |c| {
                    c[0] * x_normal + c[1] * y_normal < 0
                });
            }
            AdvectionEdge3D { plane, normal1, normal2 } => {
                let axis1 = (plane + 1) % 3;
                let axis2 = (plane + 2) % 3;
                self.advection_bounce_back_closure(f, external, |c| {
                    c[axis1] == -normal1 || c[axis2] == -normal2
                });
            }
            AdvectionCorner3D { x_normal, y_normal, z_normal } => {
                let normals = [x_normal, y_normal, z_normal];
                self.advection_bounce_back_closure(f, external, |c| {
                    c.iter().zip(normals.iter()).map(|(a, b)| a * b).sum::<i64>() < 0
                });
            }
            // No local completion: either a finite-difference processor
            // rebuilds the cell, or the averaged moments are all that is
            // needed.
            VelocityDirichlet { .. }
            | DensityDirichlet { .. }
            | StoreVelocity
            | StoreDensityAndVelocity
            | StoreTemperatureAndVelocity
            | InnerCornerVelocity2D { .. }
            | InnerEdgeVelocity3D { .. }
            | InnerCornerVelocity3D { .. } => {}
        }
    }

    fn wall_tag(&self) -> (usize, i64) {
        use BoundaryClosure::*;
        match self.closure {
            RegularizedVelocity { direction, orientation }
            | RegularizedDensity { direction, orientation }
            | EquilibriumVelocity { direction, orientation }
            | EquilibriumDensity { direction, orientation }
            | VelocityDirichlet { direction, orientation }
            | DensityDirichlet { direction, orientation }
            | ZouHeVelocity { direction, orientation }
            | ZouHePressure { direction, orientation }
            | InamuroVelocity { direction, orientation }
            | InamuroPressure { direction, orientation }
            | AdvectionDirichlet { direction, orientation }
            | RegularizedAdvectionDirichlet { direction, orientation } => {
                (direction, orientation)
            }
            _ => panic!("closure has no flat-wall orientation tag"),
        }
    }

    /// Density inferred from the populations parallel to the wall and those
    /// pointing into it, given the imposed wall-normal velocity.
    fn dirichlet_rho_bar(&self, f: &[Scalar; Q], direction: usize, orientation: i64) -> Scalar {
        let mut rho_on_wall = 0.0;
        for i in index::sub_index::<Dsc, D, Q, E>(direction, 0) {
            rho_on_wall += f[i];
        }
        let mut rho_normal = 0.0;
        for i in index::sub_index::<Dsc, D, Q, E>(direction, orientation) {
            rho_normal += f[i];
        }
        let u_normal = orientation as Scalar * self.data.u[direction];
        (2.0 * rho_normal + rho_on_wall - Dsc::SKORDOS_FACTOR * u_normal) / (1.0 + u_normal)
    }

    /// Wall-normal momentum inferred from the populations, given the imposed
    /// density. Components parallel to the wall are zero by definition.
    fn density_dirichlet_j(
        &self,
        f: &[Scalar; Q],
        direction: usize,
        orientation: i64,
    ) -> [Scalar; D] {
        let mut rho_on_wall = 0.0;
        for i in index::sub_index::<Dsc, D, Q, E>(direction, 0) {
            rho_on_wall += f[i];
        }
        let mut rho_normal = 0.0;
        for i in index::sub_index::<Dsc, D, Q, E>(direction, orientation) {
            rho_normal += f[i];
        }
        let mut j = [0.0; D];
        j[direction] =
            orientation as Scalar * (2.0 * rho_normal + rho_on_wall - self.data.rho_bar);
        j
    }

    /// Zou-He completion: bounce back the off-equilibrium part of every
    /// missing population, then redistribute the residual tangential
    /// momentum over the missing populations that carry it.
    fn zou_he(
        &self,
        f: &mut [Scalar; Q],
        direction: usize,
        orientation: i64,
        rho_bar: Scalar,
        j: &[Scalar; D],
    ) {
        let j_sqr = lb::norm_sqr(j);
        let missing = index::sub_index_outgoing::<Dsc, D, Q, E>(direction, orientation);
        for &i in &missing {
            let opp = Dsc::opposite(i);
            f[i] = f[opp] - self.base.compute_equilibrium(opp, rho_bar, j, j_sqr)
                + self.base.compute_equilibrium(i, rho_bar, j, j_sqr);
        }
        let j_now = moments::get_j::<Dsc, D, Q, E>(f);
        for dim in 0..D {
            if dim == direction {
                continue;
            }
            let carriers: Vec<usize> = missing
                .iter()
                .copied()
                .filter(|&i| Dsc::C[i][dim] != 0)
                .collect();
            if carriers.is_empty() {
                continue;
            }
            let correction = (j[dim] - j_now[dim]) / carriers.len() as Scalar;
            for i in carriers {
                f[i] += correction * Dsc::C[i][dim].signum() as Scalar;
            }
        }
    }

    /// Analytical closure of Inamuro et al.: a counter-slip density and
    /// tangential momentum are solved for such that the equilibrium values
    /// of the missing populations restore the imposed wall moments.
    fn inamuro(
        &self,
        f: &mut [Scalar; Q],
        direction: usize,
        orientation: i64,
        rho: Scalar,
        u: &[Scalar; D],
    ) {
        assert!(D == 2, "the analytical Inamuro closure is two-dimensional");
        let tangent = (direction + 1) % 2;
        let orient = orientation as Scalar;

        let missing = index::sub_index_outgoing::<Dsc, D, Q, E>(direction, orientation);
        // Missing populations that are not normal to the wall.
        let missing_diag: Vec<usize> = missing
            .iter()
            .copied()
            .filter(|&i| {
                let mut non_null = 0;
                for k in 0..D {
                    non_null += Dsc::C[i][k].abs();
                }
                non_null != 1
            })
            .collect();
        // Populations orthogonal to the wall normal, rest vector excluded.
        let perp: Vec<usize> = index::sub_index::<Dsc, D, Q, E>(direction, 0)
            .into_iter()
            .filter(|&i| !(Dsc::C[i][0] == 0 && Dsc::C[i][1] == 0))
            .collect();

        let mut f_sum = 0.0;
        for &i in &missing {
            f_sum += f[Dsc::opposite(i)];
        }
        // The +1 in the numerator accounts for the rescaled populations
        // (f_eq here is the usual one minus t_i).
        let rho_cs = (6.0 * (-orient * rho * u[direction] + f_sum) + 1.0)
            / (3.0 * u[direction] * u[direction] - orient * 3.0 * u[direction] + 1.0);

        let mut f_diff_perp = 0.0;
        for &i in &perp {
            f_diff_perp += Dsc::C[i][tangent] as Scalar * f[i];
        }
        f_diff_perp *= orient;

        let mut f_diff_diag = 0.0;
        for &i in &missing_diag {
            let opp = Dsc::opposite(i);
            f_diff_diag += Dsc::C[opp][tangent] as Scalar * f[opp];
        }
        f_diff_diag *= orient;

        let mut j_cs = [0.0; D];
        j_cs[tangent] = (-orient * 6.0 * rho * u[tangent] + orient * rho_cs * u[tangent]
            - 3.0 * rho_cs * u[direction] * u[tangent]
            + 6.0 * (f_diff_perp + f_diff_diag))
            / (-orient + 3.0 * u[direction]);
        for k in 0..D {
            j_cs[k] += rho_cs * u[k];
        }
        let j_sqr = lb::norm_sqr(&j_cs);
        for &i in &missing {
            f[i] = self
                .base
                .compute_equilibrium(i, Dsc::rho_bar(rho_cs), &j_cs, j_sqr);
        }
    }

    /// Scalar Dirichlet: the single missing wall-normal population absorbs
    /// the imposed density.
    fn advection_density_closure(&self, f: &mut [Scalar; Q], direction: usize, orientation: i64) {
        let missing = index::sub_index_outgoing::<Dsc, D, Q, E>(direction, orientation);
        let missing_normal = missing
            .iter()
            .copied()
            .find(|&i| {
                let mut non_null = 0;
                for k in 0..D {
                    non_null += Dsc::C[i][k].abs();
                }
                non_null == 1
            })
            .expect("no wall-normal population among the unknowns");
        let known = index::remaining_indexes::<Dsc, D, Q, E>(&missing);
        let mut sum = 0.0;
        for i in known {
            sum += f[i];
        }
        f[missing_normal] = self.data.rho_bar - sum;
    }

    /// Scalar Dirichlet with the off-equilibrium bounce-back rule
    /// `fneq_i = -fneq_opposite(i)`.
    fn advection_regularized_closure(
        &self,
        f: &mut [Scalar; Q],
        external: &[Scalar; E],
        direction: usize,
        orientation: i64,
    ) {
        let rho_bar = self.data.rho_bar;
        let j_eq = lb::advection::get_j_eq::<Dsc, D, Q, E>(external, rho_bar);
        let missing = index::sub_index_outgoing::<Dsc, D, Q, E>(direction, orientation);
        let missing_normal = missing
            .iter()
            .copied()
            .find(|&i| {
                let mut non_null = 0;
                for k in 0..D {
                    non_null += Dsc::C[i][k].abs();
                }
                non_null == 1
            })
            .expect("no wall-normal population among the unknowns");
        let opp = Dsc::opposite(missing_normal);
        f[missing_normal] =
            lb::advection::ma1_equilibrium::<Dsc, D, Q, E>(missing_normal, rho_bar, &j_eq)
                - (f[opp] - lb::advection::ma1_equilibrium::<Dsc, D, Q, E>(opp, rho_bar, &j_eq));
    }

    /// Edge and corner variant of the scalar Dirichlet closure: every
    /// population that `is_unknown` identifies (those streaming out of the
    /// wall, against the outward normals) is rebuilt by off-equilibrium
    /// bounce-back.
    fn advection_bounce_back_closure<F>(
        &self,
        f: &mut [Scalar; Q],
        external: &[Scalar; E],
        is_unknown: F,
    ) where
        F: Fn(&[i64; D]) -> bool,
    {
        let rho_bar = self.data.rho_bar;
        let j_eq = lb::advection::get_j_eq::<Dsc, D, Q, E>(external, rho_bar);
        for i in 1..Q {
            if is_unknown(&Dsc::C[i]) {
                let opp = Dsc::opposite(i);
                f[i] = lb::advection::ma1_equilibrium::<Dsc, D, Q, E>(i, rho_bar, &j_eq)
                    - (f[opp] - lb::advection::ma1_equilibrium::<Dsc, D, Q, E>(opp, rho_bar, &j_eq));
            }
        }
    }

    fn completed(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> [Scalar; Q] {
        let mut tmp = *f;
        self.complete_populations(&mut tmp, external);
        tmp
    }

    pub fn compute_rho_bar(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        use BoundaryClosure::*;
        if self.closure.imposes_density() {
            return self.data.rho_bar;
        }
        if self.closure.imposes_velocity() {
            let (direction, orientation) = self.wall_tag();
            return self.dirichlet_rho_bar(f, direction, orientation);
        }
        match self.closure {
            InnerCornerVelocity2D { x_normal, y_normal } => {
                0.5 * (self.dirichlet_rho_bar(f, 0, x_normal)
                    + self.dirichlet_rho_bar(f, 1, y_normal))
            }
            InnerEdgeVelocity3D { plane, normal1, normal2 } => {
                0.5 * (self.dirichlet_rho_bar(f, (plane + 1) % 3, normal1)
                    + self.dirichlet_rho_bar(f, (plane + 2) % 3, normal2))
            }
            InnerCornerVelocity3D { x_normal, y_normal, z_normal } => {
                (self.dirichlet_rho_bar(f, 0, x_normal)
                    + self.dirichlet_rho_bar(f, 1, y_normal)
                    + self.dirichlet_rho_bar(f, 2, z_normal))
                    / 3.0
            }
            StoreDensityAndVelocity => self.data.rho_bar,
            _ => {
                let tmp = self.completed(f, external);
                self.base.compute_rho_bar(&tmp, external)
            }
        }
    }

    pub fn compute_velocity(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> [Scalar; D] {
        use BoundaryClosure::*;
        if self.closure.imposes_velocity() {
            return self.data.u;
        }
        match self.closure {
            StoreVelocity
            | StoreDensityAndVelocity
            | StoreTemperatureAndVelocity
            | InnerCornerVelocity2D { .. }
            | InnerEdgeVelocity3D { .. }
            | InnerCornerVelocity3D { .. } => self.data.u,
            RegularizedDensity { direction, orientation }
            | EquilibriumDensity { direction, orientation }
            | DensityDirichlet { direction, orientation }
            | ZouHePressure { direction, orientation }
            | InamuroPressure { direction, orientation } => {
                let j = self.density_dirichlet_j(f, direction, orientation);
                let inv_rho = Dsc::inv_rho(self.data.rho_bar);
                let mut u = [0.0; D];
                for k in 0..D {
                    u[k] = j[k] * inv_rho;
                }
                u
            }
            _ => {
                let tmp = self.completed(f, external);
                self.base.compute_velocity(&tmp, external)
            }
        }
    }

    pub fn compute_rho_bar_j(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> (Scalar, [Scalar; D]) {
        use BoundaryClosure::*;
        match self.closure {
            RegularizedDensity { direction, orientation }
            | EquilibriumDensity { direction, orientation }
            | DensityDirichlet { direction, orientation }
            | ZouHePressure { direction, orientation }
            | InamuroPressure { direction, orientation } => (
                self.data.rho_bar,
                self.density_dirichlet_j(f, direction, orientation),
            ),
            AdvectionDirichlet { .. }
            | RegularizedAdvectionDirichlet { .. }
            | AdvectionCorner2D { .. } => {
                let tmp = self.completed(f, external);
                let rho = Dsc::full_rho(self.data.rho_bar);
                let u = self.base.compute_velocity(&tmp, external);
                let mut j = [0.0; D];
                for k in 0..D {
                    j[k] = rho * u[k];
                }
                (self.data.rho_bar, j)
            }
            _ => {
                let rho_bar = self.compute_rho_bar(f, external);
                let rho = Dsc::full_rho(rho_bar);
                let u = self.compute_velocity(f, external);
                let mut j = [0.0; D];
                for k in 0..D {
                    j[k] = rho * u[k];
                }
                (rho_bar, j)
            }
        }
    }

    pub fn compute_rho_bar_j_pi_neq(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> (Scalar, [Scalar; D], StressVector) {
        let tmp = self.completed(f, external);
        self.base.compute_rho_bar_j_pi_neq(&tmp, external)
    }

    pub fn compute_temperature(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        if let BoundaryClosure::StoreTemperatureAndVelocity = self.closure {
            return self.data.theta_bar + 1.0;
        }
        let tmp = self.completed(f, external);
        self.base.compute_temperature(&tmp, external)
    }

    pub fn compute_deviatoric_stress(
        &self,
        f: &[Scalar; Q],
        external: &[Scalar; E],
    ) -> StressVector {
        let tmp = self.completed(f, external);
        self.base.compute_deviatoric_stress(&tmp, external)
    }

    pub fn compute_heat_flux(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> [Scalar; D] {
        let tmp = self.completed(f, external);
        self.base.compute_heat_flux(&tmp, external)
    }

    pub fn compute_e_bar(&self, f: &[Scalar; Q], external: &[Scalar; E]) -> Scalar {
        let tmp = self.completed(f, external);
        self.base.compute_e_bar(&tmp, external)
    }

    pub fn define_density(&mut self, rho: Scalar) {
        self.data.rho_bar = Dsc::rho_bar(rho);
    }

    pub fn define_velocity(&mut self, u: [Scalar; D]) {
        self.data.u = u;
    }

    pub fn define_temperature(&mut self, theta: Scalar) {
        self.data.theta_bar = theta - 1.0;
    }
}

/// Off-equilibrium stress of a flat boundary cell: the off-equilibrium part
/// of the populations pointing into the wall is counted twice, standing in
/// for their unknown opposites (bounce-back of the off-equilibrium part).
pub fn boundary_pi_neq<Dsc, const D: usize, const Q: usize, const E: usize>(
    dynamics: &Dynamics<Dsc, D, Q, E>,
    f: &[Scalar; Q],
    direction: usize,
    orientation: i64,
    rho_bar: Scalar,
    j: &[Scalar; D],
    j_sqr: Scalar,
) -> StressVector
where
    Dsc: Descriptor<D, Q, E>,
{
    let on_wall = index::sub_index::<Dsc, D, Q, E>(direction, 0);
    let normal = index::sub_index::<Dsc, D, Q, E>(direction, orientation);

    let mut f_neq = [0.0; Q];
    for &i in &on_wall {
        f_neq[i] = f[i] - dynamics.compute_equilibrium(i, rho_bar, j, j_sqr);
    }
    for &i in &normal {
        f_neq[i] = f[i] - dynamics.compute_equilibrium(i, rho_bar, j, j_sqr);
    }

    let mut pi = [0.0; 6];
    let mut ind = 0;
    for a in 0..D {
        for b in a..D {
            let mut acc = 0.0;
            for &i in &on_wall {
                acc += (Dsc::C[i][a] * Dsc::C[i][b]) as Scalar * f_neq[i];
            }
            for &i in &normal {
                acc += 2.0 * (Dsc::C[i][a] * Dsc::C[i][b]) as Scalar * f_neq[i];
            }
            pi[ind] = acc;
            ind += 1;
        }
    }
    pi
}

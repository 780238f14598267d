//! Finite-difference boundary closures in 2D.
//!
//! The interpolation (non-local) boundary condition leaves the boundary
//! cells' populations untouched during collision and rebuilds them here,
//! after streaming: the velocity gradients are evaluated with one-sided
//! differences into the fluid, converted to an off-equilibrium stress, and
//! the populations are regularized from `(rho, j, Pi)`.

use super::{BoxedScope2D, LatticeProcessor2D, ProcessorGenerator2D};
use crate::core::geometry::Box2D;
use crate::descriptor::Descriptor;
use crate::lattice::BlockLattice2D;
use crate::lb::{self, off_equilibrium, sym2};
use crate::Scalar;

/// Second-order one-sided first derivative at the wall, oriented along the
/// positive axis.
#[inline]
fn one_sided<Dsc, const Q: usize, const E: usize>(
    lattice: &BlockLattice2D<Dsc, Q, E>,
    x: i64,
    y: i64,
    axis: usize,
    orientation: i64,
) -> [Scalar; 2]
where
    Dsc: Descriptor<2, Q, E>,
{
    let (sx, sy) = if axis == 0 { (1, 0) } else { (0, 1) };
    let u0 = lattice.compute_velocity(x, y);
    let u1 = lattice.compute_velocity(x - orientation * sx, y - orientation * sy);
    let u2 = lattice.compute_velocity(x - 2 * orientation * sx, y - 2 * orientation * sy);
    let mut deriv = [0.0; 2];
    for k in 0..2 {
        deriv[k] = -(orientation as Scalar) * (-3.0 * u0[k] + 4.0 * u1[k] - u2[k]) / 2.0;
    }
    deriv
}

/// Central first derivative along `axis`.
#[inline]
fn central<Dsc, const Q: usize, const E: usize>(
    lattice: &BlockLattice2D<Dsc, Q, E>,
    x: i64,
    y: i64,
    axis: usize,
) -> [Scalar; 2]
where
    Dsc: Descriptor<2, Q, E>,
{
    let (sx, sy) = if axis == 0 { (1, 0) } else { (0, 1) };
    let u_p = lattice.compute_velocity(x + sx, y + sy);
    let u_m = lattice.compute_velocity(x - sx, y - sy);
    let mut deriv = [0.0; 2];
    for k in 0..2 {
        deriv[k] = (u_p[k] - u_m[k]) / 2.0;
    }
    deriv
}

/// Rebuild a cell from `(rho, u, Pi)` by the regularized formula.
fn regularize_cell<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    x: i64,
    y: i64,
    rho: Scalar,
    u: [Scalar; 2],
    pi: lb::StressVector,
) where
    Dsc: Descriptor<2, Q, E>,
{
    let j = [rho * u[0], rho * u[1]];
    let j_sqr = lb::norm_sqr(&j);
    let rho_bar = Dsc::rho_bar(rho);
    let mut new_f = [0.0; Q];
    {
        let dynamics = lattice.dynamics_at(x, y);
        for i in 0..Q {
            new_f[i] = dynamics.compute_equilibrium(i, rho_bar, &j, j_sqr)
                + off_equilibrium::fneq_from_pi::<Dsc, 2, Q, E>(i, &pi);
        }
    }
    lattice.cell_mut(x, y).populations_mut().copy_from_slice(&new_f);
}

/// Straight-wall finite-difference closure.
pub struct StraightFdBoundary2D {
    domain: Box2D,
    direction: usize,
    orientation: i64,
}

impl StraightFdBoundary2D {
    pub fn new(domain: Box2D, direction: usize, orientation: i64) -> Self {
        assert!(
            domain.x0 == domain.x1 || domain.y0 == domain.y1,
            "a straight boundary is one cell thick"
        );
        StraightFdBoundary2D {
            domain,
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E> for StraightFdBoundary2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                let rho = lattice.compute_density(x, y);
                let u = lattice.compute_velocity(x, y);
                let grad = |axis: usize| {
                    if axis == self.direction {
                        one_sided(lattice, x, y, axis, self.orientation)
                    } else {
                        central(lattice, x, y, axis)
                    }
                };
                let dx_u = grad(0);
                let dy_u = grad(1);
                let omega = lattice.dynamics_at(x, y).omega();
                let s_to_pi = -rho / Dsc::INV_CS2 / omega;
                let mut pi = [0.0; 6];
                pi[sym2::XX] = 2.0 * dx_u[0] * s_to_pi;
                pi[sym2::YY] = 2.0 * dy_u[1] * s_to_pi;
                pi[sym2::XY] = (dx_u[1] + dy_u[0]) * s_to_pi;
                regularize_cell(lattice, x, y, rho, u, pi);
            }
        }
    }
}

pub struct StraightFdBoundaryGenerator2D {
    scope: BoxedScope2D,
    direction: usize,
    orientation: i64,
}

impl StraightFdBoundaryGenerator2D {
    pub fn new(domain: Box2D, direction: usize, orientation: i64) -> Self {
        StraightFdBoundaryGenerator2D {
            scope: BoxedScope2D::new(domain),
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for StraightFdBoundaryGenerator2D
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
        Box::new(StraightFdBoundary2D::new(
            self.scope.domain,
            self.direction,
            self.orientation,
        ))
    }
}

/// Outer (convex) corner closure: density is extrapolated from the two
/// adjoining wall cells, the gradients are one-sided along both axes.
pub struct OuterVelocityCorner2D {
    x: i64,
    y: i64,
    x_normal: i64,
    y_normal: i64,
}

impl OuterVelocityCorner2D {
    pub fn new(x: i64, y: i64, x_normal: i64, y_normal: i64) -> Self {
        OuterVelocityCorner2D {
            x,
            y,
            x_normal,
            y_normal,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E> for OuterVelocityCorner2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        let (x, y) = (self.x, self.y);
        let rho10 = lattice.compute_density(x - self.x_normal, y);
        let rho01 = lattice.compute_density(x, y - self.y_normal);
        let rho = 0.5 * (rho01 + rho10);

        let dx_u = one_sided(lattice, x, y, 0, self.x_normal);
        let dy_u = one_sided(lattice, x, y, 1, self.y_normal);
        let omega = lattice.dynamics_at(x, y).omega();
        let s_to_pi = -rho / Dsc::INV_CS2 / omega;
        let mut pi = [0.0; 6];
        pi[sym2::XX] = 2.0 * dx_u[0] * s_to_pi;
        pi[sym2::YY] = 2.0 * dy_u[1] * s_to_pi;
        pi[sym2::XY] = (dx_u[1] + dy_u[0]) * s_to_pi;

        let u = lattice.compute_velocity(x, y);
        regularize_cell(lattice, x, y, rho, u, pi);
    }
}

pub struct OuterVelocityCornerGenerator2D {
    scope: BoxedScope2D,
    x_normal: i64,
    y_normal: i64,
}

impl OuterVelocityCornerGenerator2D {
    pub fn new(x: i64, y: i64, x_normal: i64, y_normal: i64) -> Self {
        OuterVelocityCornerGenerator2D {
            scope: BoxedScope2D::new(Box2D::new(x, x, y, y)),
            x_normal,
            y_normal,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for OuterVelocityCornerGenerator2D
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
        Box::new(OuterVelocityCorner2D::new(
            self.scope.domain.x0,
            self.scope.domain.y0,
            self.x_normal,
            self.y_normal,
        ))
    }
}

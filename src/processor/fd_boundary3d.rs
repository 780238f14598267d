//! Finite-difference boundary closures in 3D: flat plates, outer edges and
//! outer corners.

use super::{BoxedScope3D, LatticeProcessor3D, ProcessorGenerator3D};
use crate::core::geometry::Box3D;
use crate::descriptor::Descriptor;
use crate::lattice::BlockLattice3D;
use crate::lb::{self, off_equilibrium, sym3};
use crate::Scalar;

#[inline]
fn unit(axis: usize) -> [i64; 3] {
    let mut e = [0; 3];
    e[axis] = 1;
    e
}

#[inline]
fn one_sided<Dsc, const Q: usize, const E: usize>(
    lattice: &BlockLattice3D<Dsc, Q, E>,
    x: i64,
    y: i64,
    z: i64,
    axis: usize,
    orientation: i64,
) -> [Scalar; 3]
where
    Dsc: Descriptor<3, Q, E>,
{
    let e = unit(axis);
    let u0 = lattice.compute_velocity(x, y, z);
    let u1 = lattice.compute_velocity(
        x - orientation * e[0],
        y - orientation * e[1],
        z - orientation * e[2],
    );
    let u2 = lattice.compute_velocity(
        x - 2 * orientation * e[0],
        y - 2 * orientation * e[1],
        z - 2 * orientation * e[2],
    );
    let mut deriv = [0.0; 3];
    for k in 0..3 {
        deriv[k] = -(orientation as Scalar) * (-3.0 * u0[k] + 4.0 * u1[k] - u2[k]) / 2.0;
    }
    deriv
}

#[inline]
fn central<Dsc, const Q: usize, const E: usize>(
    lattice: &BlockLattice3D<Dsc, Q, E>,
    x: i64,
    y: i64,
    z: i64,
    axis: usize,
) -> [Scalar; 3]
where
    Dsc: Descriptor<3, Q, E>,
{
    let e = unit(axis);
    let u_p = lattice.compute_velocity(x + e[0], y + e[1], z + e[2]);
    let u_m = lattice.compute_velocity(x - e[0], y - e[1], z - e[2]);
    let mut deriv = [0.0; 3];
    for k in 0..3 {
        deriv[k] = (u_p[k] - u_m[k]) / 2.0;
    }
    deriv
}

/// Assemble the off-equilibrium stress from the velocity-gradient rows
/// `grad[a][b] = d_a u_b` and rebuild the cell.
fn regularize_cell<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    x: i64,
    y: i64,
    z: i64,
    rho: Scalar,
    u: [Scalar; 3],
    grad: [[Scalar; 3]; 3],
) where
    Dsc: Descriptor<3, Q, E>,
{
    let omega = lattice.dynamics_at(x, y, z).omega();
    let s_to_pi = -rho / Dsc::INV_CS2 / omega;
    let mut pi = [0.0; 6];
    pi[sym3::XX] = 2.0 * grad[0][0] * s_to_pi;
    pi[sym3::YY] = 2.0 * grad[1][1] * s_to_pi;
    pi[sym3::ZZ] = 2.0 * grad[2][2] * s_to_pi;
    pi[sym3::XY] = (grad[0][1] + grad[1][0]) * s_to_pi;
    pi[sym3::XZ] = (grad[0][2] + grad[2][0]) * s_to_pi;
    pi[sym3::YZ] = (grad[1][2] + grad[2][1]) * s_to_pi;

    let j = [rho * u[0], rho * u[1], rho * u[2]];
    let j_sqr = lb::norm_sqr(&j);
    let rho_bar = Dsc::rho_bar(rho);
    let mut new_f = [0.0; Q];
    {
        let dynamics = lattice.dynamics_at(x, y, z);
        for i in 0..Q {
            new_f[i] = dynamics.compute_equilibrium(i, rho_bar, &j, j_sqr)
                + off_equilibrium::fneq_from_pi::<Dsc, 3, Q, E>(i, &pi);
        }
    }
    lattice
        .cell_mut(x, y, z)
        .populations_mut()
        .copy_from_slice(&new_f);
}

/// Flat-plate finite-difference closure.
pub struct PlaneFdBoundary3D {
    domain: Box3D,
    direction: usize,
    orientation: i64,
}

impl PlaneFdBoundary3D {
    pub fn new(domain: Box3D, direction: usize, orientation: i64) -> Self {
        assert!(
            domain.x0 == domain.x1 || domain.y0 == domain.y1 || domain.z0 == domain.z1,
            "a plane boundary is one cell thick"
        );
        PlaneFdBoundary3D {
            domain,
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E> for PlaneFdBoundary3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        let d = self.domain;
        for x in d.x0..=d.x1 {
            for y in d.y0..=d.y1 {
                for z in d.z0..=d.z1 {
                    let rho = lattice.compute_density(x, y, z);
                    let u = lattice.compute_velocity(x, y, z);
                    let mut grad = [[0.0; 3]; 3];
                    for axis in 0..3 {
                        grad[axis] = if axis == self.direction {
                            one_sided(lattice, x, y, z, axis, self.orientation)
                        } else {
                            central(lattice, x, y, z, axis)
                        };
                    }
                    regularize_cell(lattice, x, y, z, rho, u, grad);
                }
            }
        }
    }
}

pub struct PlaneFdBoundaryGenerator3D {
    scope: BoxedScope3D,
    direction: usize,
    orientation: i64,
}

impl PlaneFdBoundaryGenerator3D {
    pub fn new(domain: Box3D, direction: usize, orientation: i64) -> Self {
        PlaneFdBoundaryGenerator3D {
            scope: BoxedScope3D::new(domain),
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for PlaneFdBoundaryGenerator3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64, dz: i64) {
        self.scope.shift(dx, dy, dz);
    }

    fn multiply(&mut self, scale: i64) {
        self.scope.multiply(scale);
    }

    fn divide(&mut self, scale: i64) {
        self.scope.divide(scale);
    }

    fn extract(&mut self, sub_domain: Box3D) -> bool {
        self.scope.extract(sub_domain)
    }

    fn generate(&self) -> Box<dyn LatticeProcessor3D<Dsc, Q, E>> {
        Box::new(PlaneFdBoundary3D::new(
            self.scope.domain,
            self.direction,
            self.orientation,
        ))
    }
}

/// Outer-edge closure: the edge runs along `plane`; `normal1` and `normal2`
/// are the outward normals on the next two axes in cyclic order.
pub struct OuterVelocityEdge3D {
    domain: Box3D,
    plane: usize,
    normal1: i64,
    normal2: i64,
}

impl OuterVelocityEdge3D {
    pub fn new(domain: Box3D, plane: usize, normal1: i64, normal2: i64) -> Self {
        OuterVelocityEdge3D {
            domain,
            plane,
            normal1,
            normal2,
        }
    }

    fn neighbor_rho<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &BlockLattice3D<Dsc, Q, E>,
        x: i64,
        y: i64,
        z: i64,
        step1: i64,
        step2: i64,
    ) -> Scalar
    where
        Dsc: Descriptor<3, Q, E>,
    {
        let direction1 = (self.plane + 1) % 3;
        let direction2 = (self.plane + 2) % 3;
        let mut coords = [x, y, z];
        coords[direction1] -= self.normal1 * step1;
        coords[direction2] -= self.normal2 * step2;
        lattice.compute_density(coords[0], coords[1], coords[2])
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E> for OuterVelocityEdge3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        let direction1 = (self.plane + 1) % 3;
        let direction2 = (self.plane + 2) % 3;
        let d = self.domain;
        for x in d.x0..=d.x1 {
            for y in d.y0..=d.y1 {
                for z in d.z0..=d.z1 {
                    // Second-order extrapolation of the density from the two
                    // wall directions.
                    let rho10 = self.neighbor_rho(lattice, x, y, z, 1, 0);
                    let rho01 = self.neighbor_rho(lattice, x, y, z, 0, 1);
                    let rho20 = self.neighbor_rho(lattice, x, y, z, 2, 0);
                    let rho02 = self.neighbor_rho(lattice, x, y, z, 0, 2);
                    let rho = 2.0 / 3.0 * (rho01 + rho10) - 1.0 / 6.0 * (rho02 + rho20);

                    let mut grad = [[0.0; 3]; 3];
                    grad[self.plane] = central(lattice, x, y, z, self.plane);
                    grad[direction1] = one_sided(lattice, x, y, z, direction1, self.normal1);
                    grad[direction2] = one_sided(lattice, x, y, z, direction2, self.normal2);

                    let u = lattice.compute_velocity(x, y, z);
                    regularize_cell(lattice, x, y, z, rho, u, grad);
                }
            }
        }
    }
}

pub struct OuterVelocityEdgeGenerator3D {
    scope: BoxedScope3D,
    plane: usize,
    normal1: i64,
    normal2: i64,
}

impl OuterVelocityEdgeGenerator3D {
    pub fn new(domain: Box3D, plane: usize, normal1: i64, normal2: i64) -> Self {
        OuterVelocityEdgeGenerator3D {
            scope: BoxedScope3D::new(domain),
            plane,
            normal1,
            normal2,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for OuterVelocityEdgeGenerator3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64, dz: i64) {
        self.scope.shift(dx, dy, dz);
    }

    fn multiply(&mut self, scale: i64) {
        self.scope.multiply(scale);
    }

    fn divide(&mut self, scale: i64) {
        self.scope.divide(scale);
    }

    fn extract(&mut self, sub_domain: Box3D) -> bool {
        self.scope.extract(sub_domain)
    }

    fn generate(&self) -> Box<dyn LatticeProcessor3D<Dsc, Q, E>> {
        Box::new(OuterVelocityEdge3D::new(
            self.scope.domain,
            self.plane,
            self.normal1,
            self.normal2,
        ))
    }
}

/// Outer-corner closure.
pub struct OuterVelocityCorner3D {
    x: i64,
    y: i64,
    z: i64,
    normals: [i64; 3],
}

impl OuterVelocityCorner3D {
    pub fn new(x: i64, y: i64, z: i64, normals: [i64; 3]) -> Self {
        OuterVelocityCorner3D { x, y, z, normals }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E> for OuterVelocityCorner3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        let (x, y, z) = (self.x, self.y, self.z);
        let rho100 = lattice.compute_density(x - self.normals[0], y, z);
        let rho010 = lattice.compute_density(x, y - self.normals[1], z);
        let rho001 = lattice.compute_density(x, y, z - self.normals[2]);
        let rho = (rho100 + rho010 + rho001) / 3.0;

        let mut grad = [[0.0; 3]; 3];
        for axis in 0..3 {
            grad[axis] = one_sided(lattice, x, y, z, axis, self.normals[axis]);
        }
        let u = lattice.compute_velocity(x, y, z);
        regularize_cell(lattice, x, y, z, rho, u, grad);
    }
}

pub struct OuterVelocityCornerGenerator3D {
    scope: BoxedScope3D,
    normals: [i64; 3],
}

impl OuterVelocityCornerGenerator3D {
    pub fn new(x: i64, y: i64, z: i64, normals: [i64; 3]) -> Self {
        OuterVelocityCornerGenerator3D {
            scope: BoxedScope3D::new(Box3D::new(x, x, y, y, z, z)),
            normals,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for OuterVelocityCornerGenerator3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64, dz: i64) {
        self.scope.shift(dx, dy, dz);
    }

    fn multiply(&mut self, scale: i64) {
        self.scope.multiply(scale);
    }

    fn divide(&mut self, scale: i64) {
        self.scope.divide(scale);
    }

    fn extract(&mut self, sub_domain: Box3D) -> bool {
        self.scope.extract(sub_domain)
    }

    fn generate(&self) -> Box<dyn LatticeProcessor3D<Dsc, Q, E>> {
        let d = self.scope.domain;
        Box::new(OuterVelocityCorner3D::new(d.x0, d.y0, d.z0, self.normals))
    }
}

//! Copy-from-neighbour processors backing the Neumann-flavoured boundary
//! types: unknown populations, or velocity components, are taken from the
//! cell one step inward of the wall.

use super::{BoxedScope2D, BoxedScope3D, LatticeProcessor2D, LatticeProcessor3D};
use super::{ProcessorGenerator2D, ProcessorGenerator3D};
use crate::core::geometry::{Box2D, Box3D};
use crate::descriptor::Descriptor;
use crate::lattice::{BlockLattice2D, BlockLattice3D};
use crate::lb::index;

/// Which velocity components are copied onto the wall cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    All,
    Tangential,
    Normal,
}

fn mask<const D: usize>(u: &mut [crate::Scalar; D], normal: &[i64; D], mode: CopyMode) {
    match mode {
        CopyMode::All => {}
        CopyMode::Tangential => {
            for k in 0..D {
                if normal[k] != 0 {
                    u[k] = 0.0;
                }
            }
        }
        CopyMode::Normal => {
            for k in 0..D {
                if normal[k] == 0 {
                    u[k] = 0.0;
                }
            }
        }
    }
}

/// Copy the unknown populations of a flat wall from the inward neighbour.
pub struct CopyUnknownPopulations2D {
    domain: Box2D,
    direction: usize,
    orientation: i64,
}

impl CopyUnknownPopulations2D {
    pub fn new(domain: Box2D, direction: usize, orientation: i64) -> Self {
        CopyUnknownPopulations2D {
            domain,
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E>
    for CopyUnknownPopulations2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        let unknown = index::sub_index::<Dsc, 2, Q, E>(self.direction, -self.orientation);
        let normal_x = if self.direction == 0 { self.orientation } else { 0 };
        let normal_y = if self.direction == 1 { self.orientation } else { 0 };
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                for &i in &unknown {
                    let value = lattice.cell(x - normal_x, y - normal_y)[i];
                    lattice.cell_mut(x, y)[i] = value;
                }
            }
        }
    }
}

pub struct CopyUnknownPopulationsGenerator2D {
    scope: BoxedScope2D,
    direction: usize,
    orientation: i64,
}

impl CopyUnknownPopulationsGenerator2D {
    pub fn new(domain: Box2D, direction: usize, orientation: i64) -> Self {
        CopyUnknownPopulationsGenerator2D {
            scope: BoxedScope2D::new(domain),
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for CopyUnknownPopulationsGenerator2D
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
        Box::new(CopyUnknownPopulations2D::new(
            self.scope.domain,
            self.direction,
            self.orientation,
        ))
    }
}

/// Impose on every wall cell the (possibly masked) velocity of its inward
/// neighbour.
pub struct CopyVelocity2D {
    domain: Box2D,
    normal: [i64; 2],
    mode: CopyMode,
}

impl CopyVelocity2D {
    pub fn new(domain: Box2D, normal: [i64; 2], mode: CopyMode) -> Self {
        CopyVelocity2D { domain, normal, mode }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E> for CopyVelocity2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                let mut u = lattice.compute_velocity(x - self.normal[0], y - self.normal[1]);
                mask(&mut u, &self.normal, self.mode);
                if let Some(dynamics) = lattice.cell_mut(x, y).dynamics_mut() {
                    dynamics.define_velocity(u);
                }
            }
        }
    }
}

pub struct CopyVelocityGenerator2D {
    scope: BoxedScope2D,
    normal: [i64; 2],
    mode: CopyMode,
}

impl CopyVelocityGenerator2D {
    pub fn new(domain: Box2D, normal: [i64; 2], mode: CopyMode) -> Self {
        CopyVelocityGenerator2D {
            scope: BoxedScope2D::new(domain),
            normal,
            mode,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for CopyVelocityGenerator2D
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
        Box::new(CopyVelocity2D::new(self.scope.domain, self.normal, self.mode))
    }
}

/// Impose on every wall cell the density of its inward neighbour.
pub struct CopyDensity2D {
    domain: Box2D,
    normal: [i64; 2],
}

impl CopyDensity2D {
    pub fn new(domain: Box2D, normal: [i64; 2]) -> Self {
        CopyDensity2D { domain, normal }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E> for CopyDensity2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                let rho = lattice.compute_density(x - self.normal[0], y - self.normal[1]);
                if let Some(dynamics) = lattice.cell_mut(x, y).dynamics_mut() {
                    dynamics.define_density(rho);
                }
            }
        }
    }
}

pub struct CopyDensityGenerator2D {
    scope: BoxedScope2D,
    normal: [i64; 2],
}

impl CopyDensityGenerator2D {
    pub fn new(domain: Box2D, normal: [i64; 2]) -> Self {
        CopyDensityGenerator2D {
            scope: BoxedScope2D::new(domain),
            normal,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E>
    for CopyDensityGenerator2D
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
        Box::new(CopyDensity2D::new(self.scope.domain, self.normal))
    }
}

/// 3D variant of [`CopyUnknownPopulations2D`].
pub struct CopyUnknownPopulations3D {
    domain: Box3D,
    direction: usize,
    orientation: i64,
}

impl CopyUnknownPopulations3D {
    pub fn new(domain: Box3D, direction: usize, orientation: i64) -> Self {
        CopyUnknownPopulations3D {
            domain,
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E>
    for CopyUnknownPopulations3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        let unknown = index::sub_index::<Dsc, 3, Q, E>(self.direction, -self.orientation);
        let mut normal = [0; 3];
        normal[self.direction] = self.orientation;
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                for z in self.domain.z0..=self.domain.z1 {
                    for &i in &unknown {
                        let value = lattice.cell(x - normal[0], y - normal[1], z - normal[2])[i];
                        lattice.cell_mut(x, y, z)[i] = value;
                    }
                }
            }
        }
    }
}

pub struct CopyUnknownPopulationsGenerator3D {
    scope: BoxedScope3D,
    direction: usize,
    orientation: i64,
}

impl CopyUnknownPopulationsGenerator3D {
    pub fn new(domain: Box3D, direction: usize, orientation: i64) -> Self {
        CopyUnknownPopulationsGenerator3D {
            scope: BoxedScope3D::new(domain),
            direction,
            orientation,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for CopyUnknownPopulationsGenerator3D
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
        Box::new(CopyUnknownPopulations3D::new(
            self.scope.domain,
            self.direction,
            self.orientation,
        ))
    }
}

/// 3D variant of [`CopyVelocity2D`].
pub struct CopyVelocity3D {
    domain: Box3D,
    normal: [i64; 3],
    mode: CopyMode,
}

impl CopyVelocity3D {
    pub fn new(domain: Box3D, normal: [i64; 3], mode: CopyMode) -> Self {
        CopyVelocity3D { domain, normal, mode }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E> for CopyVelocity3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                for z in self.domain.z0..=self.domain.z1 {
                    let mut u = lattice.compute_velocity(
                        x - self.normal[0],
                        y - self.normal[1],
                        z - self.normal[2],
                    );
                    mask(&mut u, &self.normal, self.mode);
                    if let Some(dynamics) = lattice.cell_mut(x, y, z).dynamics_mut() {
                        dynamics.define_velocity(u);
                    }
                }
            }
        }
    }
}

pub struct CopyVelocityGenerator3D {
    scope: BoxedScope3D,
    normal: [i64; 3],
    mode: CopyMode,
}

impl CopyVelocityGenerator3D {
    pub fn new(domain: Box3D, normal: [i64; 3], mode: CopyMode) -> Self {
        CopyVelocityGenerator3D {
            scope: BoxedScope3D::new(domain),
            normal,
            mode,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for CopyVelocityGenerator3D
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
        Box::new(CopyVelocity3D::new(self.scope.domain, self.normal, self.mode))
    }
}

/// 3D variant of [`CopyDensity2D`].
pub struct CopyDensity3D {
    domain: Box3D,
    normal: [i64; 3],
}

impl CopyDensity3D {
    pub fn new(domain: Box3D, normal: [i64; 3]) -> Self {
        CopyDensity3D { domain, normal }
    }
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor3D<Dsc, Q, E> for CopyDensity3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>) {
        for x in self.domain.x0..=self.domain.x1 {
            for y in self.domain.y0..=self.domain.y1 {
                for z in self.domain.z0..=self.domain.z1 {
                    let rho = lattice.compute_density(
                        x - self.normal[0],
                        y - self.normal[1],
                        z - self.normal[2],
                    );
                    if let Some(dynamics) = lattice.cell_mut(x, y, z).dynamics_mut() {
                        dynamics.define_density(rho);
                    }
                }
            }
        }
    }
}

pub struct CopyDensityGenerator3D {
    scope: BoxedScope3D,
    normal: [i64; 3],
}

impl CopyDensityGenerator3D {
    pub fn new(domain: Box3D, normal: [i64; 3]) -> Self {
        CopyDensityGenerator3D {
            scope: BoxedScope3D::new(domain),
            normal,
        }
    }
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator3D<Dsc, Q, E>
    for CopyDensityGenerator3D
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
        Box::new(CopyDensity3D::new(self.scope.domain, self.normal))
    }
}

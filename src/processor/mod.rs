//! Data processors: compiled units of work over a sub-domain, run by the
//! lattice after every time step in registration order.
//!
//! A *generator* carries the un-bound spatial scope and knows how to shift,
//! rescale and intersect it while a simulation is being assembled; calling
//! [`ProcessorGenerator2D::generate`] binds it and yields the processor the
//! lattice will own. Reductive generators additionally own a statistics
//! block that survives the run so reductions can be read back.

pub mod fd_boundary2d;
pub mod fd_boundary3d;
pub mod neumann;

use crate::core::geometry::{Box2D, Box3D, DotList2D, DotList3D};
use crate::core::statistics::BlockStatistics;
use crate::descriptor::Descriptor;
use crate::lattice::{BlockLattice2D, BlockLattice3D};
use crate::Scalar;

/// Where a processor is applied when blocks carry communication envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockDomain {
    /// Skip the envelope (the default).
    #[default]
    Bulk,
    /// Include the halo cells.
    BulkAndEnvelope,
}

/// A bound unit of work over one 2D lattice.
pub trait LatticeProcessor2D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>);

    /// Neighbourhood accessed outside the domain; one for nearest-neighbour
    /// stencils.
    fn extent(&self) -> i64 {
        1
    }
}

pub trait LatticeProcessor3D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<3, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice3D<Dsc, Q, E>);

    fn extent(&self) -> i64 {
        1
    }
}

/// Un-bound factory for a [`LatticeProcessor2D`].
pub trait ProcessorGenerator2D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64);
    fn multiply(&mut self, scale: i64);
    fn divide(&mut self, scale: i64);
    /// Restrict the scope to `sub_domain`; `false` means the intersection is
    /// empty and the generator must be discarded.
    fn extract(&mut self, sub_domain: Box2D) -> bool;
    /// Adapt internal constants to new space and time scales.
    fn rescale(&mut self, _dx_scale: Scalar, _dt_scale: Scalar) {}
    fn applies_to(&self) -> BlockDomain {
        BlockDomain::Bulk
    }
    /// Which of the bound blocks the processor writes; conservative default.
    fn modification_pattern(&self, is_written: &mut [bool]) {
        for w in is_written.iter_mut() {
            *w = true;
        }
    }
    fn generate(&self) -> Box<dyn LatticeProcessor2D<Dsc, Q, E>>;
}

pub trait ProcessorGenerator3D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<3, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64, dz: i64);
    fn multiply(&mut self, scale: i64);
    fn divide(&mut self, scale: i64);
    fn extract(&mut self, sub_domain: Box3D) -> bool;
    fn rescale(&mut self, _dx_scale: Scalar, _dt_scale: Scalar) {}
    fn applies_to(&self) -> BlockDomain {
        BlockDomain::Bulk
    }
    fn modification_pattern(&self, is_written: &mut [bool]) {
        for w in is_written.iter_mut() {
            *w = true;
        }
    }
    fn generate(&self) -> Box<dyn LatticeProcessor3D<Dsc, Q, E>>;
}

/// Rectangular scope with the standard mutators; embed it in concrete
/// generators.
#[derive(Debug, Clone, Copy)]
pub struct BoxedScope2D {
    pub domain: Box2D,
}

impl BoxedScope2D {
    pub fn new(domain: Box2D) -> Self {
        BoxedScope2D { domain }
    }

    pub fn shift(&mut self, dx: i64, dy: i64) {
        self.domain = self.domain.shift(dx, dy);
    }

    pub fn multiply(&mut self, scale: i64) {
        self.domain = self.domain.multiply(scale);
    }

    pub fn divide(&mut self, scale: i64) {
        self.domain = self.domain.divide(scale);
    }

    pub fn extract(&mut self, sub_domain: Box2D) -> bool {
        match crate::core::geometry::intersect2d(self.domain, sub_domain) {
            Some(inter) => {
                self.domain = inter;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoxedScope3D {
    pub domain: Box3D,
}

impl BoxedScope3D {
    pub fn new(domain: Box3D) -> Self {
        BoxedScope3D { domain }
    }

    pub fn shift(&mut self, dx: i64, dy: i64, dz: i64) {
        self.domain = self.domain.shift(dx, dy, dz);
    }

    pub fn multiply(&mut self, scale: i64) {
        self.domain = self.domain.multiply(scale);
    }

    pub fn divide(&mut self, scale: i64) {
        self.domain = self.domain.divide(scale);
    }

    pub fn extract(&mut self, sub_domain: Box3D) -> bool {
        match crate::core::geometry::intersect3d(self.domain, sub_domain) {
            Some(inter) => {
                self.domain = inter;
                true
            }
            None => false,
        }
    }
}

/// Point-list scope with the standard mutators.
#[derive(Debug, Clone, Default)]
pub struct DottedScope2D {
    pub dots: DotList2D,
}

impl DottedScope2D {
    pub fn new(dots: DotList2D) -> Self {
        DottedScope2D { dots }
    }

    pub fn shift(&mut self, dx: i64, dy: i64) {
        self.dots = self.dots.shift(dx, dy);
    }

    pub fn multiply(&mut self, scale: i64) {
        self.dots = self.dots.multiply(scale);
    }

    pub fn divide(&mut self, scale: i64) {
        self.dots = self.dots.divide(scale);
    }

    pub fn extract(&mut self, sub_domain: Box2D) -> bool {
        match self.dots.intersect(sub_domain) {
            Some(kept) => {
                self.dots = kept;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DottedScope3D {
    pub dots: DotList3D,
}

impl DottedScope3D {
    pub fn new(dots: DotList3D) -> Self {
        DottedScope3D { dots }
    }

    pub fn shift(&mut self, dx: i64, dy: i64, dz: i64) {
        self.dots = self.dots.shift(dx, dy, dz);
    }

    pub fn multiply(&mut self, scale: i64) {
        self.dots = self.dots.multiply(scale);
    }

    pub fn divide(&mut self, scale: i64) {
        self.dots = self.dots.divide(scale);
    }

    pub fn extract(&mut self, sub_domain: Box3D) -> bool {
        match self.dots.intersect(sub_domain) {
            Some(kept) => {
                self.dots = kept;
                true
            }
            None => false,
        }
    }
}

/// A reductive processor run: the generator owns the statistics block, so
/// reductions survive the `process` call and can be read back by the caller.
pub trait ReductiveProcessorGenerator2D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64);
    fn extract(&mut self, sub_domain: Box2D) -> bool;
    /// Run the reduction against the lattice and finalise the statistics.
    fn process_and_reduce(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>);
    fn statistics(&self) -> &BlockStatistics;
}

/// Average density over a box, as a reductive processor.
pub struct AverageDensityReductive2D {
    scope: BoxedScope2D,
    statistics: BlockStatistics,
    slot: usize,
}

impl AverageDensityReductive2D {
    pub fn new(domain: Box2D) -> Self {
        let mut statistics = BlockStatistics::new();
        let slot = statistics.subscribe_average();
        AverageDensityReductive2D {
            scope: BoxedScope2D::new(domain),
            statistics,
            slot,
        }
    }

    pub fn average_density(&self) -> Scalar {
        self.statistics.get_average(self.slot)
    }
}

impl<Dsc, const Q: usize, const E: usize> ReductiveProcessorGenerator2D<Dsc, Q, E>
    for AverageDensityReductive2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn shift(&mut self, dx: i64, dy: i64) {
        self.scope.shift(dx, dy);
    }

    fn extract(&mut self, sub_domain: Box2D) -> bool {
        self.scope.extract(sub_domain)
    }

    fn process_and_reduce(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        let domain = self.scope.domain;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                let rho = lattice.compute_density(x, y);
                self.statistics.gather_average(self.slot, rho);
                self.statistics.increment_stats();
            }
        }
        self.statistics.evaluate();
    }

    fn statistics(&self) -> &BlockStatistics {
        &self.statistics
    }
}

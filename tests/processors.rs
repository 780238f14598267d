//! Processor pipeline and data-transfer behaviour.

use cremalb::core::geometry::{Box2D, Dot2D, DotList2D};
use cremalb::descriptor::{Descriptor, ForcedD2Q9, D2Q9};
use cremalb::dynamics::Dynamics;
use cremalb::lattice::BlockLattice2D;
use cremalb::processor::{
    AverageDensityReductive2D, BoxedScope2D, DottedScope2D, LatticeProcessor2D,
    ProcessorGenerator2D, ReductiveProcessorGenerator2D,
};
use cremalb::setup;
use cremalb::Scalar;

#[test]
fn boxed_scope_mutators_compose() {
    let mut scope = BoxedScope2D::new(Box2D::new(0, 9, 0, 9));
    scope.shift(5, 5);
    scope.multiply(2);
    scope.divide(2);
    assert_eq!(scope.domain, Box2D::new(5, 14, 5, 14));
    assert!(scope.extract(Box2D::new(0, 7, 0, 7)));
    assert_eq!(scope.domain, Box2D::new(5, 7, 5, 7));
    // Empty intersection: the generator is to be discarded.
    assert!(!scope.extract(Box2D::new(100, 110, 0, 7)));
}

#[test]
fn dotted_scope_drops_outside_points() {
    let mut scope = DottedScope2D::new(DotList2D::new(vec![
        Dot2D::new(1, 1),
        Dot2D::new(8, 8),
    ]));
    assert!(scope.extract(Box2D::new(0, 4, 0, 4)));
    assert_eq!(scope.dots.len(), 1);
    assert!(!scope.extract(Box2D::new(100, 101, 100, 101)));
}

struct MarkColumn {
    column: i64,
    value: Scalar,
}

impl<Dsc, const Q: usize, const E: usize> LatticeProcessor2D<Dsc, Q, E> for MarkColumn
where
    Dsc: Descriptor<2, Q, E>,
{
    fn process(&mut self, lattice: &mut BlockLattice2D<Dsc, Q, E>) {
        for y in 0..lattice.ny() {
            lattice.cell_mut(self.column, y)[0] = self.value;
        }
    }
}

struct MarkColumnGenerator {
    scope: BoxedScope2D,
    value: Scalar,
}

impl<Dsc, const Q: usize, const E: usize> ProcessorGenerator2D<Dsc, Q, E> for MarkColumnGenerator
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
        Box::new(MarkColumn { column: self.scope.domain.x0, value: self.value })
    }
}

#[test]
fn internal_processors_run_in_registration_order() {
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
        BlockLattice2D::new(4, 4, Dynamics::no_dynamics());
    lattice.add_internal_processor(Box::new(MarkColumnGenerator {
        scope: BoxedScope2D::new(Box2D::new(1, 1, 0, 3)),
        value: 3.0,
    }));
    lattice.add_internal_processor(Box::new(MarkColumnGenerator {
        scope: BoxedScope2D::new(Box2D::new(1, 1, 0, 3)),
        value: 7.0,
    }));
    lattice.execute_internal_processors();
    // The later registration wins on the shared column.
    assert_eq!(lattice.cell(1, 2)[0], 7.0);
}

#[test]
fn reductive_generator_owns_its_statistics() {
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(6, 6, Dynamics::bgk(1.0));
    let lattice_domain = lattice.bounding_box();
    setup::initialize_at_equilibrium_2d(&mut lattice, lattice_domain, |x, _| {
        (1.0 + 0.1 * (x % 2) as Scalar, [0.0, 0.0])
    });
    let mut reduction = AverageDensityReductive2D::new(Box2D::new(0, 5, 0, 5));
    ReductiveProcessorGenerator2D::<D2Q9, 9, 0>::process_and_reduce(&mut reduction, &mut lattice);
    // Alternating 1.0 / 1.1 columns average to 1.05.
    assert!((reduction.average_density() - 1.05).abs() < 1e-12);
}

#[test]
fn serialized_halo_exchange_round_trips() {
    let mut source: BlockLattice2D<ForcedD2Q9, 9, 2> =
        BlockLattice2D::new(6, 6, Dynamics::guo_force_bgk(1.0));
    let source_domain = source.bounding_box();
    setup::initialize_at_equilibrium_2d(&mut source, source_domain, |x, y| {
        (1.0 + 0.01 * (x + y) as Scalar, [0.001 * x as Scalar, 0.0])
    });
    setup::set_external_force_2d(&mut source, source_domain, [1e-4, 2e-4]);

    let mut target: BlockLattice2D<ForcedD2Q9, 9, 2> =
        BlockLattice2D::new(6, 6, Dynamics::guo_force_bgk(1.0));

    let strip = Box2D::new(4, 5, 0, 5);
    let mut buffer = Vec::new();
    source.send(strip, &mut buffer);
    assert_eq!(buffer.len(), strip.n_cells() as usize * (9 + 2));
    target.receive(strip, &buffer);

    for x in 4..6 {
        for y in 0..6 {
            assert_eq!(target.cell(x, y).populations(), source.cell(x, y).populations());
            assert_eq!(target.cell(x, y).externals(), source.cell(x, y).externals());
        }
    }
}

#[test]
fn attribute_copies_values_but_not_dynamics() {
    let mut a: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(6, 6, Dynamics::bgk(1.0));
    let mut b: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(6, 6, Dynamics::bgk(1.0));
    let b_domain = b.bounding_box();
    setup::initialize_at_equilibrium_2d(&mut b, b_domain, |x, _| {
        (1.0 + 0.02 * x as Scalar, [0.0, 0.0])
    });
    a.attribute_dynamics(0, 0, Dynamics::bounce_back());

    // Copy a shifted window of b into a.
    a.attribute(Box2D::new(0, 3, 0, 3), 2, 2, &b);
    assert_eq!(a.cell(0, 0).populations(), b.cell(2, 2).populations());
    assert_eq!(a.cell(3, 3).populations(), b.cell(5, 5).populations());
    // Dynamics assignments are untouched by value transfer.
    assert!(matches!(a.dynamics_at(0, 0), Dynamics::BounceBack { .. }));
}

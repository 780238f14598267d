//! 2D boundary managers and the orientation-driven instantiator.

use super::surface::BlockSurface2D;
use super::BcType;
use crate::core::geometry::{intersect2d, Box2D};
use crate::descriptor::Descriptor;
use crate::dynamics::{BoundaryClosure, Dynamics};
use crate::lattice::BlockLattice2D;
use crate::processor::fd_boundary2d::{
    OuterVelocityCornerGenerator2D, StraightFdBoundaryGenerator2D,
};
use crate::processor::neumann::{
    CopyDensityGenerator2D, CopyUnknownPopulationsGenerator2D, CopyVelocityGenerator2D, CopyMode,
};
use crate::processor::ProcessorGenerator2D;
use std::marker::PhantomData;

/// Wrap the existing dynamics of every cell in `domain` with a clone of the
/// composite `template`.
pub fn set_composite_dynamics_2d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice2D<Dsc, Q, E>,
    domain: Box2D,
    template: &Dynamics<Dsc, 2, Q, E>,
) where
    Dsc: Descriptor<2, Q, E>,
{
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            let existing = lattice.dynamics_at(x, y).clone();
            lattice.attribute_dynamics(x, y, template.clone().with_new_base(existing));
        }
    }
}

/// Static policy: which composite dynamics and which processor implement a
/// boundary piece of each orientation. The base handed to the dynamics
/// factories is a placeholder; the instantiator substitutes each cell's own
/// dynamics.
pub trait BoundaryManager2D<Dsc, const Q: usize, const E: usize>: 'static
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E>;

    fn velocity_boundary_processor(
        _direction: usize,
        _orientation: i64,
        _domain: Box2D,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        None
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E>;

    fn pressure_boundary_processor(
        _direction: usize,
        _orientation: i64,
        _domain: Box2D,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        None
    }

    fn external_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E>;

    fn external_velocity_corner_processor(
        _x_normal: i64,
        _y_normal: i64,
        _x: i64,
        _y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        None
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E>;

    fn internal_velocity_corner_processor(
        _x_normal: i64,
        _y_normal: i64,
        _x: i64,
        _y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        None
    }
}

/// Purely local scheme: Dirichlet walls by regularized completion.
pub struct RegularizedBoundaryManager2D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager2D<Dsc, Q, E>
    for RegularizedBoundaryManager2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::RegularizedVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::RegularizedDensity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_x_normal: i64, _y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator2D::new(x, y, x_normal, y_normal)))
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        )
    }
}

/// Dirichlet walls by plain equilibrium.
pub struct EquilibriumBoundaryManager2D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager2D<Dsc, Q, E>
    for EquilibriumBoundaryManager2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::EquilibriumVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::EquilibriumDensity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_x_normal: i64, _y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator2D::new(x, y, x_normal, y_normal)))
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        )
    }
}

/// Non-local scheme: walls rebuilt by one-sided finite differences.
pub struct InterpolationBoundaryManager2D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager2D<Dsc, Q, E>
    for InterpolationBoundaryManager2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::VelocityDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn velocity_boundary_processor(
        direction: usize,
        orientation: i64,
        domain: Box2D,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(StraightFdBoundaryGenerator2D::new(domain, direction, orientation)))
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::DensityDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_processor(
        direction: usize,
        orientation: i64,
        domain: Box2D,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(StraightFdBoundaryGenerator2D::new(domain, direction, orientation)))
    }

    fn external_velocity_corner_dynamics(_x_normal: i64, _y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator2D::new(x, y, x_normal, y_normal)))
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        )
    }
}

/// Non-equilibrium bounce-back walls.
pub struct ZouHeBoundaryManager2D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager2D<Dsc, Q, E> for ZouHeBoundaryManager2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::ZouHeVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::ZouHePressure { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_x_normal: i64, _y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator2D::new(x, y, x_normal, y_normal)))
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        )
    }
}

/// Analytical closure of Inamuro et al.
pub struct InamuroBoundaryManager2D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager2D<Dsc, Q, E> for InamuroBoundaryManager2D
where
    Dsc: Descriptor<2, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InamuroVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InamuroPressure { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_x_normal: i64, _y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
    ) -> Option<Box<dyn ProcessorGenerator2D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator2D::new(x, y, x_normal, y_normal)))
    }

    fn internal_velocity_corner_dynamics(x_normal: i64, y_normal: i64) -> Dynamics<Dsc, 2, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        )
    }
}

/// Walks the bounding-box surface and installs a manager's dynamics and
/// processors for every orientation tag.
pub struct BoundaryConditionInstantiator2D<M> {
    _manager: PhantomData<M>,
}

impl<M> Default for BoundaryConditionInstantiator2D<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> BoundaryConditionInstantiator2D<M> {
    pub fn new() -> Self {
        BoundaryConditionInstantiator2D { _manager: PhantomData }
    }

    /// Velocity Dirichlet (or a Neumann flavour) on every face and corner of
    /// the lattice's bounding box.
    pub fn set_velocity_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let block = lattice.bounding_box();
        self.set_velocity_condition(lattice, block, block, bc_type);
    }

    pub fn set_velocity_condition<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        block: Box2D,
        application_domain: Box2D,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let surf = BlockSurface2D::new(block, 1);
        let faces = [
            (surf.edge0n(), 0usize, -1i64),
            (surf.edge0p(), 0, 1),
            (surf.edge1n(), 1, -1),
            (surf.edge1p(), 1, 1),
        ];
        for (piece, direction, orientation) in faces {
            if let Some(inter) = intersect2d(piece, application_domain) {
                self.add_velocity_boundary(direction, orientation, inter, lattice, bc_type);
            }
        }
        let corners = [
            (surf.corner_nn(), -1i64, -1i64),
            (surf.corner_np(), -1, 1),
            (surf.corner_pn(), 1, -1),
            (surf.corner_pp(), 1, 1),
        ];
        for (piece, xn, yn) in corners {
            if let Some(inter) = intersect2d(piece, application_domain) {
                self.add_external_velocity_corner(xn, yn, inter.x0, inter.y0, lattice, bc_type);
            }
        }
    }

    /// Density Dirichlet on the faces; pressure conditions are not defined
    /// on corners.
    pub fn set_pressure_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let block = lattice.bounding_box();
        self.set_pressure_condition(lattice, block, block, bc_type);
    }

    pub fn set_pressure_condition<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        block: Box2D,
        application_domain: Box2D,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let surf = BlockSurface2D::new(block, 1);
        let faces = [
            (surf.edge0n(), 0usize, -1i64),
            (surf.edge0p(), 0, 1),
            (surf.edge1n(), 1, -1),
            (surf.edge1p(), 1, 1),
        ];
        for (piece, direction, orientation) in faces {
            if let Some(inter) = intersect2d(piece, application_domain) {
                self.add_pressure_boundary(direction, orientation, inter, lattice, bc_type);
            }
        }
    }

    pub fn add_velocity_boundary<Dsc, const Q: usize, const E: usize>(
        &self,
        direction: usize,
        orientation: i64,
        domain: Box2D,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        assert!(domain.x0 == domain.x1 || domain.y0 == domain.y1);
        log::info!(
            "velocity boundary on axis {direction}, side {orientation}: \
             [{},{}]x[{},{}]",
            domain.x0,
            domain.x1,
            domain.y0,
            domain.y1
        );
        let template = M::velocity_boundary_dynamics(direction, orientation);
        set_composite_dynamics_2d(lattice, domain, &template);

        let mut normal = [0i64; 2];
        normal[direction] = orientation;
        match bc_type {
            BcType::Dirichlet => {}
            BcType::Neumann => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator2D::new(domain, normal, CopyMode::All),
            )),
            BcType::FreeSlip => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator2D::new(domain, normal, CopyMode::Tangential),
            )),
            BcType::NormalOutflow => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator2D::new(domain, normal, CopyMode::Normal),
            )),
            BcType::Outflow => lattice.add_internal_processor(Box::new(
                CopyUnknownPopulationsGenerator2D::new(domain, direction, orientation),
            )),
        }

        if let Some(generator) = M::velocity_boundary_processor(direction, orientation, domain) {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_pressure_boundary<Dsc, const Q: usize, const E: usize>(
        &self,
        direction: usize,
        orientation: i64,
        domain: Box2D,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        assert!(domain.x0 == domain.x1 || domain.y0 == domain.y1);
        log::info!(
            "pressure boundary on axis {direction}, side {orientation}: \
             [{},{}]x[{},{}]",
            domain.x0,
            domain.x1,
            domain.y0,
            domain.y1
        );
        let template = M::pressure_boundary_dynamics(direction, orientation);
        set_composite_dynamics_2d(lattice, domain, &template);

        let mut normal = [0i64; 2];
        normal[direction] = orientation;
        match bc_type {
            BcType::Dirichlet => {}
            _ => lattice
                .add_internal_processor(Box::new(CopyDensityGenerator2D::new(domain, normal))),
        }

        if let Some(generator) = M::pressure_boundary_processor(direction, orientation, domain) {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_external_velocity_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let template = M::external_velocity_corner_dynamics(x_normal, y_normal);
        set_composite_dynamics_2d(lattice, Box2D::new(x, x, y, y), &template);

        if !matches!(bc_type, BcType::Dirichlet) {
            lattice.add_internal_processor(Box::new(CopyVelocityGenerator2D::new(
                Box2D::new(x, x, y, y),
                [x_normal, y_normal],
                CopyMode::All,
            )));
        }

        if let Some(generator) = M::external_velocity_corner_processor(x_normal, y_normal, x, y) {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_internal_velocity_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<2, Q, E>,
        M: BoundaryManager2D<Dsc, Q, E>,
    {
        let template = M::internal_velocity_corner_dynamics(x_normal, y_normal);
        set_composite_dynamics_2d(lattice, Box2D::new(x, x, y, y), &template);
        if let Some(generator) = M::internal_velocity_corner_processor(x_normal, y_normal, x, y) {
            lattice.add_internal_processor(generator);
        }
    }
}

pub fn create_local_boundary_condition_2d(
) -> BoundaryConditionInstantiator2D<RegularizedBoundaryManager2D> {
    BoundaryConditionInstantiator2D::new()
}

pub fn create_equilibrium_boundary_condition_2d(
) -> BoundaryConditionInstantiator2D<EquilibriumBoundaryManager2D> {
    BoundaryConditionInstantiator2D::new()
}

pub fn create_interp_boundary_condition_2d(
) -> BoundaryConditionInstantiator2D<InterpolationBoundaryManager2D> {
    BoundaryConditionInstantiator2D::new()
}

pub fn create_zou_he_boundary_condition_2d(
) -> BoundaryConditionInstantiator2D<ZouHeBoundaryManager2D> {
    BoundaryConditionInstantiator2D::new()
}

pub fn create_inamuro_boundary_condition_2d(
) -> BoundaryConditionInstantiator2D<InamuroBoundaryManager2D> {
    BoundaryConditionInstantiator2D::new()
}

//! 3D boundary managers and instantiator: six faces, twelve edges, eight
//! corners, driven by a data loop over the orientation tags.

use super::surface::BlockSurface3D;
use super::BcType;
use crate::core::geometry::{intersect3d, Box3D};
use crate::descriptor::Descriptor;
use crate::dynamics::{BoundaryClosure, Dynamics};
use crate::lattice::BlockLattice3D;
use crate::processor::fd_boundary3d::{
    OuterVelocityCornerGenerator3D, OuterVelocityEdgeGenerator3D, PlaneFdBoundaryGenerator3D,
};
use crate::processor::neumann::{
    CopyDensityGenerator3D, CopyMode, CopyUnknownPopulationsGenerator3D, CopyVelocityGenerator3D,
};
use crate::processor::ProcessorGenerator3D;
use std::marker::PhantomData;

pub fn set_composite_dynamics_3d<Dsc, const Q: usize, const E: usize>(
    lattice: &mut BlockLattice3D<Dsc, Q, E>,
    domain: Box3D,
    template: &Dynamics<Dsc, 3, Q, E>,
) where
    Dsc: Descriptor<3, Q, E>,
{
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                let existing = lattice.dynamics_at(x, y, z).clone();
                lattice.attribute_dynamics(x, y, z, template.clone().with_new_base(existing));
            }
        }
    }
}

pub trait BoundaryManager3D<Dsc, const Q: usize, const E: usize>: 'static
where
    Dsc: Descriptor<3, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E>;

    fn velocity_boundary_processor(
        _direction: usize,
        _orientation: i64,
        _domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E>;

    fn pressure_boundary_processor(
        _direction: usize,
        _orientation: i64,
        _domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }

    fn external_velocity_edge_dynamics(
        plane: usize,
        normal1: i64,
        normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E>;

    fn external_velocity_edge_processor(
        _plane: usize,
        _normal1: i64,
        _normal2: i64,
        _domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }

    fn internal_velocity_edge_dynamics(
        plane: usize,
        normal1: i64,
        normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E>;

    fn internal_velocity_edge_processor(
        _plane: usize,
        _normal1: i64,
        _normal2: i64,
        _domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }

    fn external_velocity_corner_dynamics(normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E>;

    fn external_velocity_corner_processor(
        _normals: [i64; 3],
        _x: i64,
        _y: i64,
        _z: i64,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }

    fn internal_velocity_corner_dynamics(normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E>;

    fn internal_velocity_corner_processor(
        _normals: [i64; 3],
        _x: i64,
        _y: i64,
        _z: i64,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        None
    }
}

pub struct RegularizedBoundaryManager3D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager3D<Dsc, Q, E>
    for RegularizedBoundaryManager3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::RegularizedVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::RegularizedDensity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_edge_dynamics(
        _plane: usize,
        _normal1: i64,
        _normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_edge_processor(
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityEdgeGenerator3D::new(domain, plane, normal1, normal2)))
    }

    fn internal_velocity_edge_dynamics(
        plane: usize,
        normal1: i64,
        normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerEdgeVelocity3D { plane, normal1, normal2 },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator3D::new(x, y, z, normals)))
    }

    fn internal_velocity_corner_dynamics(normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity3D {
                x_normal: normals[0],
                y_normal: normals[1],
                z_normal: normals[2],
            },
            Dynamics::no_dynamics(),
        )
    }
}

pub struct EquilibriumBoundaryManager3D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager3D<Dsc, Q, E>
    for EquilibriumBoundaryManager3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::EquilibriumVelocity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::EquilibriumDensity { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_edge_dynamics(
        _plane: usize,
        _normal1: i64,
        _normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_edge_processor(
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityEdgeGenerator3D::new(domain, plane, normal1, normal2)))
    }

    fn internal_velocity_edge_dynamics(
        plane: usize,
        normal1: i64,
        normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerEdgeVelocity3D { plane, normal1, normal2 },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator3D::new(x, y, z, normals)))
    }

    fn internal_velocity_corner_dynamics(normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity3D {
                x_normal: normals[0],
                y_normal: normals[1],
                z_normal: normals[2],
            },
            Dynamics::no_dynamics(),
        )
    }
}

pub struct InterpolationBoundaryManager3D;

impl<Dsc, const Q: usize, const E: usize> BoundaryManager3D<Dsc, Q, E>
    for InterpolationBoundaryManager3D
where
    Dsc: Descriptor<3, Q, E>,
{
    fn velocity_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::VelocityDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn velocity_boundary_processor(
        direction: usize,
        orientation: i64,
        domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(PlaneFdBoundaryGenerator3D::new(domain, direction, orientation)))
    }

    fn pressure_boundary_dynamics(direction: usize, orientation: i64) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::DensityDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        )
    }

    fn pressure_boundary_processor(
        direction: usize,
        orientation: i64,
        domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(PlaneFdBoundaryGenerator3D::new(domain, direction, orientation)))
    }

    fn external_velocity_edge_dynamics(
        _plane: usize,
        _normal1: i64,
        _normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_edge_processor(
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityEdgeGenerator3D::new(domain, plane, normal1, normal2)))
    }

    fn internal_velocity_edge_dynamics(
        plane: usize,
        normal1: i64,
        normal2: i64,
    ) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerEdgeVelocity3D { plane, normal1, normal2 },
            Dynamics::no_dynamics(),
        )
    }

    fn external_velocity_corner_dynamics(_normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(BoundaryClosure::StoreVelocity, Dynamics::no_dynamics())
    }

    fn external_velocity_corner_processor(
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
    ) -> Option<Box<dyn ProcessorGenerator3D<Dsc, Q, E>>> {
        Some(Box::new(OuterVelocityCornerGenerator3D::new(x, y, z, normals)))
    }

    fn internal_velocity_corner_dynamics(normals: [i64; 3]) -> Dynamics<Dsc, 3, Q, E> {
        Dynamics::boundary(
            BoundaryClosure::InnerCornerVelocity3D {
                x_normal: normals[0],
                y_normal: normals[1],
                z_normal: normals[2],
            },
            Dynamics::no_dynamics(),
        )
    }
}

pub struct BoundaryConditionInstantiator3D<M> {
    _manager: PhantomData<M>,
}

impl<M> Default for BoundaryConditionInstantiator3D<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> BoundaryConditionInstantiator3D<M> {
    pub fn new() -> Self {
        BoundaryConditionInstantiator3D { _manager: PhantomData }
    }

    pub fn set_velocity_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let block = lattice.bounding_box();
        self.set_velocity_condition(lattice, block, block, bc_type);
    }

    pub fn set_velocity_condition<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        block: Box3D,
        application_domain: Box3D,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let surf = BlockSurface3D::new(block, 1);

        let faces = [
            (surf.surface0n(), 0usize, -1i64),
            (surf.surface0p(), 0, 1),
            (surf.surface1n(), 1, -1),
            (surf.surface1p(), 1, 1),
            (surf.surface2n(), 2, -1),
            (surf.surface2p(), 2, 1),
        ];
        for (piece, direction, orientation) in faces {
            if let Some(inter) = intersect3d(piece, application_domain) {
                self.add_velocity_boundary(direction, orientation, inter, lattice, bc_type);
            }
        }

        for n1 in [-1i64, 1] {
            for n2 in [-1i64, 1] {
                for (plane, piece) in [
                    (0usize, surf.edge0(n1, n2)),
                    (1, surf.edge1(n1, n2)),
                    (2, surf.edge2(n1, n2)),
                ] {
                    if let Some(inter) = intersect3d(piece, application_domain) {
                        self.add_external_velocity_edge(plane, n1, n2, inter, lattice, bc_type);
                    }
                }
            }
        }

        for xn in [-1i64, 1] {
            for yn in [-1i64, 1] {
                for zn in [-1i64, 1] {
                    if let Some(inter) = intersect3d(surf.corner(xn, yn, zn), application_domain) {
                        self.add_external_velocity_corner(
                            [xn, yn, zn],
                            inter.x0,
                            inter.y0,
                            inter.z0,
                            lattice,
                            bc_type,
                        );
                    }
                }
            }
        }
    }

    pub fn set_pressure_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let block = lattice.bounding_box();
        self.set_pressure_condition(lattice, block, block, bc_type);
    }

    /// Pressure conditions are only defined on flat faces; an application
    /// domain that touches an edge or corner is a caller error.
    pub fn set_pressure_condition<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        block: Box3D,
        application_domain: Box3D,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let surf = BlockSurface3D::new(block, 1);
        let faces = [
            (surf.surface0n(), 0usize, -1i64),
            (surf.surface0p(), 0, 1),
            (surf.surface1n(), 1, -1),
            (surf.surface1p(), 1, 1),
            (surf.surface2n(), 2, -1),
            (surf.surface2p(), 2, 1),
        ];
        for (piece, direction, orientation) in faces {
            if let Some(inter) = intersect3d(piece, application_domain) {
                self.add_pressure_boundary(direction, orientation, inter, lattice, bc_type);
            }
        }

        for n1 in [-1i64, 1] {
            for n2 in [-1i64, 1] {
                for piece in [surf.edge0(n1, n2), surf.edge1(n1, n2), surf.edge2(n1, n2)] {
                    assert!(
                        intersect3d(piece, application_domain).is_none(),
                        "pressure conditions are not defined on edges"
                    );
                }
            }
        }
        for xn in [-1i64, 1] {
            for yn in [-1i64, 1] {
                for zn in [-1i64, 1] {
                    assert!(
                        intersect3d(surf.corner(xn, yn, zn), application_domain).is_none(),
                        "pressure conditions are not defined on corners"
                    );
                }
            }
        }
    }

    pub fn add_velocity_boundary<Dsc, const Q: usize, const E: usize>(
        &self,
        direction: usize,
        orientation: i64,
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        assert!(domain.x0 == domain.x1 || domain.y0 == domain.y1 || domain.z0 == domain.z1);
        let template = M::velocity_boundary_dynamics(direction, orientation);
        set_composite_dynamics_3d(lattice, domain, &template);

        let mut normal = [0i64; 3];
        normal[direction] = orientation;
        match bc_type {
            BcType::Dirichlet => {}
            BcType::Neumann => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator3D::new(domain, normal, CopyMode::All),
            )),
            BcType::FreeSlip => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator3D::new(domain, normal, CopyMode::Tangential),
            )),
            BcType::NormalOutflow => lattice.add_internal_processor(Box::new(
                CopyVelocityGenerator3D::new(domain, normal, CopyMode::Normal),
            )),
            BcType::Outflow => lattice.add_internal_processor(Box::new(
                CopyUnknownPopulationsGenerator3D::new(domain, direction, orientation),
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
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        assert!(domain.x0 == domain.x1 || domain.y0 == domain.y1 || domain.z0 == domain.z1);
        let template = M::pressure_boundary_dynamics(direction, orientation);
        set_composite_dynamics_3d(lattice, domain, &template);

        let mut normal = [0i64; 3];
        normal[direction] = orientation;
        if !matches!(bc_type, BcType::Dirichlet) {
            lattice.add_internal_processor(Box::new(CopyDensityGenerator3D::new(domain, normal)));
        }

        if let Some(generator) = M::pressure_boundary_processor(direction, orientation, domain) {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_external_velocity_edge<Dsc, const Q: usize, const E: usize>(
        &self,
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let template = M::external_velocity_edge_dynamics(plane, normal1, normal2);
        set_composite_dynamics_3d(lattice, domain, &template);

        if !matches!(bc_type, BcType::Dirichlet) {
            let mut normal = [0i64; 3];
            normal[(plane + 1) % 3] = normal1;
            normal[(plane + 2) % 3] = normal2;
            lattice.add_internal_processor(Box::new(CopyVelocityGenerator3D::new(
                domain,
                normal,
                CopyMode::All,
            )));
        }

        if let Some(generator) = M::external_velocity_edge_processor(plane, normal1, normal2, domain)
        {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_internal_velocity_edge<Dsc, const Q: usize, const E: usize>(
        &self,
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let template = M::internal_velocity_edge_dynamics(plane, normal1, normal2);
        set_composite_dynamics_3d(lattice, domain, &template);
        if let Some(generator) = M::internal_velocity_edge_processor(plane, normal1, normal2, domain)
        {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_external_velocity_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
        bc_type: BcType,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let template = M::external_velocity_corner_dynamics(normals);
        set_composite_dynamics_3d(lattice, Box3D::new(x, x, y, y, z, z), &template);

        if !matches!(bc_type, BcType::Dirichlet) {
            lattice.add_internal_processor(Box::new(CopyVelocityGenerator3D::new(
                Box3D::new(x, x, y, y, z, z),
                normals,
                CopyMode::All,
            )));
        }

        if let Some(generator) = M::external_velocity_corner_processor(normals, x, y, z) {
            lattice.add_internal_processor(generator);
        }
    }

    pub fn add_internal_velocity_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
        M: BoundaryManager3D<Dsc, Q, E>,
    {
        let template = M::internal_velocity_corner_dynamics(normals);
        set_composite_dynamics_3d(lattice, Box3D::new(x, x, y, y, z, z), &template);
        if let Some(generator) = M::internal_velocity_corner_processor(normals, x, y, z) {
            lattice.add_internal_processor(generator);
        }
    }
}

pub fn create_local_boundary_condition_3d(
) -> BoundaryConditionInstantiator3D<RegularizedBoundaryManager3D> {
    BoundaryConditionInstantiator3D::new()
}

pub fn create_equilibrium_boundary_condition_3d(
) -> BoundaryConditionInstantiator3D<EquilibriumBoundaryManager3D> {
    BoundaryConditionInstantiator3D::new()
}

pub fn create_interp_boundary_condition_3d(
) -> BoundaryConditionInstantiator3D<InterpolationBoundaryManager3D> {
    BoundaryConditionInstantiator3D::new()
}

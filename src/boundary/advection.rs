//! Temperature (scalar Dirichlet) boundaries for advection-diffusion
//! lattices.
//!
//! The imposed scalar is stored as the boundary density; walls complete the
//! single missing wall-normal population by off-equilibrium bounce-back,
//! corners complete every unknown the same way.

use super::surface::{BlockSurface2D, BlockSurface3D};
use crate::core::geometry::{intersect2d, intersect3d, Box2D, Box3D};
use crate::descriptor::Descriptor;
use crate::dynamics::{BoundaryClosure, Dynamics};
use crate::lattice::{BlockLattice2D, BlockLattice3D};
use crate::boundary::condition2d::set_composite_dynamics_2d;
use crate::boundary::condition3d::set_composite_dynamics_3d;

/// Installs regularized scalar-Dirichlet boundaries on a 2D lattice.
#[derive(Debug, Default)]
pub struct AdvectionBoundaryCondition2D;

impl AdvectionBoundaryCondition2D {
    pub fn new() -> Self {
        AdvectionBoundaryCondition2D
    }

    pub fn set_temperature_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<2, Q, E>,
    {
        let block = lattice.bounding_box();
        self.set_temperature_condition(lattice, block, block);
    }

    pub fn set_temperature_condition<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
        block: Box2D,
        application_domain: Box2D,
    ) where
        Dsc: Descriptor<2, Q, E>,
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
                self.add_temperature_boundary(direction, orientation, inter, lattice);
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
                self.add_temperature_corner(xn, yn, inter.x0, inter.y0, lattice);
            }
        }
    }

    pub fn add_temperature_boundary<Dsc, const Q: usize, const E: usize>(
        &self,
        direction: usize,
        orientation: i64,
        domain: Box2D,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<2, Q, E>,
    {
        assert!(domain.x0 == domain.x1 || domain.y0 == domain.y1);
        let template = Dynamics::boundary(
            BoundaryClosure::RegularizedAdvectionDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        );
        set_composite_dynamics_2d(lattice, domain, &template);
    }

    pub fn add_temperature_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        x_normal: i64,
        y_normal: i64,
        x: i64,
        y: i64,
        lattice: &mut BlockLattice2D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<2, Q, E>,
    {
        let template = Dynamics::boundary(
            BoundaryClosure::AdvectionCorner2D { x_normal, y_normal },
            Dynamics::no_dynamics(),
        );
        set_composite_dynamics_2d(lattice, Box2D::new(x, x, y, y), &template);
    }
}

pub fn create_advection_boundary_condition_2d() -> AdvectionBoundaryCondition2D {
    AdvectionBoundaryCondition2D::new()
}

/// 3D variant. Faces carry the regularized scalar closure; edges and
/// corners reuse the flat closure of their dominant normal, which for the
/// D3Q7 lattice reconstructs every missing population.
#[derive(Debug, Default)]
pub struct AdvectionBoundaryCondition3D;

impl AdvectionBoundaryCondition3D {
    pub fn new() -> Self {
        AdvectionBoundaryCondition3D
    }

    pub fn set_temperature_condition_on_block_boundaries<Dsc, const Q: usize, const E: usize>(
        &self,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
    {
        let block = lattice.bounding_box();
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
            if let Some(inter) = intersect3d(piece, block) {
                self.add_temperature_boundary(direction, orientation, inter, lattice);
            }
        }
        for n1 in [-1i64, 1] {
            for n2 in [-1i64, 1] {
                for (plane, piece) in [
                    (0usize, surf.edge0(n1, n2)),
                    (1, surf.edge1(n1, n2)),
                    (2, surf.edge2(n1, n2)),
                ] {
                    if let Some(inter) = intersect3d(piece, block) {
                        self.add_temperature_edge(plane, n1, n2, inter, lattice);
                    }
                }
            }
        }
        for xn in [-1i64, 1] {
            for yn in [-1i64, 1] {
                for zn in [-1i64, 1] {
                    if let Some(inter) = intersect3d(surf.corner(xn, yn, zn), block) {
                        self.add_temperature_corner([xn, yn, zn], inter.x0, inter.y0, inter.z0, lattice);
                    }
                }
            }
        }
    }

    pub fn add_temperature_edge<Dsc, const Q: usize, const E: usize>(
        &self,
        plane: usize,
        normal1: i64,
        normal2: i64,
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
    {
        let template = Dynamics::boundary(
            BoundaryClosure::AdvectionEdge3D { plane, normal1, normal2 },
            Dynamics::no_dynamics(),
        );
        set_composite_dynamics_3d(lattice, domain, &template);
    }

    pub fn add_temperature_corner<Dsc, const Q: usize, const E: usize>(
        &self,
        normals: [i64; 3],
        x: i64,
        y: i64,
        z: i64,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
    {
        let template = Dynamics::boundary(
            BoundaryClosure::AdvectionCorner3D {
                x_normal: normals[0],
                y_normal: normals[1],
                z_normal: normals[2],
            },
            Dynamics::no_dynamics(),
        );
        set_composite_dynamics_3d(lattice, Box3D::new(x, x, y, y, z, z), &template);
    }

    pub fn add_temperature_boundary<Dsc, const Q: usize, const E: usize>(
        &self,
        direction: usize,
        orientation: i64,
        domain: Box3D,
        lattice: &mut BlockLattice3D<Dsc, Q, E>,
    ) where
        Dsc: Descriptor<3, Q, E>,
    {
        let template = Dynamics::boundary(
            BoundaryClosure::RegularizedAdvectionDirichlet { direction, orientation },
            Dynamics::no_dynamics(),
        );
        set_composite_dynamics_3d(lattice, domain, &template);
    }
}

pub fn create_advection_boundary_condition_3d() -> AdvectionBoundaryCondition3D {
    AdvectionBoundaryCondition3D::new()
}

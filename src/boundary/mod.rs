//! Boundary-condition instantiation.
//!
//! A *boundary manager* is a policy that maps every orientation tag of the
//! bounding-box surface to a composite-dynamics factory and an optional
//! data-processor generator. The *instantiators* walk the surface pieces,
//! intersect them with an application domain, wrap each cell's existing
//! dynamics with the manager's composite, and register the processors —
//! without the caller writing one case per orientation.

pub mod advection;
pub mod condition2d;
pub mod condition3d;
pub mod surface;

pub use advection::{
    create_advection_boundary_condition_2d, create_advection_boundary_condition_3d,
    AdvectionBoundaryCondition2D, AdvectionBoundaryCondition3D,
};
pub use condition2d::{
    create_equilibrium_boundary_condition_2d, create_inamuro_boundary_condition_2d,
    create_interp_boundary_condition_2d, create_local_boundary_condition_2d,
    create_zou_he_boundary_condition_2d, BoundaryConditionInstantiator2D, BoundaryManager2D,
    EquilibriumBoundaryManager2D, InamuroBoundaryManager2D, InterpolationBoundaryManager2D,
    RegularizedBoundaryManager2D, ZouHeBoundaryManager2D,
};
pub use condition3d::{
    create_equilibrium_boundary_condition_3d, create_interp_boundary_condition_3d,
    create_local_boundary_condition_3d, BoundaryConditionInstantiator3D, BoundaryManager3D,
    EquilibriumBoundaryManager3D, InterpolationBoundaryManager3D, RegularizedBoundaryManager3D,
};
pub use surface::{BlockSurface2D, BlockSurface3D};

/// Flavour of a boundary condition. `Dirichlet` imposes the stored value;
/// the other flavours copy the missing information from the inward
/// neighbour before each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BcType {
    #[default]
    Dirichlet,
    Neumann,
    FreeSlip,
    Outflow,
    NormalOutflow,
}

//! Boundary-closure properties: imposed wall moments are recovered from the
//! completed populations, for every local scheme, and the instantiator
//! installs composites on every orientation.

use cremalb::boundary::{
    create_equilibrium_boundary_condition_2d, create_inamuro_boundary_condition_2d,
    create_local_boundary_condition_2d, create_local_boundary_condition_3d,
    create_zou_he_boundary_condition_2d, BcType,
};
use cremalb::core::geometry::Box2D;
use cremalb::descriptor::{Descriptor, D2Q9, D3Q19};
use cremalb::dynamics::{BoundaryClosure, BoundaryDynamics, Dynamics};
use cremalb::lattice::{BlockLattice2D, BlockLattice3D};
use cremalb::lb::moments;
use cremalb::setup;
use cremalb::Scalar;

/// An arbitrary near-equilibrium population state for a top-wall cell.
fn wall_cell_populations() -> [Scalar; 9] {
    let mut f = [0.0; 9];
    for (i, value) in f.iter_mut().enumerate() {
        *value = <D2Q9 as Descriptor<2, 9, 0>>::W[i] * (1.0 + 0.03 * (i as Scalar - 4.0));
    }
    f
}

fn check_velocity_wall(closure: BoundaryClosure, tolerance: Scalar) {
    let u_wall = [0.04, -0.01];
    let mut dynamics: BoundaryDynamics<D2Q9, 2, 9, 0> =
        BoundaryDynamics::new(closure, Dynamics::bgk(1.1));
    dynamics.define_velocity(u_wall);

    let mut f = wall_cell_populations();
    let external = [0.0; 0];
    dynamics.complete_populations(&mut f, &external);

    // The completed populations carry the imposed velocity.
    let (rho_bar, j) = moments::get_rho_bar_j::<D2Q9, 2, 9, 0>(&f);
    let rho = D2Q9::full_rho(rho_bar);
    assert!(
        (j[0] / rho - u_wall[0]).abs() < tolerance,
        "{closure:?}: u_x = {} instead of {}",
        j[0] / rho,
        u_wall[0]
    );
    assert!(
        (j[1] / rho - u_wall[1]).abs() < tolerance,
        "{closure:?}: u_y = {} instead of {}",
        j[1] / rho,
        u_wall[1]
    );
    // And the dynamics itself answers with the imposed value exactly.
    let reported = dynamics.compute_velocity(&f, &external);
    assert_eq!(reported, u_wall);
}

#[test]
fn velocity_dirichlet_walls_recover_the_imposed_velocity() {
    // Top wall: axis 1, outward normal +1.
    let tags = (1usize, 1i64);
    check_velocity_wall(
        BoundaryClosure::RegularizedVelocity { direction: tags.0, orientation: tags.1 },
        1e-12,
    );
    check_velocity_wall(
        BoundaryClosure::EquilibriumVelocity { direction: tags.0, orientation: tags.1 },
        1e-12,
    );
    check_velocity_wall(
        BoundaryClosure::ZouHeVelocity { direction: tags.0, orientation: tags.1 },
        1e-12,
    );
    check_velocity_wall(
        BoundaryClosure::InamuroVelocity { direction: tags.0, orientation: tags.1 },
        1e-8,
    );
}

#[test]
fn density_dirichlet_walls_recover_the_imposed_density() {
    for closure in [
        BoundaryClosure::RegularizedDensity { direction: 0, orientation: -1 },
        BoundaryClosure::EquilibriumDensity { direction: 0, orientation: -1 },
        BoundaryClosure::ZouHePressure { direction: 0, orientation: -1 },
    ] {
        let rho_wall = 1.08;
        let mut dynamics: BoundaryDynamics<D2Q9, 2, 9, 0> =
            BoundaryDynamics::new(closure, Dynamics::bgk(0.9));
        dynamics.define_density(rho_wall);

        let mut f = wall_cell_populations();
        let external = [0.0; 0];
        dynamics.complete_populations(&mut f, &external);
        let rho = moments::compute_rho::<D2Q9, 2, 9, 0>(&f);
        assert!(
            (rho - rho_wall).abs() < 1e-12,
            "{closure:?}: rho = {rho} instead of {rho_wall}"
        );
        assert!((dynamics.compute_rho_bar(&f, &external) - D2Q9::rho_bar(rho_wall)).abs() < 1e-15);
    }
}

#[test]
fn composite_moment_queries_delegate_through_completion() {
    // For a composite D around base B, D's stress query equals B's on the
    // D-completed populations.
    let closure = BoundaryClosure::RegularizedVelocity { direction: 1, orientation: 1 };
    let mut dynamics: BoundaryDynamics<D2Q9, 2, 9, 0> =
        BoundaryDynamics::new(closure, Dynamics::bgk(1.4));
    dynamics.define_velocity([0.02, 0.0]);

    let f = wall_cell_populations();
    let external = [0.0; 0];
    let mut completed = f;
    dynamics.complete_populations(&mut completed, &external);

    let base = Dynamics::<D2Q9, 2, 9, 0>::bgk(1.4);
    let via_composite = dynamics.compute_rho_bar_j_pi_neq(&f, &external);
    let via_base = base.compute_rho_bar_j_pi_neq(&completed, &external);
    assert!((via_composite.0 - via_base.0).abs() < 1e-14);
    for k in 0..2 {
        assert!((via_composite.1[k] - via_base.1[k]).abs() < 1e-14);
    }
    for n in 0..3 {
        assert!((via_composite.2[n] - via_base.2[n]).abs() < 1e-14);
    }
    assert!(
        (dynamics.compute_rho_bar(&f, &external)
            - base.compute_rho_bar(&completed, &external))
        .abs()
            < 1e-13
    );
}

#[test]
fn instantiator_wraps_every_wall_cell_2d() {
    let n = 10;
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(n, n, Dynamics::bgk(1.0));
    let bc = create_local_boundary_condition_2d();
    bc.set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet);

    for x in 0..n {
        for y in 0..n {
            let on_wall = x == 0 || x == n - 1 || y == 0 || y == n - 1;
            let is_boundary =
                matches!(lattice.dynamics_at(x, y), Dynamics::Boundary(_));
            assert_eq!(on_wall, is_boundary, "cell ({x},{y})");
        }
    }
}

#[test]
fn instantiator_wraps_faces_edges_and_corners_3d() {
    let n = 6;
    let mut lattice: BlockLattice3D<D3Q19, 19, 0> =
        BlockLattice3D::new(n, n, n, Dynamics::bgk(1.0));
    let bc = create_local_boundary_condition_3d();
    bc.set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet);

    let mut wall_cells = 0;
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let on_wall =
                    x == 0 || x == n - 1 || y == 0 || y == n - 1 || z == 0 || z == n - 1;
                let is_boundary =
                    matches!(lattice.dynamics_at(x, y, z), Dynamics::Boundary(_));
                assert_eq!(on_wall, is_boundary, "cell ({x},{y},{z})");
                if on_wall {
                    wall_cells += 1;
                }
            }
        }
    }
    assert_eq!(wall_cells, n * n * n - (n - 2) * (n - 2) * (n - 2));
}

#[test]
fn managers_produce_distinct_wall_closures() {
    let n = 8;
    for manager in 0..4 {
        let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
            BlockLattice2D::new(n, n, Dynamics::bgk(1.0));
        match manager {
            0 => create_local_boundary_condition_2d()
                .set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet),
            1 => create_equilibrium_boundary_condition_2d()
                .set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet),
            2 => create_zou_he_boundary_condition_2d()
                .set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet),
            _ => create_inamuro_boundary_condition_2d()
                .set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet),
        }
        let expected = match manager {
            0 => BoundaryClosure::RegularizedVelocity { direction: 0, orientation: -1 },
            1 => BoundaryClosure::EquilibriumVelocity { direction: 0, orientation: -1 },
            2 => BoundaryClosure::ZouHeVelocity { direction: 0, orientation: -1 },
            _ => BoundaryClosure::InamuroVelocity { direction: 0, orientation: -1 },
        };
        match lattice.dynamics_at(0, n / 2) {
            Dynamics::Boundary(b) => assert_eq!(b.closure, expected),
            other => panic!("expected a boundary composite, found {other:?}"),
        }
    }
}

#[test]
fn wrapped_walls_preserve_the_bulk_operator() {
    // The instantiator must wrap the cell's existing dynamics, not replace
    // it: the wall composite of an MRT lattice keeps the MRT base.
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(6, 6, Dynamics::bgk(0.8));
    lattice.attribute_dynamics(0, 3, Dynamics::regularized_bgk(1.7));
    let bc = create_local_boundary_condition_2d();
    bc.set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet);
    match lattice.dynamics_at(0, 3) {
        Dynamics::Boundary(b) => {
            assert!(matches!(b.base(), Dynamics::RegularizedBgk { .. }));
            assert!((b.base().omega() - 1.7).abs() < 1e-15);
        }
        other => panic!("expected a boundary composite, found {other:?}"),
    }
    match lattice.dynamics_at(0, 2) {
        Dynamics::Boundary(b) => assert!(matches!(b.base(), Dynamics::Bgk { .. })),
        other => panic!("expected a boundary composite, found {other:?}"),
    }
}

#[test]
fn driven_wall_drags_the_fluid() {
    // A short lid-driven run: the cell row under the lid must pick up
    // positive x-velocity, everything stays finite, mass stays bounded.
    let n = 16;
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(n, n, Dynamics::bgk(1.0));
    let bc = create_local_boundary_condition_2d();
    bc.set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet);
    let lattice_domain = lattice.bounding_box();
    setup::set_boundary_velocity_2d(&mut lattice, lattice_domain, [0.0, 0.0]);
    setup::set_boundary_velocity_2d(
        &mut lattice,
        Box2D::new(1, n - 2, n - 1, n - 1),
        [0.05, 0.0],
    );
    setup::initialize_at_equilibrium_2d(&mut lattice, lattice_domain, |_, _| {
        (1.0, [0.0, 0.0])
    });
    for _ in 0..400 {
        lattice.collide_and_stream();
    }
    let u_below_lid = lattice.compute_velocity(n / 2, n - 2);
    assert!(u_below_lid[0] > 1e-4, "no momentum transfer: {u_below_lid:?}");
    assert!(u_below_lid[0].is_finite());
    assert!((lattice.average_density() - 1.0).abs() < 0.05);
}

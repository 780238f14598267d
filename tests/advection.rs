//! Passive-scalar (advection-diffusion) lattices: conservation, relaxation
//! towards imposed wall temperatures, and advection by the external
//! velocity field.

use cremalb::boundary::create_advection_boundary_condition_2d;
use cremalb::descriptor::AdvectionD2Q5;
use cremalb::dynamics::Dynamics;
use cremalb::lattice::BlockLattice2D;
use cremalb::setup;
use cremalb::Scalar;

type ScalarLattice = BlockLattice2D<AdvectionD2Q5, 5, 2>;

fn total_scalar(lattice: &ScalarLattice) -> Scalar {
    let mut total = 0.0;
    for x in 0..lattice.nx() {
        for y in 0..lattice.ny() {
            for i in 0..5 {
                total += lattice.cell(x, y)[i];
            }
        }
    }
    total
}

#[test]
fn advected_scalar_is_conserved() {
    let mut lattice = ScalarLattice::new(16, 16, Dynamics::advection_bgk(1.2));
    lattice.set_periodic(0, true);
    lattice.set_periodic(1, true);
    let domain = lattice.bounding_box();
    setup::initialize_at_equilibrium_2d(&mut lattice, domain, |x, y| {
        let spike = if (x - 8).abs() <= 1 && (y - 8).abs() <= 1 { 0.5 } else { 0.0 };
        (1.0 + spike, [0.0, 0.0])
    });
    setup::set_advection_velocity_2d(&mut lattice, domain, [0.03, 0.01]);

    let before = total_scalar(&lattice);
    for _ in 0..300 {
        lattice.collide_and_stream();
    }
    let after = total_scalar(&lattice);
    assert!((before - after).abs() < 1e-10);

    // The spike has been smeared out by diffusion.
    let centre = lattice.compute_density(8, 8);
    assert!(centre < 1.5 && centre > 0.9);
}

#[test]
fn advection_moves_the_scalar_downstream() {
    let mut lattice = ScalarLattice::new(32, 8, Dynamics::advection_bgk(1.5));
    lattice.set_periodic(0, true);
    lattice.set_periodic(1, true);
    let domain = lattice.bounding_box();
    setup::initialize_at_equilibrium_2d(&mut lattice, domain, |x, _| {
        (if x == 4 { 2.0 } else { 1.0 }, [0.0, 0.0])
    });
    let u_adv = [0.1, 0.0];
    setup::set_advection_velocity_2d(&mut lattice, domain, u_adv);

    for _ in 0..100 {
        lattice.collide_and_stream();
    }
    // The centre of mass of the excess scalar has moved roughly u*t
    // downstream (diffusion spreads it but does not move the mean).
    let mut weight = 0.0;
    let mut first_moment = 0.0;
    for x in 0..32 {
        for y in 0..8 {
            let excess = lattice.compute_density(x, y) - 1.0;
            weight += excess;
            // Unwrap the periodic coordinate around the starting position.
            let dx = (x - 4).rem_euclid(32);
            let dx = if dx > 16 { dx - 32 } else { dx };
            first_moment += excess * dx as Scalar;
        }
    }
    let displacement = first_moment / weight;
    assert!(
        (displacement - 10.0).abs() < 2.0,
        "scalar advected by {displacement} cells instead of ~10"
    );
}

#[test]
fn wall_temperatures_drive_the_field_to_the_imposed_value() {
    let n: i64 = 16;
    let mut lattice = ScalarLattice::new(n, n, Dynamics::advection_bgk(1.0));
    let bc = create_advection_boundary_condition_2d();
    bc.set_temperature_condition_on_block_boundaries(&mut lattice);

    let domain = lattice.bounding_box();
    let theta_wall = 1.2;
    setup::set_boundary_density_2d(&mut lattice, domain, theta_wall);
    setup::initialize_at_equilibrium_2d(&mut lattice, domain, |_, _| (1.0, [0.0, 0.0]));

    for _ in 0..4000 {
        lattice.collide_and_stream();
    }

    for x in 0..n {
        for y in 0..n {
            let theta = lattice.compute_density(x, y);
            assert!(
                (theta - theta_wall).abs() < 1e-2,
                "cell ({x},{y}) stuck at {theta}"
            );
        }
    }
}

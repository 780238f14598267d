//! Contracts of the individual collision operators.

use cremalb::core::statistics::BlockStatistics;
use cremalb::descriptor::{Descriptor, D2Q9};
use cremalb::dynamics::{params, Dynamics};
use cremalb::lattice::BlockLattice2D;
use cremalb::lb;
use cremalb::setup;
use cremalb::Scalar;

fn seeded_stats() -> BlockStatistics {
    let mut stats = BlockStatistics::new();
    stats.subscribe_average();
    stats.subscribe_average();
    stats.subscribe_max();
    stats.evaluate_seeded(&[0.0, 0.0], &[], &[0.0], &[], 1);
    stats
}

fn sheared_populations() -> [Scalar; 9] {
    let j = [0.03, -0.01];
    let j_sqr = lb::norm_sqr(&j);
    let mut pi = [0.0; 6];
    pi[0] = 2e-3;
    pi[1] = -8e-4;
    pi[2] = 1e-3;
    let mut f = [0.0; 9];
    lb::regularize::<D2Q9, 2, 9, 0>(&mut f, 0.04, &j, j_sqr, &pi);
    // Perturb so the state is not exactly regularized.
    for (i, value) in f.iter_mut().enumerate() {
        *value += 1e-4 * ((i * 5) % 3) as Scalar;
    }
    f
}

/// The regularize-then-collide composite is algebraically the regularized
/// BGK operator.
#[test]
fn rlb_composite_equals_regularized_bgk() {
    let omega = 1.3;
    let composite: Dynamics<D2Q9, 2, 9, 0> = Dynamics::rlb(Dynamics::bgk(omega));
    let direct: Dynamics<D2Q9, 2, 9, 0> = Dynamics::regularized_bgk(omega);

    let mut f_composite = sheared_populations();
    let mut f_direct = f_composite;
    let mut external = [0.0; 0];
    let mut stats = seeded_stats();
    composite.collide(&mut f_composite, &mut external, false, &mut stats);
    direct.collide(&mut f_direct, &mut external, false, &mut stats);
    for i in 0..9 {
        assert!(
            (f_composite[i] - f_direct[i]).abs() < 1e-14,
            "population {i}: {} vs {}",
            f_composite[i],
            f_direct[i]
        );
    }
}

/// The momentum-exchange wall gathers exactly `-2 sum c_i f_i` over the
/// declared fluid directions into its statistics slots, then bounces back.
#[test]
fn momentum_exchange_gathers_the_declared_flux() {
    let mut stats = seeded_stats();
    let slot_x = stats.subscribe_sum();
    let slot_y = stats.subscribe_sum();

    let fluid_directions: Vec<usize> = (1..9).collect();
    let mut dynamics: Dynamics<D2Q9, 2, 9, 0> = Dynamics::momentum_exchange([slot_x, slot_y]);
    dynamics.set_fluid_directions(fluid_directions.clone());

    let mut f = sheared_populations();
    let reference = f;
    let mut expected = [0.0; 2];
    for &i in &fluid_directions {
        for k in 0..2 {
            expected[k] += 2.0 * <D2Q9 as Descriptor<2, 9, 0>>::C[i][k] as Scalar * reference[i];
        }
    }

    let mut external = [0.0; 0];
    dynamics.collide(&mut f, &mut external, true, &mut stats);
    stats.evaluate();
    assert!((stats.get_sum(slot_x) + expected[0]).abs() < 1e-14);
    assert!((stats.get_sum(slot_y) + expected[1]).abs() < 1e-14);
    // And the populations were bounced.
    for i in 1..=4 {
        assert_eq!(f[i], reference[i + 4]);
        assert_eq!(f[i + 4], reference[i]);
    }
}

/// The constant-density operator pulls the lattice average back to one.
#[test]
fn const_rho_bgk_recentres_the_average_density() {
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
        BlockLattice2D::new(12, 12, Dynamics::const_rho_bgk(1.0));
    lattice.set_periodic(0, true);
    lattice.set_periodic(1, true);
    let domain = lattice.bounding_box();
    // Uniformly too dense by five percent.
    setup::initialize_at_equilibrium_2d(&mut lattice, domain, |_, _| (1.05, [0.0, 0.0]));
    for _ in 0..200 {
        lattice.collide_and_stream();
    }
    assert!(
        (lattice.average_density() - 1.0).abs() < 1e-3,
        "average density stuck at {}",
        lattice.average_density()
    );
}

#[test]
fn incompressible_bgk_conserves_mass_and_momentum() {
    let dynamics: Dynamics<D2Q9, 2, 9, 0> = Dynamics::inc_bgk(0.7);
    let mut f = sheared_populations();
    let (rho_before, j_before) = lb::moments::get_rho_bar_j::<D2Q9, 2, 9, 0>(&f);
    let mut external = [0.0; 0];
    let mut stats = seeded_stats();
    dynamics.collide(&mut f, &mut external, false, &mut stats);
    let (rho_after, j_after) = lb::moments::get_rho_bar_j::<D2Q9, 2, 9, 0>(&f);
    assert!((rho_before - rho_after).abs() < 1e-14);
    assert!((j_before[0] - j_after[0]).abs() < 1e-14);
    assert!((j_before[1] - j_after[1]).abs() < 1e-14);
}

#[test]
fn generic_parameter_access_reaches_omega_and_lambda() {
    let mut mrt: Dynamics<cremalb::descriptor::MrtD2Q9, 2, 9, 0> =
        Dynamics::mrt_with_lambda(1.2, 1.7);
    assert!((mrt.parameter(params::OMEGA_SHEAR) - 1.2).abs() < 1e-15);
    assert!((mrt.parameter(params::OMEGA_BULK) - 1.7).abs() < 1e-15);
    mrt.set_parameter(params::OMEGA_BULK, 1.1);
    mrt.set_parameter(params::OMEGA_SHEAR, 0.9);
    assert!((mrt.omega() - 0.9).abs() < 1e-15);
    assert!((mrt.parameter(params::OMEGA_BULK) - 1.1).abs() < 1e-15);

    // Unknown ids read as zero and are ignored on write.
    let mut bgk: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bgk(1.0);
    assert_eq!(bgk.parameter(500), 0.0);
    bgk.set_parameter(500, 3.0);
    assert!((bgk.omega() - 1.0).abs() < 1e-15);
}

/// Imposing macroscopic values is meaningful on boundary composites only;
/// on bulk operators it is a silent no-op.
#[test]
fn define_velocity_is_a_no_op_in_the_bulk() {
    let mut bulk: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bgk(1.0);
    bulk.define_velocity([0.5, 0.5]);
    let f = sheared_populations();
    let external = [0.0; 0];
    let u = bulk.compute_velocity(&f, &external);
    assert!(u[0].abs() < 1.0 && (u[0] - 0.5).abs() > 0.4);
}

/// A sheared state lowers the Smagorinsky effective relaxation rate, so the
/// post-collision off-equilibrium differs from plain BGK.
#[test]
fn smagorinsky_reacts_to_the_local_stress() {
    let smago: Dynamics<D2Q9, 2, 9, 0> = Dynamics::smagorinsky_bgk(1.6, 0.2);
    let bgk: Dynamics<D2Q9, 2, 9, 0> = Dynamics::bgk(1.6);
    let mut f_smago = sheared_populations();
    let mut f_bgk = f_smago;
    let mut external = [0.0; 0];
    let mut stats = seeded_stats();
    smago.collide(&mut f_smago, &mut external, false, &mut stats);
    bgk.collide(&mut f_bgk, &mut external, false, &mut stats);
    let mut max_diff: Scalar = 0.0;
    for i in 0..9 {
        max_diff = max_diff.max((f_smago[i] - f_bgk[i]).abs());
    }
    assert!(max_diff > 1e-9, "subgrid correction had no effect");
    // Conserved moments stay conserved regardless.
    let (r1, j1) = lb::moments::get_rho_bar_j::<D2Q9, 2, 9, 0>(&f_smago);
    let (r2, j2) = lb::moments::get_rho_bar_j::<D2Q9, 2, 9, 0>(&f_bgk);
    assert!((r1 - r2).abs() < 1e-14);
    assert!((j1[0] - j2[0]).abs() < 1e-14);
    assert!((j1[1] - j2[1]).abs() < 1e-14);
}

//! Body-force-driven channel flow (Poiseuille) with Guo forcing,
//! periodic in the stream-wise direction.

use cremalb::boundary::{create_local_boundary_condition_2d, BcType};
use cremalb::core::geometry::Box2D;
use cremalb::descriptor::ForcedD2Q9;
use cremalb::dynamics::Dynamics;
use cremalb::lattice::BlockLattice2D;
use cremalb::setup;
use cremalb::utils::terminal;
use cremalb::Scalar;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

fn main() {
    env_logger::init();
    terminal::print_welcome_message();

    let nx: i64 = 32;
    let ny: i64 = 64;
    let viscosity: Scalar = 0.05;
    let force: Scalar = 1e-5;
    let time_steps: u64 = 20_000;

    let omega = match setup::relaxation_from_viscosity(viscosity, 1.0 / 3.0) {
        Ok(omega) => omega,
        Err(err) => {
            terminal::report_failure(&err.to_string());
            return;
        }
    };

    let mut lattice: BlockLattice2D<ForcedD2Q9, 9, 2> =
        BlockLattice2D::new(nx, ny, Dynamics::guo_force_bgk(omega));
    lattice.set_periodic(0, true);

    // No-slip channel walls; the stream-wise direction stays periodic.
    let bc = create_local_boundary_condition_2d();
    let bbox = lattice.bounding_box();
    bc.add_velocity_boundary(1, -1, Box2D::new(0, nx - 1, 0, 0), &mut lattice, BcType::Dirichlet);
    bc.add_velocity_boundary(
        1,
        1,
        Box2D::new(0, nx - 1, ny - 1, ny - 1),
        &mut lattice,
        BcType::Dirichlet,
    );
    setup::set_boundary_velocity_2d(&mut lattice, Box2D::new(0, nx - 1, 0, 0), [0.0, 0.0]);
    setup::set_boundary_velocity_2d(
        &mut lattice,
        Box2D::new(0, nx - 1, ny - 1, ny - 1),
        [0.0, 0.0],
    );

    setup::set_external_force_2d(&mut lattice, bbox, [force, 0.0]);
    setup::initialize_at_equilibrium_2d(&mut lattice, bbox, |_, _| (1.0, [0.0, 0.0]));

    let progress = ProgressBar::new(time_steps);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:55.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    let start_time = Instant::now();
    for _ in 0..time_steps {
        lattice.collide_and_stream();
        progress.inc(1);
    }
    progress.finish_with_message("");

    let elapsed = start_time.elapsed().as_secs_f64();
    let mlups = (nx * ny) as f64 * time_steps as f64 / elapsed / 1_000_000.0;
    terminal::print_metrics(time_steps, elapsed, mlups);

    // Compare the centreline against the parabolic profile.
    let h = (ny - 1) as Scalar;
    let u_max_expected = force * h * h / (8.0 * viscosity);
    let u_centre = lattice.compute_velocity(nx / 2, ny / 2)[0];
    println!(
        "centre u_x = {:.6e} (parabolic profile predicts {:.6e})",
        u_centre, u_max_expected
    );
}

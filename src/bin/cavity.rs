//! Lid-driven cavity on a D2Q9 lattice with regularized velocity walls.

use cremalb::boundary::{create_local_boundary_condition_2d, BcType};
use cremalb::core::geometry::Box2D;
use cremalb::descriptor::D2Q9;
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

    let n: i64 = 128;
    let viscosity: Scalar = 0.01;
    let u_lid: Scalar = 0.05;
    let time_steps: u64 = 20_000;

    let omega = match setup::relaxation_from_viscosity(viscosity, 1.0 / 3.0) {
        Ok(omega) => omega,
        Err(err) => {
            terminal::report_failure(&err.to_string());
            return;
        }
    };

    let mut lattice: BlockLattice2D<D2Q9, 9, 0> = BlockLattice2D::new(n, n, Dynamics::bgk(omega));

    // Dirichlet velocity on all four walls; the lid moves, the others stick.
    let bc = create_local_boundary_condition_2d();
    bc.set_velocity_condition_on_block_boundaries(&mut lattice, BcType::Dirichlet);
    let lattice_domain = lattice.bounding_box();
    setup::set_boundary_velocity_2d(&mut lattice, lattice_domain, [0.0, 0.0]);
    setup::set_boundary_velocity_2d(&mut lattice, Box2D::new(1, n - 2, n - 1, n - 1), [u_lid, 0.0]);

    setup::initialize_at_equilibrium_2d(&mut lattice, lattice_domain, |_, _| {
        (1.0, [0.0, 0.0])
    });

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
    let mlups = (n * n) as f64 * time_steps as f64 / elapsed / 1_000_000.0;
    terminal::print_metrics(time_steps, elapsed, mlups);

    let centre = lattice.compute_velocity(n / 2, n / 2);
    println!(
        "average rho = {:.6}, centre velocity = ({:+.3e}, {:+.3e})",
        lattice.average_density(),
        centre[0],
        centre[1]
    );
}

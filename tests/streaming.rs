//! Streaming-kernel correctness: single-population propagation, periodic
//! wrap-around, and equivalence of the fused kernel with the two-sweep path.
//!
//! A lattice whose cells all carry `NoDynamics` turns `collide_and_stream`
//! into pure propagation: the collision sweep only reverts the populations,
//! which is exactly the storage convention the pair-swap streaming expects.

use cremalb::core::cache::CachePolicy;
use cremalb::descriptor::{Descriptor, D2Q9, D3Q19};
use cremalb::dynamics::Dynamics;
use cremalb::lattice::{BlockLattice2D, BlockLattice3D};
use cremalb::Scalar;

#[test]
fn single_population_streams_one_cell_in_3d() {
    // 8x8x8 periodic lattice; one population in a diagonal direction must
    // move exactly one lattice vector, and every one of the 512*19 slots is
    // checked.
    let mut lattice: BlockLattice3D<D3Q19, 19, 0> =
        BlockLattice3D::new(8, 8, 8, Dynamics::no_dynamics());
    for axis in 0..3 {
        lattice.set_periodic(axis, true);
    }

    // Direction with c = (1, 1, 0).
    let mut i_pop = usize::MAX;
    for i in 0..19 {
        if D3Q19::C[i] == [1, 1, 0] {
            i_pop = i;
        }
    }
    assert!(i_pop < 19);

    lattice.cell_mut(4, 4, 4)[i_pop] = 1.0;
    lattice.collide_and_stream();

    for x in 0..8 {
        for y in 0..8 {
            for z in 0..8 {
                for i in 0..19 {
                    let expected = if (x, y, z) == (5, 5, 4) && i == i_pop { 1.0 } else { 0.0 };
                    assert_eq!(
                        lattice.cell(x, y, z)[i],
                        expected,
                        "slot ({x},{y},{z})[{i}]"
                    );
                }
            }
        }
    }
}

#[test]
fn propagation_is_exact_for_every_direction_in_3d() {
    // One step per direction, from a cell close to the positive-X envelope,
    // which is the historically delicate strip of the 3D decomposition.
    for i_pop in 1..19 {
        let mut lattice: BlockLattice3D<D3Q19, 19, 0> =
            BlockLattice3D::new(6, 6, 6, Dynamics::no_dynamics());
        for axis in 0..3 {
            lattice.set_periodic(axis, true);
        }
        let start = (5, 3, 3);
        lattice.cell_mut(start.0, start.1, start.2)[i_pop] = 1.0;
        lattice.collide_and_stream();
        let c = D3Q19::C[i_pop];
        let target = (
            (start.0 + c[0]).rem_euclid(6),
            (start.1 + c[1]).rem_euclid(6),
            (start.2 + c[2]).rem_euclid(6),
        );
        assert_eq!(
            lattice.cell(target.0, target.1, target.2)[i_pop],
            1.0,
            "direction {i_pop} did not arrive at {target:?}"
        );
        let mut total = 0.0;
        for x in 0..6 {
            for y in 0..6 {
                for z in 0..6 {
                    for i in 0..19 {
                        total += lattice.cell(x, y, z)[i];
                    }
                }
            }
        }
        assert!((total - 1.0).abs() < 1e-14, "mass lost for direction {i_pop}");
    }
}

#[test]
fn single_population_wraps_around_the_2d_corner() {
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
        BlockLattice2D::new(6, 6, Dynamics::no_dynamics());
    lattice.set_periodic(0, true);
    lattice.set_periodic(1, true);

    let mut i_pop = usize::MAX;
    for i in 0..9 {
        if D2Q9::C[i] == [1, 1] {
            i_pop = i;
        }
    }
    // From the corner cell the population must reappear at the opposite
    // corner.
    lattice.cell_mut(5, 5)[i_pop] = 1.0;
    lattice.collide_and_stream();

    for x in 0..6 {
        for y in 0..6 {
            for i in 0..9 {
                let expected = if (x, y) == (0, 0) && i == i_pop { 1.0 } else { 0.0 };
                assert_eq!(lattice.cell(x, y)[i], expected, "slot ({x},{y})[{i}]");
            }
        }
    }
}

fn seeded_lattice(block_size: i64) -> BlockLattice2D<D2Q9, 9, 0> {
    let mut lattice = BlockLattice2D::with_cache_policy(
        17,
        13,
        Dynamics::bgk(1.3),
        CachePolicy::new(block_size),
    );
    for x in 0..17 {
        for y in 0..13 {
            for i in 0..9 {
                // Deterministic, cell-dependent, non-uniform populations.
                let value = 0.1
                    + 0.01 * ((x * 31 + y * 17 + i as i64 * 7) % 23) as Scalar
                    + 1e-4 * (x + 2 * y) as Scalar;
                lattice.cell_mut(x, y)[i] = value;
            }
        }
    }
    lattice
}

#[test]
fn fused_kernel_equals_collide_then_stream() {
    let mut fused = seeded_lattice(200);
    let mut two_sweeps = seeded_lattice(200);

    let bbox = fused.bounding_box();
    fused.collide_and_stream_domain(bbox);
    two_sweeps.collide_domain(bbox);
    two_sweeps.stream_domain(bbox);

    for x in 0..17 {
        for y in 0..13 {
            for i in 0..9 {
                let a = fused.cell(x, y)[i];
                let b = two_sweeps.cell(x, y)[i];
                assert!(
                    (a - b).abs() < 1e-14,
                    "mismatch at ({x},{y})[{i}]: {a} vs {b}"
                );
            }
        }
    }
}

#[test]
fn fused_kernel_is_invariant_under_the_cache_block_size() {
    // A tiny block size exercises the skewed tiling; the result must be
    // bit-compatible with the untiled sweep.
    let mut small_blocks = seeded_lattice(3);
    let mut large_blocks = seeded_lattice(200);

    for _ in 0..3 {
        small_blocks.collide_and_stream();
        large_blocks.collide_and_stream();
    }

    for x in 0..17 {
        for y in 0..13 {
            for i in 0..9 {
                let a = small_blocks.cell(x, y)[i];
                let b = large_blocks.cell(x, y)[i];
                assert!(
                    (a - b).abs() < 1e-14,
                    "mismatch at ({x},{y})[{i}]: {a} vs {b}"
                );
            }
        }
    }
}

#[test]
fn populations_never_leave_a_non_periodic_lattice() {
    // A population aimed at the wall has no streaming partner; its mass
    // stays on the cell.
    let mut lattice: BlockLattice2D<D2Q9, 9, 0> =
        BlockLattice2D::new(4, 4, Dynamics::no_dynamics());
    let mut i_pop = usize::MAX;
    for i in 0..9 {
        if D2Q9::C[i] == [1, 0] {
            i_pop = i;
        }
    }
    lattice.cell_mut(3, 2)[i_pop] = 1.0;
    lattice.collide_and_stream();

    let mut total = 0.0;
    for x in 0..4 {
        for y in 0..4 {
            for i in 0..9 {
                total += lattice.cell(x, y)[i];
            }
        }
    }
    assert!((total - 1.0).abs() < 1e-14);
    let mut on_cell = 0.0;
    for i in 0..9 {
        on_cell += lattice.cell(3, 2)[i];
    }
    assert!((on_cell - 1.0).abs() < 1e-14);
}

//! The three-dimensional block lattice.
//!
//! Same algorithms as the 2D variant, with a second skew level in the fused
//! kernel: the inner z-range is shifted down once per x-increment and once
//! per y-increment, so every swap partner has already collided this sweep.

use crate::cell::Cell;
use crate::core::cache::CachePolicy;
use crate::core::geometry::{contained3d, Box3D};
use crate::core::statistics::BlockStatistics;
use crate::descriptor::Descriptor;
use crate::dynamics::Dynamics;
use crate::processor::{LatticeProcessor3D, ProcessorGenerator3D};
use crate::Scalar;

pub struct BlockLattice3D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<3, Q, E>,
{
    nx: i64,
    ny: i64,
    nz: i64,
    cells: Vec<Cell<Dsc, 3, Q, E>>,
    background: Dynamics<Dsc, 3, Q, E>,
    periodic: [bool; 3],
    statistics: BlockStatistics,
    processors: Vec<Box<dyn LatticeProcessor3D<Dsc, Q, E>>>,
    cache_policy: CachePolicy,
    time_counter: i64,
}

impl<Dsc, const Q: usize, const E: usize> BlockLattice3D<Dsc, Q, E>
where
    Dsc: Descriptor<3, Q, E>,
{
    pub fn new(nx: i64, ny: i64, nz: i64, background: Dynamics<Dsc, 3, Q, E>) -> Self {
        Self::with_cache_policy(nx, ny, nz, background, CachePolicy::three_d())
    }

    pub fn with_cache_policy(
        nx: i64,
        ny: i64,
        nz: i64,
        background: Dynamics<Dsc, 3, Q, E>,
        cache_policy: CachePolicy,
    ) -> Self {
        assert!(nx > 0 && ny > 0 && nz > 0, "lattice extents must be positive");
        let mut statistics = BlockStatistics::new();
        statistics.subscribe_average();
        statistics.subscribe_average();
        statistics.subscribe_max();
        statistics.evaluate_seeded(&[Dsc::rho_bar(1.0), 0.0], &[], &[0.0], &[], 1);
        log::info!("allocating {nx}x{ny}x{nz} lattice, q={Q}, externals={E}");
        BlockLattice3D {
            nx,
            ny,
            nz,
            cells: (0..nx * ny * nz).map(|_| Cell::new()).collect(),
            background,
            periodic: [false; 3],
            statistics,
            processors: Vec::new(),
            cache_policy,
            time_counter: 0,
        }
    }

    pub fn nx(&self) -> i64 {
        self.nx
    }

    pub fn ny(&self) -> i64 {
        self.ny
    }

    pub fn nz(&self) -> i64 {
        self.nz
    }

    pub fn bounding_box(&self) -> Box3D {
        Box3D::new(0, self.nx - 1, 0, self.ny - 1, 0, self.nz - 1)
    }

    #[inline]
    fn idx(&self, x: i64, y: i64, z: i64) -> usize {
        debug_assert!(self.bounding_box().contains(x, y, z));
        (self.nz * (y + self.ny * x) + z) as usize
    }

    #[inline]
    pub fn cell(&self, x: i64, y: i64, z: i64) -> &Cell<Dsc, 3, Q, E> {
        &self.cells[self.idx(x, y, z)]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: i64, y: i64, z: i64) -> &mut Cell<Dsc, 3, Q, E> {
        let i = self.idx(x, y, z);
        &mut self.cells[i]
    }

    pub fn background_dynamics(&self) -> &Dynamics<Dsc, 3, Q, E> {
        &self.background
    }

    pub fn dynamics_at(&self, x: i64, y: i64, z: i64) -> &Dynamics<Dsc, 3, Q, E> {
        self.cell(x, y, z).dynamics_or(&self.background)
    }

    pub fn attribute_dynamics(&mut self, x: i64, y: i64, z: i64, dynamics: Dynamics<Dsc, 3, Q, E>) {
        self.cell_mut(x, y, z).attribute_dynamics(dynamics);
    }

    pub fn define_dynamics(&mut self, domain: Box3D, template: &Dynamics<Dsc, 3, Q, E>) {
        assert!(contained3d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    self.attribute_dynamics(x, y, z, template.clone());
                }
            }
        }
    }

    pub fn specify_statistics_status(&mut self, domain: Box3D, status: bool) {
        assert!(contained3d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    self.cell_mut(x, y, z).specify_statistics_status(status);
                }
            }
        }
    }

    pub fn set_periodic(&mut self, axis: usize, periodic: bool) {
        self.periodic[axis] = periodic;
    }

    pub fn statistics(&self) -> &BlockStatistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut BlockStatistics {
        &mut self.statistics
    }

    pub fn time_counter(&self) -> i64 {
        self.time_counter
    }

    pub fn average_density(&self) -> Scalar {
        Dsc::full_rho(self.statistics.get_average(crate::core::statistics::AVG_RHO_BAR))
    }

    pub fn compute_density(&self, x: i64, y: i64, z: i64) -> Scalar {
        let cell = self.cell(x, y, z);
        cell.dynamics_or(&self.background)
            .compute_density(&cell.f, &cell.external)
    }

    pub fn compute_velocity(&self, x: i64, y: i64, z: i64) -> [Scalar; 3] {
        let cell = self.cell(x, y, z);
        cell.dynamics_or(&self.background)
            .compute_velocity(&cell.f, &cell.external)
    }

    pub fn collide_domain(&mut self, domain: Box3D) {
        assert!(contained3d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    let i = self.idx(x, y, z);
                    let cell = &mut self.cells[i];
                    cell.collide(&self.background, &mut self.statistics);
                    cell.revert();
                }
            }
        }
    }

    pub fn collide(&mut self) {
        self.collide_domain(self.bounding_box());
    }

    pub fn stream_domain(&mut self, domain: Box3D) {
        assert!(contained3d(domain, self.bounding_box()));
        let vic = Dsc::VICINITY;

        self.bulk_stream(Box3D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y0 + vic,
            domain.y1 - vic,
            domain.z0 + vic,
            domain.z1 - vic,
        ));

        for envelope in Self::envelope_strips(domain, vic) {
            self.boundary_stream(domain, envelope);
        }
    }

    pub fn stream(&mut self) {
        self.stream_domain(self.bounding_box());
        self.implement_periodicity();
        self.execute_internal_processors();
        self.evaluate_statistics();
        self.time_counter += 1;
    }

    pub fn collide_and_stream_domain(&mut self, domain: Box3D) {
        assert!(contained3d(domain, self.bounding_box()));
        let vic = Dsc::VICINITY;

        for envelope in Self::envelope_strips(domain, vic) {
            self.collide_domain(envelope);
        }

        self.bulk_collide_and_stream(Box3D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y0 + vic,
            domain.y1 - vic,
            domain.z0 + vic,
            domain.z1 - vic,
        ));

        for envelope in Self::envelope_strips(domain, vic) {
            self.boundary_stream(domain, envelope);
        }
    }

    pub fn collide_and_stream(&mut self) {
        self.collide_and_stream_domain(self.bounding_box());
        self.implement_periodicity();
        self.execute_internal_processors();
        self.evaluate_statistics();
        self.time_counter += 1;
    }

    /// The six non-overlapping envelope slabs of `domain`: two full x-slabs,
    /// two y-slabs trimmed in x, two z-slabs trimmed in x and y.
    fn envelope_strips(domain: Box3D, vic: i64) -> [Box3D; 6] {
        [
            Box3D::new(domain.x0, domain.x0 + vic - 1, domain.y0, domain.y1, domain.z0, domain.z1),
            Box3D::new(domain.x1 - vic + 1, domain.x1, domain.y0, domain.y1, domain.z0, domain.z1),
            Box3D::new(
                domain.x0 + vic,
                domain.x1 - vic,
                domain.y0,
                domain.y0 + vic - 1,
                domain.z0,
                domain.z1,
            ),
            Box3D::new(
                domain.x0 + vic,
                domain.x1 - vic,
                domain.y1 - vic + 1,
                domain.y1,
                domain.z0,
                domain.z1,
            ),
            Box3D::new(
                domain.x0 + vic,
                domain.x1 - vic,
                domain.y0 + vic,
                domain.y1 - vic,
                domain.z0,
                domain.z0 + vic - 1,
            ),
            Box3D::new(
                domain.x0 + vic,
                domain.x1 - vic,
                domain.y0 + vic,
                domain.y1 - vic,
                domain.z1 - vic + 1,
                domain.z1,
            ),
        ]
    }

    #[inline]
    fn swap_pop(&mut self, a: usize, ia: usize, b: usize, ib: usize) {
        let tmp = self.cells[a].f[ia];
        self.cells[a].f[ia] = self.cells[b].f[ib];
        self.cells[b].f[ib] = tmp;
    }

    fn bulk_stream(&mut self, domain: Box3D) {
        assert!(contained3d(domain, self.bounding_box()));
        let half = Q / 2;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    let here = self.idx(x, y, z);
                    for i in 1..=half {
                        let next =
                            self.idx(x + Dsc::C[i][0], y + Dsc::C[i][1], z + Dsc::C[i][2]);
                        self.swap_pop(here, i + half, next, i);
                    }
                }
            }
        }
    }

    fn boundary_stream(&mut self, bound: Box3D, domain: Box3D) {
        assert!(contained3d(bound, self.bounding_box()));
        assert!(contained3d(domain, bound));
        let half = Q / 2;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    let here = self.idx(x, y, z);
                    for i in 1..=half {
                        let next_x = x + Dsc::C[i][0];
                        let next_y = y + Dsc::C[i][1];
                        let next_z = z + Dsc::C[i][2];
                        if bound.contains(next_x, next_y, next_z) {
                            let next = self.idx(next_x, next_y, next_z);
                            self.swap_pop(here, i + half, next, i);
                        }
                    }
                }
            }
        }
    }

    #[inline]
    fn swap_and_stream(&mut self, x: i64, y: i64, z: i64) {
        let half = Q / 2;
        let here = self.idx(x, y, z);
        for i in 1..=half {
            let next = self.idx(x + Dsc::C[i][0], y + Dsc::C[i][1], z + Dsc::C[i][2]);
            let f_tmp = self.cells[here].f[i];
            self.cells[here].f[i] = self.cells[here].f[i + half];
            self.cells[here].f[i + half] = self.cells[next].f[i];
            self.cells[next].f[i] = f_tmp;
        }
    }

    fn bulk_collide_and_stream(&mut self, domain: Box3D) {
        assert!(contained3d(domain, self.bounding_box()));
        if domain.x0 > domain.x1 || domain.y0 > domain.y1 || domain.z0 > domain.z1 {
            return;
        }
        let block = self.cache_policy.block_size();
        let mut outer_x = domain.x0;
        while outer_x <= domain.x1 {
            let mut outer_y = domain.y0;
            while outer_y <= domain.y1 + block - 1 {
                let mut outer_z = domain.z0;
                while outer_z <= domain.z1 + 2 * (block - 1) {
                    let mut dx = 0;
                    let inner_x_end = (outer_x + block - 1).min(domain.x1);
                    for inner_x in outer_x..=inner_x_end {
                        let min_y = outer_y - dx;
                        let max_y = min_y + block - 1;
                        let mut dy = 0;
                        let y_begin = min_y.max(domain.y0);
                        let y_end = max_y.min(domain.y1);
                        for inner_y in y_begin..=y_end {
                            let min_z = outer_z - dx - dy;
                            let max_z = min_z + block - 1;
                            let z_begin = min_z.max(domain.z0);
                            let z_end = max_z.min(domain.z1);
                            for inner_z in z_begin..=z_end {
                                let i = self.idx(inner_x, inner_y, inner_z);
                                let cell = &mut self.cells[i];
                                cell.collide(&self.background, &mut self.statistics);
                                self.swap_and_stream(inner_x, inner_y, inner_z);
                            }
                            dy += 1;
                        }
                        dx += 1;
                    }
                    outer_z += block;
                }
                outer_y += block;
            }
            outer_x += block;
        }
    }

    fn periodic_domain(&mut self, domain: Box3D) {
        let (nx, ny, nz) = (self.nx, self.ny, self.nz);
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    for i in 1..Q {
                        let prev_x = x - Dsc::C[i][0];
                        let prev_y = y - Dsc::C[i][1];
                        let prev_z = z - Dsc::C[i][2];
                        if prev_x >= 0
                            && prev_x < nx
                            && prev_y >= 0
                            && prev_y < ny
                            && prev_z >= 0
                            && prev_z < nz
                        {
                            let wrapped =
                                self.idx(x.rem_euclid(nx), y.rem_euclid(ny), z.rem_euclid(nz));
                            let prev = self.idx(prev_x, prev_y, prev_z);
                            let opp = Dsc::opposite(i);
                            self.swap_pop(prev, opp, wrapped, i);
                        }
                    }
                }
            }
        }
    }

    /// Faces first, then the axis-pair edges, then the corners which compose
    /// all three axes.
    pub fn implement_periodicity(&mut self) {
        let vic = Dsc::VICINITY;
        let max_x = self.nx - 1;
        let max_y = self.ny - 1;
        let max_z = self.nz - 1;
        let (px, py, pz) = (self.periodic[0], self.periodic[1], self.periodic[2]);

        if px {
            self.periodic_domain(Box3D::new(-vic, -1, 0, max_y, 0, max_z));
        }
        if py {
            self.periodic_domain(Box3D::new(0, max_x, -vic, -1, 0, max_z));
        }
        if pz {
            self.periodic_domain(Box3D::new(0, max_x, 0, max_y, -vic, -1));
        }

        if py && pz {
            self.periodic_domain(Box3D::new(0, max_x, -vic, -1, -vic, -1));
            self.periodic_domain(Box3D::new(0, max_x, -vic, -1, max_z + 1, max_z + vic));
        }
        if px && pz {
            self.periodic_domain(Box3D::new(-vic, -1, 0, max_y, -vic, -1));
            self.periodic_domain(Box3D::new(max_x + 1, max_x + vic, 0, max_y, -vic, -1));
        }
        if px && py {
            self.periodic_domain(Box3D::new(-vic, -1, -vic, -1, 0, max_z));
            self.periodic_domain(Box3D::new(-vic, -1, max_y + 1, max_y + vic, 0, max_z));
        }

        if px && py && pz {
            self.periodic_domain(Box3D::new(
                max_x + 1,
                max_x + vic,
                max_y + 1,
                max_y + vic,
                max_z + 1,
                max_z + vic,
            ));
            self.periodic_domain(Box3D::new(
                max_x + 1,
                max_x + vic,
                max_y + 1,
                max_y + vic,
                -vic,
                -1,
            ));
            self.periodic_domain(Box3D::new(
                max_x + 1,
                max_x + vic,
                -vic,
                -1,
                max_z + 1,
                max_z + vic,
            ));
            self.periodic_domain(Box3D::new(max_x + 1, max_x + vic, -vic, -1, -vic, -1));
        }
    }

    pub fn add_internal_processor(&mut self, generator: Box<dyn ProcessorGenerator3D<Dsc, Q, E>>) {
        log::debug!("registering internal processor #{}", self.processors.len());
        self.processors.push(generator.generate());
    }

    pub fn execute_internal_processors(&mut self) {
        let mut processors = std::mem::take(&mut self.processors);
        for processor in processors.iter_mut() {
            processor.process(self);
        }
        processors.append(&mut self.processors);
        self.processors = processors;
    }

    pub fn evaluate_statistics(&mut self) {
        self.statistics.evaluate();
    }

    pub const fn size_of_cell() -> usize {
        Q + E
    }

    pub fn send(&self, domain: Box3D, buffer: &mut Vec<Scalar>) {
        assert!(contained3d(domain, self.bounding_box()));
        buffer.clear();
        buffer.resize(domain.n_cells() as usize * Self::size_of_cell(), 0.0);
        let mut offset = 0;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    self.cell(x, y, z)
                        .serialize(&mut buffer[offset..offset + Self::size_of_cell()]);
                    offset += Self::size_of_cell();
                }
            }
        }
    }

    pub fn receive(&mut self, domain: Box3D, buffer: &[Scalar]) {
        assert!(contained3d(domain, self.bounding_box()));
        assert_eq!(buffer.len(), domain.n_cells() as usize * Self::size_of_cell());
        let mut offset = 0;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for z in domain.z0..=domain.z1 {
                    self.cell_mut(x, y, z)
                        .unserialize(&buffer[offset..offset + Self::size_of_cell()]);
                    offset += Self::size_of_cell();
                }
            }
        }
    }

    pub fn attribute(&mut self, to_domain: Box3D, dx: i64, dy: i64, dz: i64, from: &Self) {
        assert!(contained3d(to_domain, self.bounding_box()));
        for x in to_domain.x0..=to_domain.x1 {
            for y in to_domain.y0..=to_domain.y1 {
                for z in to_domain.z0..=to_domain.z1 {
                    let source = from.cell(x + dx, y + dy, z + dz).clone();
                    self.cell_mut(x, y, z).attribute_values(&source);
                }
            }
        }
    }
}

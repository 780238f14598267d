//! The two-dimensional block lattice.
//!
//! Streaming is implemented as a half-scan pair swap: for every cell and
//! every direction `i` in the first half of the velocity set, the `i+q/2`
//! population is exchanged with the `i` population of the downstream
//! neighbour. After the whole domain has been visited this is algebraically
//! one streaming step, in place, with no temporary lattice.
//!
//! The fused collide-and-stream kernel tiles the domain into cache blocks
//! and skews the inner y-range by minus one per x-increment. The skew is not
//! an optimisation: it guarantees that the neighbour touched by the swap has
//! already collided this step.

use crate::cell::Cell;
use crate::core::cache::CachePolicy;
use crate::core::geometry::{contained2d, Box2D};
use crate::core::statistics::BlockStatistics;
use crate::descriptor::Descriptor;
use crate::dynamics::Dynamics;
use crate::processor::{LatticeProcessor2D, ProcessorGenerator2D};
use crate::Scalar;

pub struct BlockLattice2D<Dsc, const Q: usize, const E: usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    nx: i64,
    ny: i64,
    cells: Vec<Cell<Dsc, 2, Q, E>>,
    background: Dynamics<Dsc, 2, Q, E>,
    periodic: [bool; 2],
    statistics: BlockStatistics,
    processors: Vec<Box<dyn LatticeProcessor2D<Dsc, Q, E>>>,
    cache_policy: CachePolicy,
    time_counter: i64,
}

impl<Dsc, const Q: usize, const E: usize> BlockLattice2D<Dsc, Q, E>
where
    Dsc: Descriptor<2, Q, E>,
{
    /// Build a lattice whose cells all follow `background`. Statistics are
    /// seeded to an average density of one so that constant-density models
    /// read a sane value before the first step.
    pub fn new(nx: i64, ny: i64, background: Dynamics<Dsc, 2, Q, E>) -> Self {
        Self::with_cache_policy(nx, ny, background, CachePolicy::two_d())
    }

    pub fn with_cache_policy(
        nx: i64,
        ny: i64,
        background: Dynamics<Dsc, 2, Q, E>,
        cache_policy: CachePolicy,
    ) -> Self {
        assert!(nx > 0 && ny > 0, "lattice extents must be positive");
        let mut statistics = BlockStatistics::new();
        statistics.subscribe_average(); // average rho-bar
        statistics.subscribe_average(); // average u-squared
        statistics.subscribe_max(); // max u-squared
        statistics.evaluate_seeded(&[Dsc::rho_bar(1.0), 0.0], &[], &[0.0], &[], 1);
        log::info!("allocating {nx}x{ny} lattice, q={Q}, externals={E}");
        BlockLattice2D {
            nx,
            ny,
            cells: (0..nx * ny).map(|_| Cell::new()).collect(),
            background,
            periodic: [false; 2],
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

    /// The lower-left corner of an atomic block is always the origin.
    pub fn bounding_box(&self) -> Box2D {
        Box2D::new(0, self.nx - 1, 0, self.ny - 1)
    }

    #[inline]
    fn idx(&self, x: i64, y: i64) -> usize {
        debug_assert!(self.bounding_box().contains(x, y));
        (x * self.ny + y) as usize
    }

    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> &Cell<Dsc, 2, Q, E> {
        &self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: i64, y: i64) -> &mut Cell<Dsc, 2, Q, E> {
        let i = self.idx(x, y);
        &mut self.cells[i]
    }

    pub fn background_dynamics(&self) -> &Dynamics<Dsc, 2, Q, E> {
        &self.background
    }

    /// The dynamics governing a cell, resolving the background fallback.
    pub fn dynamics_at(&self, x: i64, y: i64) -> &Dynamics<Dsc, 2, Q, E> {
        self.cell(x, y).dynamics_or(&self.background)
    }

    /// Attach a cell-owned dynamics; the previous cell-owned one is dropped.
    pub fn attribute_dynamics(&mut self, x: i64, y: i64, dynamics: Dynamics<Dsc, 2, Q, E>) {
        self.cell_mut(x, y).attribute_dynamics(dynamics);
    }

    /// Give every cell of `domain` an independent clone of `template`.
    pub fn define_dynamics(&mut self, domain: Box2D, template: &Dynamics<Dsc, 2, Q, E>) {
        assert!(contained2d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                self.attribute_dynamics(x, y, template.clone());
            }
        }
    }

    pub fn specify_statistics_status(&mut self, domain: Box2D, status: bool) {
        assert!(contained2d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                self.cell_mut(x, y).specify_statistics_status(status);
            }
        }
    }

    pub fn set_periodic(&mut self, axis: usize, periodic: bool) {
        self.periodic[axis] = periodic;
    }

    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
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

    pub fn average_energy(&self) -> Scalar {
        0.5 * self.statistics.get_average(crate::core::statistics::AVG_U_SQR)
    }

    pub fn max_velocity(&self) -> Scalar {
        self.statistics.get_max(crate::core::statistics::MAX_U_SQR).sqrt()
    }

    pub fn compute_density(&self, x: i64, y: i64) -> Scalar {
        let cell = self.cell(x, y);
        cell.dynamics_or(&self.background)
            .compute_density(&cell.f, &cell.external)
    }

    pub fn compute_velocity(&self, x: i64, y: i64) -> [Scalar; 2] {
        let cell = self.cell(x, y);
        cell.dynamics_or(&self.background)
            .compute_velocity(&cell.f, &cell.external)
    }

    pub fn compute_rho_bar_j(&self, x: i64, y: i64) -> (Scalar, [Scalar; 2]) {
        let cell = self.cell(x, y);
        cell.dynamics_or(&self.background)
            .compute_rho_bar_j(&cell.f, &cell.external)
    }

    /// Collide-and-revert every cell of `domain`. No streaming, no
    /// statistics flush.
    pub fn collide_domain(&mut self, domain: Box2D) {
        assert!(contained2d(domain, self.bounding_box()));
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                let i = self.idx(x, y);
                let cell = &mut self.cells[i];
                cell.collide(&self.background, &mut self.statistics);
                cell.revert();
            }
        }
    }

    pub fn collide(&mut self) {
        self.collide_domain(self.bounding_box());
    }

    /// Streaming on a sub-domain: unchecked pair swaps in the interior plus
    /// boundary-aware swaps on the envelope strips. No periodicity, no
    /// processors.
    pub fn stream_domain(&mut self, domain: Box2D) {
        assert!(contained2d(domain, self.bounding_box()));
        let vic = Dsc::VICINITY;

        self.bulk_stream(Box2D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y0 + vic,
            domain.y1 - vic,
        ));

        self.boundary_stream(domain, Box2D::new(domain.x0, domain.x0 + vic - 1, domain.y0, domain.y1));
        self.boundary_stream(domain, Box2D::new(domain.x1 - vic + 1, domain.x1, domain.y0, domain.y1));
        self.boundary_stream(
            domain,
            Box2D::new(domain.x0 + vic, domain.x1 - vic, domain.y0, domain.y0 + vic - 1),
        );
        self.boundary_stream(
            domain,
            Box2D::new(domain.x0 + vic, domain.x1 - vic, domain.y1 - vic + 1, domain.y1),
        );
    }

    /// Full streaming step: periodicity, processors, statistics and the time
    /// counter are all applied.
    pub fn stream(&mut self) {
        self.stream_domain(self.bounding_box());
        self.implement_periodicity();
        self.execute_internal_processors();
        self.evaluate_statistics();
        self.time_counter += 1;
    }

    /// Fused collision and streaming on a sub-domain: collide the envelope,
    /// run the cache-blocked fused kernel in the bulk, finish with
    /// boundary-aware streaming on the envelope.
    pub fn collide_and_stream_domain(&mut self, domain: Box2D) {
        assert!(contained2d(domain, self.bounding_box()));
        let vic = Dsc::VICINITY;

        self.collide_domain(Box2D::new(domain.x0, domain.x0 + vic - 1, domain.y0, domain.y1));
        self.collide_domain(Box2D::new(domain.x1 - vic + 1, domain.x1, domain.y0, domain.y1));
        self.collide_domain(Box2D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y0,
            domain.y0 + vic - 1,
        ));
        self.collide_domain(Box2D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y1 - vic + 1,
            domain.y1,
        ));

        self.bulk_collide_and_stream(Box2D::new(
            domain.x0 + vic,
            domain.x1 - vic,
            domain.y0 + vic,
            domain.y1 - vic,
        ));

        self.boundary_stream(domain, Box2D::new(domain.x0, domain.x0 + vic - 1, domain.y0, domain.y1));
        self.boundary_stream(domain, Box2D::new(domain.x1 - vic + 1, domain.x1, domain.y0, domain.y1));
        self.boundary_stream(
            domain,
            Box2D::new(domain.x0 + vic, domain.x1 - vic, domain.y0, domain.y0 + vic - 1),
        );
        self.boundary_stream(
            domain,
            Box2D::new(domain.x0 + vic, domain.x1 - vic, domain.y1 - vic + 1, domain.y1),
        );
    }

    /// The canonical time step.
    pub fn collide_and_stream(&mut self) {
        self.collide_and_stream_domain(self.bounding_box());
        self.implement_periodicity();
        self.execute_internal_processors();
        self.evaluate_statistics();
        self.time_counter += 1;
    }

    #[inline]
    fn swap_pop(&mut self, a: usize, ia: usize, b: usize, ib: usize) {
        let tmp = self.cells[a].f[ia];
        self.cells[a].f[ia] = self.cells[b].f[ib];
        self.cells[b].f[ib] = tmp;
    }

    /// Unchecked pair-swap streaming; erroneous on cells whose neighbours
    /// leave the lattice.
    fn bulk_stream(&mut self, domain: Box2D) {
        assert!(contained2d(domain, self.bounding_box()));
        let half = Q / 2;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                let here = self.idx(x, y);
                for i in 1..=half {
                    let next = self.idx(x + Dsc::C[i][0], y + Dsc::C[i][1]);
                    self.swap_pop(here, i + half, next, i);
                }
            }
        }
    }

    /// Pair-swap streaming that skips swaps whose target lies outside
    /// `bound`; populations that would leave the domain stay where they are.
    fn boundary_stream(&mut self, bound: Box2D, domain: Box2D) {
        assert!(contained2d(bound, self.bounding_box()));
        assert!(contained2d(domain, bound));
        let half = Q / 2;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                let here = self.idx(x, y);
                for i in 1..=half {
                    let next_x = x + Dsc::C[i][0];
                    let next_y = y + Dsc::C[i][1];
                    if bound.contains(next_x, next_y) {
                        let next = self.idx(next_x, next_y);
                        self.swap_pop(here, i + half, next, i);
                    }
                }
            }
        }
    }

    /// Revert the cell, then exchange the first-half populations with the
    /// post-collision downstream neighbours.
    #[inline]
    fn swap_and_stream(&mut self, x: i64, y: i64) {
        let half = Q / 2;
        let here = self.idx(x, y);
        for i in 1..=half {
            let next = self.idx(x + Dsc::C[i][0], y + Dsc::C[i][1]);
            let f_tmp = self.cells[here].f[i];
            self.cells[here].f[i] = self.cells[here].f[i + half];
            self.cells[here].f[i + half] = self.cells[next].f[i];
            self.cells[next].f[i] = f_tmp;
        }
    }

    /// Cache-blocked fused kernel. The y-range of each inner column is
    /// shifted down by one per x-increment so that every neighbour accessed
    /// by the swap has already been collided in this sweep.
    fn bulk_collide_and_stream(&mut self, domain: Box2D) {
        assert!(contained2d(domain, self.bounding_box()));
        if domain.x0 > domain.x1 || domain.y0 > domain.y1 {
            return;
        }
        let block = self.cache_policy.block_size();
        let mut outer_x = domain.x0;
        while outer_x <= domain.x1 {
            let mut outer_y = domain.y0;
            while outer_y <= domain.y1 + block - 1 {
                let mut dx = 0;
                let inner_x_end = (outer_x + block - 1).min(domain.x1);
                for inner_x in outer_x..=inner_x_end {
                    let min_y = outer_y - dx;
                    let max_y = min_y + block - 1;
                    let y_begin = min_y.max(domain.y0);
                    let y_end = max_y.min(domain.y1);
                    for inner_y in y_begin..=y_end {
                        let i = self.idx(inner_x, inner_y);
                        let cell = &mut self.cells[i];
                        cell.collide(&self.background, &mut self.statistics);
                        self.swap_and_stream(inner_x, inner_y);
                    }
                    dx += 1;
                }
                outer_y += block;
            }
            outer_x += block;
        }
    }

    /// Wrap-around of the populations that streamed off the lattice. The
    /// domains passed in use virtual coordinates just outside the bounding
    /// box; the modulo maps them back.
    fn periodic_domain(&mut self, domain: Box2D) {
        let (nx, ny) = (self.nx, self.ny);
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                for i in 1..Q {
                    let prev_x = x - Dsc::C[i][0];
                    let prev_y = y - Dsc::C[i][1];
                    if prev_x >= 0 && prev_x < nx && prev_y >= 0 && prev_y < ny {
                        let wrapped = self.idx(x.rem_euclid(nx), y.rem_euclid(ny));
                        let prev = self.idx(prev_x, prev_y);
                        let opp = Dsc::opposite(i);
                        self.swap_pop(prev, opp, wrapped, i);
                    }
                }
            }
        }
    }

    /// Apply periodicity on the requested axes: first the two edge strips,
    /// then the corner regions which compose both axes.
    pub fn implement_periodicity(&mut self) {
        let vic = Dsc::VICINITY;
        let max_x = self.nx - 1;
        let max_y = self.ny - 1;
        let (px, py) = (self.periodic[0], self.periodic[1]);
        if px {
            self.periodic_domain(Box2D::new(-vic, -1, 0, max_y));
        }
        if py {
            self.periodic_domain(Box2D::new(0, max_x, -vic, -1));
        }
        if px && py {
            // Between the (-1,-1) and (+1,+1) corners.
            self.periodic_domain(Box2D::new(-vic, -1, -vic, -1));
            // Between the (-1,+1) and (+1,-1) corners.
            self.periodic_domain(Box2D::new(-vic, -1, max_y + 1, max_y + vic));
        }
    }

    /// Consume a generator and register the processor it produces. Execution
    /// order is registration order.
    pub fn add_internal_processor(&mut self, generator: Box<dyn ProcessorGenerator2D<Dsc, Q, E>>) {
        log::debug!("registering internal processor #{}", self.processors.len());
        self.processors.push(generator.generate());
    }

    pub fn execute_internal_processors(&mut self) {
        let mut processors = std::mem::take(&mut self.processors);
        for processor in processors.iter_mut() {
            processor.process(self);
        }
        // Keep processors registered during execution, in order.
        processors.append(&mut self.processors);
        self.processors = processors;
    }

    pub fn evaluate_statistics(&mut self) {
        self.statistics.evaluate();
    }

    /// Number of scalars exchanged per cell by `send`/`receive`.
    pub const fn size_of_cell() -> usize {
        Q + E
    }

    /// Serialize the cells of `domain` into `buffer` (populations first,
    /// then externals), for halo exchange by a multi-block layer.
    pub fn send(&self, domain: Box2D, buffer: &mut Vec<Scalar>) {
        assert!(contained2d(domain, self.bounding_box()));
        buffer.clear();
        buffer.resize(domain.n_cells() as usize * Self::size_of_cell(), 0.0);
        let mut offset = 0;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                self.cell(x, y)
                    .serialize(&mut buffer[offset..offset + Self::size_of_cell()]);
                offset += Self::size_of_cell();
            }
        }
    }

    pub fn receive(&mut self, domain: Box2D, buffer: &[Scalar]) {
        assert!(contained2d(domain, self.bounding_box()));
        assert_eq!(buffer.len(), domain.n_cells() as usize * Self::size_of_cell());
        let mut offset = 0;
        for x in domain.x0..=domain.x1 {
            for y in domain.y0..=domain.y1 {
                self.cell_mut(x, y)
                    .unserialize(&buffer[offset..offset + Self::size_of_cell()]);
                offset += Self::size_of_cell();
            }
        }
    }

    /// Copy populations and externals from `from`, shifted by `(dx, dy)`;
    /// dynamics assignments are untouched. Both lattices share the same
    /// descriptor by construction.
    pub fn attribute(&mut self, to_domain: Box2D, dx: i64, dy: i64, from: &Self) {
        assert!(contained2d(to_domain, self.bounding_box()));
        for x in to_domain.x0..=to_domain.x1 {
            for y in to_domain.y0..=to_domain.y1 {
                let source = from.cell(x + dx, y + dy).clone();
                self.cell_mut(x, y).attribute_values(&source);
            }
        }
    }
}

//! Per-block statistics with subscription slots.
//!
//! Collision operators and data processors push raw values into temporary
//! accumulators during a time step (`gather_*`); `evaluate` finalises them
//! once per step, dividing averages by the number of contributing cells.
//! Readers between steps always see the finalised values of the previous
//! step.

use crate::Scalar;

/// Slot id of the average rescaled density, subscribed by every lattice.
pub const AVG_RHO_BAR: usize = 0;
/// Slot id of the average velocity-norm-squared.
pub const AVG_U_SQR: usize = 1;
/// Slot id of the maximum velocity-norm-squared.
pub const MAX_U_SQR: usize = 0;

#[derive(Debug, Clone, Default)]
pub struct BlockStatistics {
    tmp_average: Vec<Scalar>,
    tmp_sum: Vec<Scalar>,
    tmp_max: Vec<Scalar>,
    tmp_int_sum: Vec<i64>,
    average: Vec<Scalar>,
    sum: Vec<Scalar>,
    max: Vec<Scalar>,
    int_sum: Vec<i64>,
    tmp_num_cells: i64,
    num_cells: i64,
}

impl BlockStatistics {
    pub fn new() -> Self {
        BlockStatistics::default()
    }

    /// Subscribe a new average observable and return its slot id.
    pub fn subscribe_average(&mut self) -> usize {
        self.tmp_average.push(0.0);
        self.average.push(0.0);
        self.average.len() - 1
    }

    pub fn subscribe_sum(&mut self) -> usize {
        self.tmp_sum.push(0.0);
        self.sum.push(0.0);
        self.sum.len() - 1
    }

    pub fn subscribe_max(&mut self) -> usize {
        // Accumulation starts from negative infinity so negative observables
        // are handled correctly.
        self.tmp_max.push(Scalar::NEG_INFINITY);
        self.max.push(0.0);
        self.max.len() - 1
    }

    pub fn subscribe_int_sum(&mut self) -> usize {
        self.tmp_int_sum.push(0);
        self.int_sum.push(0);
        self.int_sum.len() - 1
    }

    pub fn gather_average(&mut self, id: usize, value: Scalar) {
        self.tmp_average[id] += value;
    }

    pub fn gather_sum(&mut self, id: usize, value: Scalar) {
        self.tmp_sum[id] += value;
    }

    pub fn gather_max(&mut self, id: usize, value: Scalar) {
        if value > self.tmp_max[id] {
            self.tmp_max[id] = value;
        }
    }

    pub fn gather_int_sum(&mut self, id: usize, value: i64) {
        self.tmp_int_sum[id] += value;
    }

    /// Count one cell as having contributed to the averages this step.
    pub fn increment_stats(&mut self) {
        self.tmp_num_cells += 1;
    }

    /// Finalise the step: divide averages, publish sums and maxima, reset the
    /// temporary accumulators.
    pub fn evaluate(&mut self) {
        let n = self.tmp_num_cells;
        for (out, tmp) in self.average.iter_mut().zip(self.tmp_average.iter_mut()) {
            *out = if n > 0 { *tmp / n as Scalar } else { 0.0 };
            *tmp = 0.0;
        }
        for (out, tmp) in self.sum.iter_mut().zip(self.tmp_sum.iter_mut()) {
            *out = *tmp;
            *tmp = 0.0;
        }
        for (out, tmp) in self.max.iter_mut().zip(self.tmp_max.iter_mut()) {
            *out = if tmp.is_finite() { *tmp } else { 0.0 };
            *tmp = Scalar::NEG_INFINITY;
        }
        for (out, tmp) in self.int_sum.iter_mut().zip(self.tmp_int_sum.iter_mut()) {
            *out = *tmp;
            *tmp = 0;
        }
        self.num_cells = n;
        self.tmp_num_cells = 0;
    }

    /// Publish explicit values, bypassing the accumulators. Used to seed the
    /// defaults at lattice construction (average rho = 1 avoids division by
    /// zero in constant-density models before the first step).
    pub fn evaluate_seeded(
        &mut self,
        average: &[Scalar],
        sum: &[Scalar],
        max: &[Scalar],
        int_sum: &[i64],
        num_cells: i64,
    ) {
        self.average.copy_from_slice(average);
        self.sum.copy_from_slice(sum);
        self.max.copy_from_slice(max);
        self.int_sum.copy_from_slice(int_sum);
        self.num_cells = num_cells;
        for v in self.tmp_average.iter_mut() {
            *v = 0.0;
        }
        for v in self.tmp_sum.iter_mut() {
            *v = 0.0;
        }
        for v in self.tmp_max.iter_mut() {
            *v = Scalar::NEG_INFINITY;
        }
        for v in self.tmp_int_sum.iter_mut() {
            *v = 0;
        }
        self.tmp_num_cells = 0;
    }

    pub fn get_average(&self, id: usize) -> Scalar {
        self.average[id]
    }

    pub fn get_sum(&self, id: usize) -> Scalar {
        self.sum[id]
    }

    pub fn get_max(&self, id: usize) -> Scalar {
        self.max[id]
    }

    pub fn get_int_sum(&self, id: usize) -> i64 {
        self.int_sum[id]
    }

    pub fn num_cells(&self) -> i64 {
        self.num_cells
    }
}

/// Standard per-cell contribution of a collision: average rho-bar, average
/// and maximum u-squared.
#[inline]
pub fn gather_statistics(statistics: &mut BlockStatistics, rho_bar: Scalar, u_sqr: Scalar) {
    statistics.gather_average(AVG_RHO_BAR, rho_bar);
    statistics.gather_average(AVG_U_SQR, u_sqr);
    statistics.gather_max(MAX_U_SQR, u_sqr);
    statistics.increment_stats();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_divide_by_cell_count() {
        let mut stats = BlockStatistics::new();
        let id = stats.subscribe_average();
        stats.gather_average(id, 1.0);
        stats.increment_stats();
        stats.gather_average(id, 3.0);
        stats.increment_stats();
        stats.evaluate();
        assert_eq!(stats.get_average(id), 2.0);
        assert_eq!(stats.num_cells(), 2);
    }

    #[test]
    fn max_resets_between_steps() {
        let mut stats = BlockStatistics::new();
        let id = stats.subscribe_max();
        stats.gather_max(id, 5.0);
        stats.evaluate();
        assert_eq!(stats.get_max(id), 5.0);
        stats.gather_max(id, 2.0);
        stats.evaluate();
        assert_eq!(stats.get_max(id), 2.0);
    }

    #[test]
    fn seeding_publishes_without_accumulation() {
        let mut stats = BlockStatistics::new();
        let a0 = stats.subscribe_average();
        let a1 = stats.subscribe_average();
        let m0 = stats.subscribe_max();
        stats.evaluate_seeded(&[0.0, 0.0], &[], &[0.0], &[], 1);
        assert_eq!(stats.get_average(a0), 0.0);
        assert_eq!(stats.get_average(a1), 0.0);
        assert_eq!(stats.get_max(m0), 0.0);
        assert_eq!(stats.num_cells(), 1);
    }
}

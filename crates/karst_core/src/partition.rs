//! # Partition Plan
//!
//! Splits the global map into contiguous row bands, one per worker.
//!
//! The plan is a pure function of `(global_height, worker_count, worker_index)`:
//! every worker computes its own band without coordination, and the bands
//! cover `[0, global_height)` exactly, in worker order, with no overlap.
//! Remainder rows go one each to the lowest-indexed workers, so any workers
//! with zero rows form a suffix of the worker list.

/// One worker's contiguous row band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Number of rows this worker owns. May be zero when there are more
    /// workers than rows.
    pub local_height: usize,
    /// Global index of the first row this worker owns.
    pub global_row_offset: usize,
}

impl Partition {
    /// Computes the band for one worker.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` is zero or `worker_index` is out of range.
    #[must_use]
    pub const fn for_worker(
        global_height: usize,
        worker_count: usize,
        worker_index: usize,
    ) -> Self {
        assert!(worker_count >= 1, "at least one worker required");
        assert!(worker_index < worker_count, "worker index out of range");

        let base = global_height / worker_count;
        let remainder = global_height % worker_count;
        let extra = if worker_index < remainder { 1 } else { 0 };
        let min = if worker_index < remainder { worker_index } else { remainder };

        Self {
            local_height: base + extra,
            global_row_offset: worker_index * base + min,
        }
    }

    /// Computes every worker's band, in worker order.
    #[must_use]
    pub fn split(global_height: usize, worker_count: usize) -> Vec<Self> {
        (0..worker_count)
            .map(|i| Self::for_worker(global_height, worker_count, i))
            .collect()
    }

    /// Returns true for a starved band (no rows assigned).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.local_height == 0
    }

    /// One past the last global row this worker owns.
    #[inline]
    #[must_use]
    pub const fn end_row(&self) -> usize {
        self.global_row_offset + self.local_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(global_height: usize, worker_count: usize) {
        let parts = Partition::split(global_height, worker_count);
        assert_eq!(parts.len(), worker_count);

        let mut next_row = 0;
        for part in &parts {
            assert_eq!(
                part.global_row_offset, next_row,
                "bands must be contiguous for H={global_height}, N={worker_count}"
            );
            next_row = part.end_row();
        }
        assert_eq!(next_row, global_height, "bands must cover the whole map");
    }

    #[test]
    fn covers_exactly_for_divisible_heights() {
        assert_covers(120, 4);
        assert_covers(120, 1);
        assert_covers(120, 120);
    }

    #[test]
    fn covers_exactly_with_remainder() {
        assert_covers(120, 7);
        assert_covers(121, 4);
        assert_covers(3, 2);
    }

    #[test]
    fn remainder_goes_to_lowest_workers() {
        let parts = Partition::split(10, 4);
        assert_eq!(
            parts.iter().map(|p| p.local_height).collect::<Vec<_>>(),
            vec![3, 3, 2, 2]
        );
    }

    #[test]
    fn empty_map_is_valid() {
        let parts = Partition::split(0, 3);
        assert!(parts.iter().all(Partition::is_empty));
        assert_covers(0, 3);
    }

    #[test]
    fn more_workers_than_rows_starves_a_suffix() {
        let parts = Partition::split(2, 5);
        assert_covers(2, 5);
        assert_eq!(
            parts.iter().map(|p| p.local_height).collect::<Vec<_>>(),
            vec![1, 1, 0, 0, 0]
        );
        // Starved bands are always a suffix.
        let first_empty = parts.iter().position(Partition::is_empty).unwrap();
        assert!(parts[first_empty..].iter().all(Partition::is_empty));
    }

    #[test]
    fn coverage_sweep() {
        for height in [0, 1, 2, 3, 17, 120, 121, 127] {
            for workers in 1..=9 {
                assert_covers(height, workers);
            }
        }
    }
}

//! # Counted Gather
//!
//! Every worker reports its segment count plus the flattened segment data;
//! the collector orders reports by worker index, validates each payload
//! against its declared count, and lays the data out at prefix-sum offsets.
//! The result reproduces per-worker segment lists element for element, in
//! worker order, which is what makes a distributed run byte-comparable to
//! a single-worker run.

use std::time::Duration;

use crossbeam_channel::Receiver;

use karst_contour::{reconstruct_segments, LineSegment, FLOATS_PER_SEGMENT};

use crate::error::{ClusterError, ClusterResult};

/// How long the collector waits for the next report. A healthy run
/// delivers all reports promptly; hitting this means a worker died.
const GATHER_TIMEOUT: Duration = Duration::from_secs(60);

/// One worker's contribution to the gather.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    /// Index of the reporting worker.
    pub worker_index: usize,
    /// Number of segments the worker claims to have produced.
    pub segment_count: usize,
    /// Flattened segment data, four floats per segment.
    pub data: Vec<f32>,
}

impl WorkerReport {
    /// A starved worker's report: zero segments, no data.
    #[must_use]
    pub fn empty(worker_index: usize) -> Self {
        Self { worker_index, segment_count: 0, data: Vec::new() }
    }
}

/// All workers' segment data, ordered by worker index.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheredSegments {
    /// Per-worker segment counts, by worker index.
    counts: Vec<usize>,
    /// Per-worker element (float) offsets into `flat`.
    offsets: Vec<usize>,
    /// Concatenated transport data in worker order.
    flat: Vec<f32>,
}

impl GatheredSegments {
    /// The gather of an empty map: every worker contributed nothing.
    #[must_use]
    pub(crate) fn empty(worker_count: usize) -> Self {
        Self {
            counts: vec![0; worker_count],
            offsets: vec![0; worker_count],
            flat: Vec::new(),
        }
    }

    /// Receives one report per worker and assembles the global collection.
    ///
    /// # Errors
    ///
    /// Fails on a missing, duplicate, or unknown report, and on any payload
    /// whose length disagrees with its declared count. All are protocol
    /// defects; nothing is truncated to fit.
    pub(crate) fn collect(
        rx: &Receiver<WorkerReport>,
        worker_count: usize,
    ) -> ClusterResult<Self> {
        let mut slots: Vec<Option<WorkerReport>> = vec![None; worker_count];

        for received in 0..worker_count {
            let report = rx.recv_timeout(GATHER_TIMEOUT).map_err(|_| {
                ClusterError::GatherIncomplete { received, expected: worker_count }
            })?;
            let worker = report.worker_index;
            if worker >= worker_count {
                return Err(ClusterError::UnknownWorker { worker });
            }
            if report.data.len() != report.segment_count * FLOATS_PER_SEGMENT {
                return Err(karst_contour::TransportError::CountMismatch {
                    declared: report.segment_count,
                    actual: report.data.len(),
                }
                .into());
            }
            if slots[worker].replace(report).is_some() {
                return Err(ClusterError::DuplicateReport { worker });
            }
        }

        let mut counts = Vec::with_capacity(worker_count);
        let mut offsets = Vec::with_capacity(worker_count);
        let mut flat = Vec::new();
        for slot in slots {
            // Every slot is filled: worker_count receives, no duplicates.
            let report = slot.ok_or(ClusterError::GatherIncomplete {
                received: worker_count,
                expected: worker_count,
            })?;
            counts.push(report.segment_count);
            offsets.push(flat.len());
            flat.extend_from_slice(&report.data);
        }

        Ok(Self { counts, offsets, flat })
    }

    /// Per-worker segment counts, by worker index.
    #[must_use]
    pub fn segment_counts(&self) -> &[usize] {
        &self.counts
    }

    /// Per-worker float offsets into the flat data.
    #[must_use]
    pub fn element_offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The concatenated transport data, worker order.
    #[must_use]
    pub fn flat_data(&self) -> &[f32] {
        &self.flat
    }

    /// Total segments across all workers.
    #[must_use]
    pub fn total_segments(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every segment, ordered by worker index then emission order.
    ///
    /// # Errors
    ///
    /// Propagates a transport mismatch; cannot occur for a value built by
    /// [`collect`](Self::collect), whose payloads are validated on receipt.
    pub fn all_segments(&self) -> Result<Vec<LineSegment>, karst_contour::TransportError> {
        reconstruct_segments(&self.flat, self.total_segments())
    }

    /// One worker's segment list, reconstructed from its offset slice.
    ///
    /// # Errors
    ///
    /// Propagates a transport mismatch for the worker's slice.
    pub fn worker_segments(
        &self,
        worker: usize,
    ) -> Result<Vec<LineSegment>, karst_contour::TransportError> {
        let start = self.offsets[worker];
        let end = start + self.counts[worker] * FLOATS_PER_SEGMENT;
        reconstruct_segments(&self.flat[start..end], self.counts[worker])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use karst_contour::{flatten_segments, Point2};

    fn segment(tag: f32) -> LineSegment {
        LineSegment::new(Point2::new(tag, 0.0), Point2::new(tag, 1.0))
    }

    fn report(worker: usize, tags: &[f32]) -> WorkerReport {
        let segments: Vec<LineSegment> = tags.iter().map(|&t| segment(t)).collect();
        WorkerReport {
            worker_index: worker,
            segment_count: segments.len(),
            data: flatten_segments(&segments),
        }
    }

    #[test]
    fn reports_are_ordered_by_worker_index() {
        let (tx, rx) = unbounded();
        // Arrival order deliberately scrambled.
        tx.send(report(2, &[30.0])).unwrap();
        tx.send(report(0, &[10.0, 11.0])).unwrap();
        tx.send(report(1, &[])).unwrap();

        let gathered = GatheredSegments::collect(&rx, 3).unwrap();
        assert_eq!(gathered.segment_counts(), &[2, 0, 1]);
        assert_eq!(gathered.element_offsets(), &[0, 8, 8]);
        assert_eq!(gathered.total_segments(), 3);

        let all = gathered.all_segments().unwrap();
        assert_eq!(all, vec![segment(10.0), segment(11.0), segment(30.0)]);
    }

    #[test]
    fn per_worker_reconstruction_round_trips() {
        let (tx, rx) = unbounded();
        tx.send(report(0, &[1.0])).unwrap();
        tx.send(report(1, &[2.0, 3.0])).unwrap();

        let gathered = GatheredSegments::collect(&rx, 2).unwrap();
        assert_eq!(gathered.worker_segments(0).unwrap(), vec![segment(1.0)]);
        assert_eq!(
            gathered.worker_segments(1).unwrap(),
            vec![segment(2.0), segment(3.0)]
        );
    }

    #[test]
    fn count_mismatch_is_fatal_at_the_collector() {
        let (tx, rx) = unbounded();
        let mut bad = report(0, &[1.0]);
        bad.segment_count = 2; // claims more than it sent

        tx.send(bad).unwrap();
        let err = GatheredSegments::collect(&rx, 1).unwrap_err();
        assert!(matches!(err, ClusterError::Transport(_)));
    }

    #[test]
    fn duplicate_report_is_fatal() {
        let (tx, rx) = unbounded();
        tx.send(report(0, &[1.0])).unwrap();
        tx.send(report(0, &[2.0])).unwrap();

        let err = GatheredSegments::collect(&rx, 2).unwrap_err();
        assert_eq!(err, ClusterError::DuplicateReport { worker: 0 });
    }

    #[test]
    fn unknown_worker_is_fatal() {
        let (tx, rx) = unbounded();
        tx.send(report(5, &[1.0])).unwrap();

        let err = GatheredSegments::collect(&rx, 2).unwrap_err();
        assert_eq!(err, ClusterError::UnknownWorker { worker: 5 });
    }

    #[test]
    fn missing_report_times_out_as_incomplete() {
        // Dropping the sender makes recv fail immediately rather than
        // waiting out the timeout.
        let (tx, rx) = unbounded();
        tx.send(report(0, &[1.0])).unwrap();
        drop(tx);

        let err = GatheredSegments::collect(&rx, 2).unwrap_err();
        assert_eq!(err, ClusterError::GatherIncomplete { received: 1, expected: 2 });
    }

    #[test]
    fn empty_gather_has_no_segments() {
        let gathered = GatheredSegments::empty(4);
        assert_eq!(gathered.total_segments(), 0);
        assert!(gathered.all_segments().unwrap().is_empty());
    }
}

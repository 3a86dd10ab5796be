//! # Segment Transport Format
//!
//! Workers ship their segment lists to the collector as flat `f32` data:
//! four floats per segment, `[start.x, start.y, end.x, end.y]`, paired
//! with a declared segment count. The layout matches [`LineSegment`]'s
//! `#[repr(C)]` memory layout exactly, so flattening is a slice cast.
//!
//! A count that disagrees with the transmitted element count is a protocol
//! defect and is surfaced, never truncated to fit.

use thiserror::Error;

use crate::geom::LineSegment;

/// Floats per transported segment.
pub const FLOATS_PER_SEGMENT: usize = 4;

/// Errors in the flat-float segment encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Declared segment count disagrees with the transmitted data length.
    #[error("declared {declared} segments but received {actual} floats")]
    CountMismatch {
        /// Segment count the sender reported.
        declared: usize,
        /// Number of floats actually received.
        actual: usize,
    },
}

/// Flattens a segment list into transport order.
#[must_use]
pub fn flatten_segments(segments: &[LineSegment]) -> Vec<f32> {
    bytemuck::cast_slice(segments).to_vec()
}

/// Rebuilds a segment list from flat transport data.
///
/// # Errors
///
/// Returns [`TransportError::CountMismatch`] when `data` does not hold
/// exactly `declared * 4` floats.
pub fn reconstruct_segments(
    data: &[f32],
    declared: usize,
) -> Result<Vec<LineSegment>, TransportError> {
    if data.len() != declared * FLOATS_PER_SEGMENT {
        return Err(TransportError::CountMismatch { declared, actual: data.len() });
    }
    Ok(bytemuck::cast_slice(data).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point2;

    fn sample_segments() -> Vec<LineSegment> {
        vec![
            LineSegment::new(Point2::new(0.0, 1.0), Point2::new(2.0, 3.0)),
            LineSegment::new(Point2::new(4.0, 5.0), Point2::new(6.0, 7.0)),
        ]
    }

    #[test]
    fn flatten_preserves_transport_order() {
        let flat = flatten_segments(&sample_segments());
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn round_trip_is_lossless() {
        let segments = sample_segments();
        let flat = flatten_segments(&segments);
        let back = reconstruct_segments(&flat, segments.len()).unwrap();
        assert_eq!(back, segments);
    }

    #[test]
    fn empty_list_round_trips() {
        let flat = flatten_segments(&[]);
        assert!(flat.is_empty());
        assert!(reconstruct_segments(&flat, 0).unwrap().is_empty());
    }

    #[test]
    fn count_mismatch_is_fatal() {
        let flat = flatten_segments(&sample_segments());
        assert_eq!(
            reconstruct_segments(&flat, 3),
            Err(TransportError::CountMismatch { declared: 3, actual: 8 })
        );
        assert!(reconstruct_segments(&flat[..7], 2).is_err());
    }
}

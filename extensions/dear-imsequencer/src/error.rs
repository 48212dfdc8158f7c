//! Error handling for the sequencer and curve editor widgets
//!
//! Rendering itself never fails: Dear ImGui swallows out-of-range drawing.
//! Errors only surface from the checked helpers that take indices coming from
//! user code (selection setters, span setters, lookups of a stale selected
//! entry).

use thiserror::Error;

use tracing::{debug, warn};

/// Result type for sequencer and curve editor operations
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Errors reported by the checked widget helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// An item index does not exist in the sequence
    #[error("Item index {index} out of range (sequence has {len} items)")]
    ItemOutOfRange {
        /// The requested index
        index: usize,
        /// Number of items in the sequence
        len: usize,
    },

    /// A curve index does not exist in the curve delegate
    #[error("Curve index {index} out of range (delegate has {len} curves)")]
    CurveOutOfRange {
        /// The requested curve index
        index: usize,
        /// Number of curves exposed by the delegate
        len: usize,
    },

    /// A point index does not exist on the given curve
    #[error("Point {point} out of range on curve {curve} ({len} points)")]
    PointOutOfRange {
        /// Curve the point was looked up on
        curve: usize,
        /// The requested point index
        point: usize,
        /// Number of points on the curve
        len: usize,
    },

    /// A frame span whose start lies after its end
    #[error("Invalid frame span: start {start} is after end {end}")]
    InvalidSpan {
        /// First frame of the span
        start: i32,
        /// Last frame of the span
        end: i32,
    },
}

impl SequencerError {
    /// Create an item-out-of-range error
    pub fn item_out_of_range(index: usize, len: usize) -> Self {
        debug!("Sequencer item {} out of range ({} items)", index, len);
        Self::ItemOutOfRange { index, len }
    }

    /// Create a curve-out-of-range error
    pub fn curve_out_of_range(index: usize, len: usize) -> Self {
        debug!("Curve {} out of range ({} curves)", index, len);
        Self::CurveOutOfRange { index, len }
    }

    /// Create a point-out-of-range error
    pub fn point_out_of_range(curve: usize, point: usize, len: usize) -> Self {
        debug!("Point {} out of range on curve {} ({} points)", point, curve, len);
        Self::PointOutOfRange { curve, point, len }
    }

    /// Create an invalid span error
    pub fn invalid_span(start: i32, end: i32) -> Self {
        warn!("Invalid frame span {}..{}", start, end);
        Self::InvalidSpan { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SequencerError::item_out_of_range(7, 5);
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("5 items"));

        let err = SequencerError::invalid_span(30, 10);
        assert_eq!(
            err.to_string(),
            "Invalid frame span: start 30 is after end 10"
        );
    }

    #[test]
    fn test_point_error_fields() {
        let err = SequencerError::point_out_of_range(2, 9, 6);
        assert_eq!(
            err,
            SequencerError::PointOutOfRange {
                curve: 2,
                point: 9,
                len: 6
            }
        );
    }
}

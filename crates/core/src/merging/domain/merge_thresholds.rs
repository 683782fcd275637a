use crate::shared::constants::{
    DEFAULT_DISTANCE_THRESHOLD, DEFAULT_ENCODING_THRESHOLD, DEFAULT_INTERSECT_THRESHOLD,
};

/// Saturation points of the three merge signals.
///
/// Each signal scores 1.0 on the "same face" side of its threshold and
/// falls off beyond it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeThresholds {
    /// Normalized center distance.
    pub distance: f64,
    /// Euclidean distance between encodings.
    pub encoding: f64,
    /// Insideness (fraction of the smaller box covered by the overlap).
    pub intersect: f64,
}

impl MergeThresholds {
    pub fn new(distance: f64, encoding: f64, intersect: f64) -> Self {
        Self {
            distance,
            encoding,
            intersect,
        }
    }
}

impl Default for MergeThresholds {
    fn default() -> Self {
        Self::new(
            DEFAULT_DISTANCE_THRESHOLD,
            DEFAULT_ENCODING_THRESHOLD,
            DEFAULT_INTERSECT_THRESHOLD,
        )
    }
}

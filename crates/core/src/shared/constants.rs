/// Normalized center distance below which two detections count as co-located.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.5;

/// Encoding distance below which two detections count as the same identity.
pub const DEFAULT_ENCODING_THRESHOLD: f64 = 0.4;

/// Insideness above which one detection counts as covering the other.
pub const DEFAULT_INTERSECT_THRESHOLD: f64 = 0.8;

/// Pairs where the smaller overlap ratio falls below this are never merged,
/// so a near-whole-photo detection cannot swallow a small face.
pub const MIN_OVERLAP_RATIO: f64 = 0.04;

pub const STRONG_INTERSECT_SCORE: f64 = 0.98;
pub const STRONG_ENCODING_SCORE: f64 = 0.95;
pub const STRONG_DISTANCE_SCORE: f64 = 0.98;

/// Combined score above which moderate evidence on all signals merges a pair.
pub const JOINT_SCORE_THRESHOLD: f64 = 2.0;

pub const ENCODING_FALLOFF_EXPONENT: i32 = 5;
pub const INTERSECT_FALLOFF_EXPONENT: f64 = 1.5;
pub const DISTANCE_FALLOFF_EXPONENT: i32 = 5;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

use crate::merging::domain::face_rect::FaceRect;
use crate::merging::domain::merge_error::MergeError;
use crate::merging::domain::merge_thresholds::MergeThresholds;
use crate::shared::constants::{
    DISTANCE_FALLOFF_EXPONENT, ENCODING_FALLOFF_EXPONENT, INTERSECT_FALLOFF_EXPONENT,
    JOINT_SCORE_THRESHOLD, MIN_OVERLAP_RATIO, STRONG_DISTANCE_SCORE, STRONG_ENCODING_SCORE,
    STRONG_INTERSECT_SCORE,
};

/// Per-signal evidence that two detections show the same face.
///
/// Each score is 1.0 on the "same face" side of its threshold and falls
/// off beyond it. Large deviations drive a score negative, which counts
/// against the pair in the joint rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeScores {
    pub encoding: f64,
    pub intersect: f64,
    pub distance: f64,
}

impl MergeScores {
    pub fn total(&self) -> f64 {
        self.encoding + self.intersect + self.distance
    }

    /// Any single strong signal merges; otherwise all three must add up.
    pub fn is_mergeable(&self) -> bool {
        self.intersect > STRONG_INTERSECT_SCORE
            || self.encoding > STRONG_ENCODING_SCORE
            || self.distance > STRONG_DISTANCE_SCORE
            || self.total() > JOINT_SCORE_THRESHOLD
    }
}

/// Scores a candidate pair.
///
/// Returns `Ok(None)` when the pair is rejected outright because one box
/// covers less than [`MIN_OVERLAP_RATIO`] of the other, which keeps a
/// near-whole-photo detection from absorbing a small face.
pub fn score(
    a: &FaceRect,
    b: &FaceRect,
    thresholds: &MergeThresholds,
) -> Result<Option<MergeScores>, MergeError> {
    let enc_dist = a.encoding_distance(b)?;

    let ra = a.rectangle();
    let rb = b.rectangle();
    let intersect_area = ra.intersect(rb);
    let this_inside_other = overlap_ratio(intersect_area, ra.area());
    let other_inside_this = overlap_ratio(intersect_area, rb.area());
    let insideness = this_inside_other.max(other_inside_this);
    let too_big_insideness = this_inside_other.min(other_inside_this);

    if too_big_insideness < MIN_OVERLAP_RATIO {
        return Ok(None);
    }

    let (_, norm_dist) = ra.distance(rb);

    Ok(Some(MergeScores {
        encoding: below_threshold_score(enc_dist, thresholds.encoding, ENCODING_FALLOFF_EXPONENT),
        intersect: intersect_score(insideness, thresholds.intersect),
        distance: below_threshold_score(norm_dist, thresholds.distance, DISTANCE_FALLOFF_EXPONENT),
    }))
}

/// Decides whether `a` and `b` are the same physical face.
///
/// Both records must carry encodings of equal length.
pub fn should_merge(
    a: &FaceRect,
    b: &FaceRect,
    thresholds: &MergeThresholds,
) -> Result<bool, MergeError> {
    let verdict = match score(a, b, thresholds)? {
        Some(scores) => {
            log::trace!(
                "scores enc={:.3} intersect={:.3} dist={:.3} for {} / {}",
                scores.encoding,
                scores.intersect,
                scores.distance,
                a.rectangle(),
                b.rectangle()
            );
            scores.is_mergeable()
        }
        None => false,
    };
    Ok(verdict)
}

fn overlap_ratio(intersect_area: i64, area: i64) -> f64 {
    if area <= 0 {
        return 0.0;
    }
    intersect_area as f64 / area as f64
}

/// 1.0 while `value < threshold`, steep polynomial fall-off past it.
fn below_threshold_score(value: f64, threshold: f64, exponent: i32) -> f64 {
    if value < threshold {
        1.0
    } else {
        (1.0 - (value - threshold).abs()).powi(exponent)
    }
}

/// 1.0 while `insideness > threshold`, gentler fall-off below it.
///
/// Insideness lies in `[0, 1]`, so the base stays positive for any
/// threshold in that range.
fn intersect_score(insideness: f64, threshold: f64) -> f64 {
    if insideness > threshold {
        1.0
    } else {
        (1.0 - (insideness - threshold).abs()).powf(INTERSECT_FALLOFF_EXPONENT)
    }
}

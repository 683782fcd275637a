use std::fmt;
use std::hash::{Hash, Hasher};

use ndarray::Array3;
use sha2::{Digest, Sha256};

use crate::merging::domain::merge_error::MergeError;
use crate::shared::rectangle::Rectangle;
use crate::shared::source_image::SourceImage;

const ENCODING_PREVIEW_LEN: usize = 5;

/// Pixel bounds of a face's square crop within the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareBounds {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl SquareBounds {
    pub fn as_rectangle(&self) -> Rectangle {
        Rectangle::new(self.top, self.bottom, self.left, self.right)
    }

    pub fn size(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One face detection: where it is, who it might be, and how confident
/// the detector pass that found it was.
///
/// Optional fields start unset: `encoding` when the encoder did not run,
/// `square_bounds`/`square_crop` until [`FaceRect::add_square_crop`].
///
/// Equality and `Hash` consider the rectangle only, so two records that
/// compare equal always hash equally. Label and detection level are not
/// hashed; the content hash over label, rectangle text and level is
/// [`FaceRect::identity_digest`].
#[derive(Clone, Debug)]
pub struct FaceRect {
    rectangle: Rectangle,
    encoding: Option<Vec<f64>>,
    label: Option<String>,
    detection_level: u32,
    rect_crop: Option<Array3<u8>>,
    square_crop: Option<Array3<u8>>,
    square_bounds: Option<SquareBounds>,
}

impl FaceRect {
    pub fn new(rectangle: Rectangle, detection_level: u32) -> Self {
        Self {
            rectangle,
            encoding: None,
            label: None,
            detection_level,
            rect_crop: None,
            square_crop: None,
            square_bounds: None,
        }
    }

    pub fn with_encoding(mut self, encoding: Vec<f64>) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rect_crop(mut self, crop: Array3<u8>) -> Self {
        self.rect_crop = Some(crop);
        self
    }

    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    pub fn encoding(&self) -> Option<&[f64]> {
        self.encoding.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn detection_level(&self) -> u32 {
        self.detection_level
    }

    pub fn rect_crop(&self) -> Option<&Array3<u8>> {
        self.rect_crop.as_ref()
    }

    pub fn square_crop(&self) -> Option<&Array3<u8>> {
        self.square_crop.as_ref()
    }

    pub fn square_bounds(&self) -> Option<SquareBounds> {
        self.square_bounds
    }

    pub(crate) fn set_square(&mut self, bounds: SquareBounds, crop: Array3<u8>) {
        self.square_bounds = Some(bounds);
        self.square_crop = Some(crop);
    }

    /// Euclidean distance between the two encodings.
    pub fn encoding_distance(&self, other: &FaceRect) -> Result<f64, MergeError> {
        let (a, b) = self.comparable_encodings(other)?;
        Ok(a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt())
    }

    fn comparable_encodings<'a>(
        &'a self,
        other: &'a FaceRect,
    ) -> Result<(&'a [f64], &'a [f64]), MergeError> {
        let invalid = |reason: String| MergeError::InvalidComparison {
            left: self.to_string(),
            right: other.to_string(),
            reason,
        };
        match (self.encoding(), other.encoding()) {
            (Some(a), Some(b)) if a.len() == b.len() => Ok((a, b)),
            (Some(a), Some(b)) => Err(invalid(format!(
                "encoding lengths differ ({} vs {})",
                a.len(),
                b.len()
            ))),
            _ => Err(invalid("both records must carry an encoding".to_string())),
        }
    }

    /// Stable hex digest of label, rectangle text and detection level.
    ///
    /// Changes whenever any of those changes, so records must not be keyed
    /// by it across a fusion.
    pub fn identity_digest(&self) -> String {
        let mut hasher = Sha256::new();
        if let Some(label) = &self.label {
            hasher.update(label.as_bytes());
        }
        hasher.update(self.rectangle.to_string().as_bytes());
        hasher.update(self.detection_level.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Re-cuts `rect_crop` from the pristine image, e.g. after records were
    /// stored without pixel payloads.
    pub fn reconstruct_rect_crop(&mut self, source: &SourceImage) {
        self.rect_crop = Some(source.crop(&self.rectangle));
    }

    /// Re-cuts `square_crop` from previously computed bounds. No-op when the
    /// square has never been derived.
    pub fn reconstruct_square_crop(&mut self, source: &SourceImage) {
        if let Some(bounds) = self.square_bounds {
            self.square_crop = Some(source.crop(&bounds.as_rectangle()));
        }
    }
}

impl PartialEq for FaceRect {
    fn eq(&self, other: &Self) -> bool {
        self.rectangle == other.rectangle
    }
}

impl Eq for FaceRect {}

impl Hash for FaceRect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rectangle.hash(state);
    }
}

fn shape_fragment(crop: Option<&Array3<u8>>) -> String {
    crop.map_or_else(|| "N/A".to_string(), |c| format!("{:?}", c.shape()))
}

impl fmt::Display for FaceRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match &self.encoding {
            Some(enc) => {
                let n = enc.len().min(ENCODING_PREVIEW_LEN);
                format!("{:?}...", &enc[..n])
            }
            None => "<no encoding>".to_string(),
        };
        write!(
            f,
            "rectangle = {}, label = {}, encoding = {}, img_size = {}, sq_img_size = {}",
            self.rectangle,
            self.label.as_deref().unwrap_or("None"),
            encoding,
            shape_fragment(self.rect_crop.as_ref()),
            shape_fragment(self.square_crop.as_ref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn face(top: i32, bottom: i32, left: i32, right: i32) -> FaceRect {
        FaceRect::new(Rectangle::new(top, bottom, left, right), 0)
    }

    // ── Identity ─────────────────────────────────────────────────────

    #[test]
    fn test_equality_uses_rectangle_only() {
        let a = face(0, 10, 0, 10).with_label("alice");
        let b = FaceRect::new(Rectangle::new(0, 10, 0, 10), 3).with_label("bob");
        assert_eq!(a, b);
        assert_ne!(a, face(0, 10, 0, 11));
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let mut set = HashSet::new();
        set.insert(face(0, 10, 0, 10).with_label("alice"));
        set.insert(face(0, 10, 0, 10).with_label("bob"));
        set.insert(face(5, 15, 5, 15));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_hash_ignores_label_but_digest_does_not() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(f: &FaceRect) -> u64 {
            let mut hasher = DefaultHasher::new();
            f.hash(&mut hasher);
            hasher.finish()
        }

        let alice = face(0, 10, 0, 10).with_label("alice");
        let bob = FaceRect::new(Rectangle::new(0, 10, 0, 10), 2).with_label("bob");
        assert_eq!(hash_of(&alice), hash_of(&bob));
        assert_ne!(alice.identity_digest(), bob.identity_digest());
    }

    #[test]
    fn test_identity_digest_is_stable() {
        let a = face(0, 10, 0, 10).with_label("alice");
        let b = face(0, 10, 0, 10).with_label("alice");
        assert_eq!(a.identity_digest(), b.identity_digest());
        assert_eq!(a.identity_digest().len(), 64);
    }

    #[test]
    fn test_identity_digest_covers_label_and_level() {
        let base = face(0, 10, 0, 10);
        let labelled = face(0, 10, 0, 10).with_label("alice");
        let other_level = FaceRect::new(Rectangle::new(0, 10, 0, 10), 2);
        assert_ne!(base.identity_digest(), labelled.identity_digest());
        assert_ne!(base.identity_digest(), other_level.identity_digest());
    }

    // ── Encoding distance ────────────────────────────────────────────

    #[test]
    fn test_encoding_distance_euclidean() {
        let a = face(0, 10, 0, 10).with_encoding(vec![0.0, 0.0]);
        let b = face(0, 10, 0, 10).with_encoding(vec![3.0, 4.0]);
        assert_relative_eq!(a.encoding_distance(&b).unwrap(), 5.0);
    }

    #[test]
    fn test_encoding_distance_requires_both_encodings() {
        let a = face(0, 10, 0, 10).with_encoding(vec![0.0]);
        let b = face(0, 10, 0, 10);
        let err = a.encoding_distance(&b).unwrap_err();
        assert!(matches!(err, MergeError::InvalidComparison { .. }));
    }

    #[test]
    fn test_encoding_distance_requires_equal_lengths() {
        let a = face(0, 10, 0, 10).with_encoding(vec![0.0, 1.0]);
        let b = face(0, 10, 0, 10).with_encoding(vec![0.0]);
        match a.encoding_distance(&b).unwrap_err() {
            MergeError::InvalidComparison { reason, .. } => {
                assert!(reason.contains("2 vs 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Display ──────────────────────────────────────────────────────

    #[test]
    fn test_display_without_payloads() {
        let text = face(0, 10, 0, 10).to_string();
        assert!(text.contains("label = None"));
        assert!(text.contains("<no encoding>"));
        assert!(text.contains("img_size = N/A"));
    }

    #[test]
    fn test_display_truncates_encoding() {
        let text = face(0, 10, 0, 10)
            .with_encoding(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
            .to_string();
        assert!(text.contains("[1.0, 2.0, 3.0, 4.0, 5.0]..."));
        assert!(!text.contains("6.0"));
    }

    // ── Reconstruction ───────────────────────────────────────────────

    #[test]
    fn test_reconstruct_rect_crop() {
        let source = SourceImage::new(vec![7u8; 20 * 20 * 3], 20, 20, 3);
        let mut f = face(2, 8, 4, 14);
        f.reconstruct_rect_crop(&source);
        assert_eq!(f.rect_crop().unwrap().shape(), &[6, 10, 3]);
    }

    #[test]
    fn test_reconstruct_square_crop_noop_without_bounds() {
        let source = SourceImage::new(vec![7u8; 20 * 20 * 3], 20, 20, 3);
        let mut f = face(2, 8, 4, 14);
        f.reconstruct_square_crop(&source);
        assert!(f.square_crop().is_none());
    }

    #[test]
    fn test_reconstruct_square_crop_from_bounds() {
        let source = SourceImage::new(vec![7u8; 20 * 20 * 3], 20, 20, 3);
        let mut f = face(2, 8, 4, 14);
        let bounds = SquareBounds {
            top: 0,
            bottom: 10,
            left: 4,
            right: 14,
        };
        f.set_square(bounds, Array3::zeros((1, 1, 3)));
        f.reconstruct_square_crop(&source);
        assert_eq!(f.square_crop().unwrap().shape(), &[10, 10, 3]);
        assert_eq!(f.square_crop().unwrap()[[0, 0, 0]], 7);
    }
}

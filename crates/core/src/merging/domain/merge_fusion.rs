use crate::merging::domain::face_rect::FaceRect;
use crate::shared::source_image::SourceImage;

/// Fuses two detections of the same face into one new record.
///
/// Callers are expected to have checked [`should_merge`] first; the pair
/// is not re-scored here. Neither input is modified.
///
/// - encoding: from the lower (more confident) detection level; on a tie,
///   from `a` only if its box is strictly larger
/// - label: `a`'s unless it is unset, so the result depends on argument order
/// - detection level: the minimum
/// - rectangle: the bounding union, with `rect_crop` re-cut from `source`
///
/// Square-crop fields are left unset.
///
/// [`should_merge`]: crate::merging::domain::merge_decision::should_merge
pub fn merge(a: &FaceRect, b: &FaceRect, source: &SourceImage) -> FaceRect {
    let rectangle = a.rectangle().union(b.rectangle());
    let detection_level = a.detection_level().min(b.detection_level());

    let mut merged = FaceRect::new(rectangle, detection_level)
        .with_rect_crop(source.crop(&rectangle));

    if let Some(encoding) = preferred_encoding(a, b) {
        merged = merged.with_encoding(encoding.to_vec());
    }
    if let Some(label) = merged_label(a, b) {
        merged = merged.with_label(label);
    }

    log::debug!(
        "merged {} and {} into {}",
        a.rectangle(),
        b.rectangle(),
        rectangle
    );
    merged
}

fn preferred_encoding<'a>(a: &'a FaceRect, b: &'a FaceRect) -> Option<&'a [f64]> {
    if a.detection_level() < b.detection_level() {
        a.encoding()
    } else if b.detection_level() < a.detection_level() {
        b.encoding()
    } else if a.rectangle().area() > b.rectangle().area() {
        a.encoding()
    } else {
        b.encoding()
    }
}

fn merged_label<'a>(a: &'a FaceRect, b: &'a FaceRect) -> Option<&'a str> {
    match (a.label(), b.label()) {
        (None, other) => other,
        (own, _) => own,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::rectangle::Rectangle;

    fn source() -> SourceImage {
        SourceImage::new(vec![90u8; 200 * 200 * 3], 200, 200, 3)
    }

    fn face(top: i32, bottom: i32, left: i32, right: i32, level: u32) -> FaceRect {
        FaceRect::new(Rectangle::new(top, bottom, left, right), level)
    }

    #[test]
    fn test_rectangle_is_bounding_union() {
        let a = face(0, 100, 0, 100, 0);
        let b = face(10, 110, 10, 120, 0);
        let merged = merge(&a, &b, &source());
        assert_eq!(*merged.rectangle(), Rectangle::new(0, 110, 0, 120));
        assert!(merged.rectangle().contains(a.rectangle()));
        assert!(merged.rectangle().contains(b.rectangle()));
    }

    #[test]
    fn test_detection_level_is_minimum() {
        let a = face(0, 100, 0, 100, 3);
        let b = face(10, 110, 10, 110, 1);
        assert_eq!(merge(&a, &b, &source()).detection_level(), 1);
        assert_eq!(merge(&b, &a, &source()).detection_level(), 1);
    }

    #[test]
    fn test_encoding_from_more_confident_level() {
        let a = face(0, 100, 0, 100, 2).with_encoding(vec![2.0]);
        let b = face(10, 60, 10, 60, 1).with_encoding(vec![1.0]);
        assert_eq!(merge(&a, &b, &source()).encoding(), Some(&[1.0][..]));
        assert_eq!(merge(&b, &a, &source()).encoding(), Some(&[1.0][..]));
    }

    #[test]
    fn test_encoding_tie_prefers_larger_area() {
        let big = face(0, 100, 0, 100, 1).with_encoding(vec![9.0]);
        let small = face(10, 60, 10, 60, 1).with_encoding(vec![4.0]);
        assert_eq!(merge(&big, &small, &source()).encoding(), Some(&[9.0][..]));
        assert_eq!(merge(&small, &big, &source()).encoding(), Some(&[9.0][..]));
    }

    #[test]
    fn test_encoding_tie_equal_area_takes_second() {
        let a = face(0, 50, 0, 50, 1).with_encoding(vec![1.0]);
        let b = face(10, 60, 10, 60, 1).with_encoding(vec![2.0]);
        assert_eq!(merge(&a, &b, &source()).encoding(), Some(&[2.0][..]));
    }

    #[test]
    fn test_label_kept_when_equal() {
        let a = face(0, 50, 0, 50, 0).with_label("alice");
        let b = face(5, 55, 5, 55, 0).with_label("alice");
        assert_eq!(merge(&a, &b, &source()).label(), Some("alice"));
    }

    #[test]
    fn test_label_filled_from_other_when_unset() {
        let a = face(0, 50, 0, 50, 0);
        let b = face(5, 55, 5, 55, 0).with_label("bob");
        assert_eq!(merge(&a, &b, &source()).label(), Some("bob"));
        assert_eq!(merge(&b, &a, &source()).label(), Some("bob"));
    }

    #[test]
    fn test_label_conflict_depends_on_order() {
        let a = face(0, 50, 0, 50, 0).with_label("alice");
        let b = face(5, 55, 5, 55, 0).with_label("bob");
        assert_eq!(merge(&a, &b, &source()).label(), Some("alice"));
        assert_eq!(merge(&b, &a, &source()).label(), Some("bob"));
    }

    #[test]
    fn test_label_unset_on_both() {
        let a = face(0, 50, 0, 50, 0);
        let b = face(5, 55, 5, 55, 0);
        assert_eq!(merge(&a, &b, &source()).label(), None);
    }

    #[test]
    fn test_rect_crop_recut_from_source() {
        let a = face(0, 100, 0, 100, 0);
        let b = face(10, 110, 10, 120, 0);
        let merged = merge(&a, &b, &source());
        let crop = merged.rect_crop().unwrap();
        assert_eq!(crop.shape(), &[110, 120, 3]);
        assert!(crop.iter().all(|&px| px == 90));
    }

    #[test]
    fn test_square_fields_unset() {
        let a = face(0, 100, 0, 100, 0);
        let b = face(10, 110, 10, 120, 0);
        let merged = merge(&a, &b, &source());
        assert!(merged.square_bounds().is_none());
        assert!(merged.square_crop().is_none());
    }

    #[test]
    fn test_inputs_unchanged() {
        let a = face(0, 100, 0, 100, 2).with_label("alice").with_encoding(vec![1.0]);
        let b = face(10, 110, 10, 120, 1).with_encoding(vec![2.0]);
        let _ = merge(&a, &b, &source());
        assert_eq!(*a.rectangle(), Rectangle::new(0, 100, 0, 100));
        assert_eq!(a.detection_level(), 2);
        assert!(a.rect_crop().is_none());
        assert!(b.label().is_none());
    }
}

use crate::merging::domain::face_rect::{FaceRect, SquareBounds};
use crate::merging::domain::merge_error::MergeError;
use crate::shared::rectangle::Rectangle;
use crate::shared::source_image::SourceImage;

const REQUIRED_CHANNELS: u8 = 3;

impl FaceRect {
    /// Derives a square crop centered on the face and stores it with its
    /// bounds.
    ///
    /// The side is the longer rectangle edge, capped by the image size.
    /// Near an edge the square slides back inside the image rather than
    /// shrinking.
    pub fn add_square_crop(&mut self, source: &SourceImage) -> Result<(), MergeError> {
        if source.channels() != REQUIRED_CHANNELS {
            return Err(MergeError::InvariantViolation(format!(
                "source image has {} channels, expected {REQUIRED_CHANNELS}",
                source.channels()
            )));
        }

        let bounds = square_bounds(self.rectangle(), source.width(), source.height())?;
        let crop = source.crop(&bounds.as_rectangle());

        let shape = crop.shape();
        if shape[0] != shape[1] || shape[0] == 0 || shape[2] != REQUIRED_CHANNELS as usize {
            return Err(MergeError::InvariantViolation(format!(
                "square crop has shape {shape:?}"
            )));
        }

        self.set_square(bounds, crop);
        Ok(())
    }

    /// Owned form of [`FaceRect::add_square_crop`].
    pub fn with_square_crop(mut self, source: &SourceImage) -> Result<Self, MergeError> {
        self.add_square_crop(source)?;
        Ok(self)
    }
}

/// Square of side `min(max(w, h), image_w, image_h)` centered on `rect`
/// and slid inside `[0, image_w] x [0, image_h]`.
pub fn square_bounds(
    rect: &Rectangle,
    image_width: u32,
    image_height: u32,
) -> Result<SquareBounds, MergeError> {
    let size = rect
        .width()
        .max(rect.height())
        .min(i64::from(image_width))
        .min(i64::from(image_height));
    if size <= 0 {
        return Err(MergeError::InvariantViolation(format!(
            "square crop for {rect} in {image_width}x{image_height} image is empty"
        )));
    }

    let (cx, cy) = rect.center();
    let half = size / 2;
    let left = slide_inside(i64::from(cx) - half, size, i64::from(image_width));
    let top = slide_inside(i64::from(cy) - half, size, i64::from(image_height));

    Ok(SquareBounds {
        top: coordinate(top)?,
        bottom: coordinate(top + size)?,
        left: coordinate(left)?,
        right: coordinate(left + size)?,
    })
}

/// Start of a `size`-long span beginning at `start`, shifted into `[0, limit]`.
fn slide_inside(start: i64, size: i64, limit: i64) -> i64 {
    if start < 0 {
        0
    } else if start + size > limit {
        limit - size
    } else {
        start
    }
}

fn coordinate(value: i64) -> Result<i32, MergeError> {
    i32::try_from(value).map_err(|_| {
        MergeError::InvariantViolation(format!("square edge {value} is outside pixel range"))
    })
}

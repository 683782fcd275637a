use ndarray::{s, Array3, ArrayView3};

/// Clockwise rotation that makes a crop display upright.
///
/// Only the pure rotations of the EXIF orientation tag are honored;
/// mirrored variants and missing metadata fall back to `Normal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Orientation {
    /// Maps an EXIF `Orientation` tag value.
    pub fn from_exif(tag: u16) -> Self {
        match tag {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// Rotates a `(height, width, channels)` crop into display orientation.
    pub fn apply(&self, crop: ArrayView3<'_, u8>) -> Array3<u8> {
        let rotated = match self {
            Orientation::Normal => crop,
            Orientation::Rotate90 => crop.permuted_axes([1, 0, 2]).slice_move(s![.., ..;-1, ..]),
            Orientation::Rotate180 => crop.slice_move(s![..;-1, ..;-1, ..]),
            Orientation::Rotate270 => crop.permuted_axes([1, 0, 2]).slice_move(s![..;-1, .., ..]),
        };
        rotated.as_standard_layout().into_owned()
    }
}

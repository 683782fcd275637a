use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};
use thiserror::Error;

use crate::shared::orientation::Orientation;
use crate::shared::source_image::SourceImage;

#[derive(Error, Debug)]
pub enum ImageReadError {
    #[error("failed to open image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Loads a photo into a [`SourceImage`] with the `image` crate.
///
/// Pixels are converted to RGB8 and left in stored orientation; the EXIF
/// orientation is attached so crops are rotated when they are cut.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }

    pub fn open(&self, path: &Path) -> Result<SourceImage, ImageReadError> {
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()?;
        let orientation = decoder
            .orientation()
            .map(from_image_orientation)
            .unwrap_or_default();

        let rgb = DynamicImage::from_decoder(decoder)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!(
            "loaded {} ({width}x{height}, {orientation:?})",
            path.display()
        );

        Ok(SourceImage::new(rgb.into_raw(), width, height, 3)
            .with_orientation(orientation)
            .with_path(path))
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Mirrored EXIF variants are not corrected.
fn from_image_orientation(orientation: image::metadata::Orientation) -> Orientation {
    Orientation::from_exif(u16::from(orientation.to_exif()))
}

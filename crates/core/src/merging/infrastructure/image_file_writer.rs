use std::path::Path;

use ndarray::ArrayView3;

use crate::merging::domain::image_writer::ImageWriter;

/// Writes face crops to image files using the `image` crate.
///
/// The format follows the file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        crop: ArrayView3<'_, u8>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (height, width, channels) = crop.dim();
        if channels != 3 {
            return Err(format!("expected an RGB crop, got {channels} channels").into());
        }

        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = crop.as_standard_layout().iter().copied().collect();
        let img = image::RgbImage::from_raw(width as u32, height as u32, data)
            .ok_or("Failed to create image from crop data")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn make_crop(width: usize, height: usize, rgb: [u8; 3]) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c])
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faces").join("face_0.png");
        let crop = make_crop(40, 30, [50, 100, 200]);
        ImageFileWriter::new().write(&path, crop.view()).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        let crop = make_crop(25, 25, [50, 100, 200]);
        ImageFileWriter::new().write(&path, crop.view()).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.width(), 25);
        assert_eq!(img.height(), 25);
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_non_contiguous_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transposed.png");
        let crop = make_crop(20, 10, [1, 2, 3]);
        let transposed = crop.view().permuted_axes([1, 0, 2]);
        ImageFileWriter::new().write(&path, transposed).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 20);
    }

    #[test]
    fn test_write_rejects_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let crop = Array3::<u8>::zeros((10, 10, 1));
        let result = ImageFileWriter::new().write(&dir.path().join("g.png"), crop.view());
        assert!(result.is_err());
    }
}

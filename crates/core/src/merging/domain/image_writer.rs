use std::path::Path;

use ndarray::ArrayView3;

/// Writes a `(height, width, 3)` face crop to an image file.
pub trait ImageWriter: Send {
    fn write(
        &self,
        path: &Path,
        crop: ArrayView3<'_, u8>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

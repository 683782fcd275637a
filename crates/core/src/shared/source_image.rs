use std::path::{Path, PathBuf};

use ndarray::{s, Array3, ArrayView3};

use crate::shared::orientation::Orientation;
use crate::shared::rectangle::Rectangle;

/// The pristine photo detections were taken from: contiguous RGB bytes in
/// row-major order, plus the orientation resolved from its metadata.
///
/// Decoding happens at the I/O boundary; the merge domain only ever sees
/// this in-memory form.
#[derive(Clone, Debug)]
pub struct SourceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    orientation: Orientation,
    path: Option<PathBuf>,
}

impl SourceImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            orientation: Orientation::Normal,
            path: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("SourceImage data length must match dimensions")
    }

    /// Copies the pixels under `rect`, clipped to the image, and rotates
    /// the copy into display orientation.
    pub fn crop(&self, rect: &Rectangle) -> Array3<u8> {
        let clipped = rect.clip(self.width, self.height);
        let view = self.as_ndarray();
        let region = view.slice(s![
            clipped.top() as usize..clipped.bottom() as usize,
            clipped.left() as usize..clipped.right() as usize,
            ..
        ]);
        self.orientation.apply(region)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

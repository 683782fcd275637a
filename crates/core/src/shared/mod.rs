pub mod constants;
pub mod orientation;
pub mod rectangle;
pub mod source_image;

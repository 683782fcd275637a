pub mod face_rect;
pub mod image_writer;
pub mod merge_decision;
pub mod merge_error;
pub mod merge_fusion;
pub mod merge_thresholds;
pub mod square_crop;

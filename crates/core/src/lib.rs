//! Deduplication and fusion of overlapping face detections.
//!
//! A photo run through several detector passes yields the same face more
//! than once, with slightly different boxes. [`merging`] decides which
//! detections are the same face and fuses them; [`pipeline`] drives that
//! decision pairwise over every detection of a photo.

pub mod merging;
pub mod pipeline;
pub mod shared;

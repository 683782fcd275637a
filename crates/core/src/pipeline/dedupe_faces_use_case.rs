use crate::merging::domain::face_rect::FaceRect;
use crate::merging::domain::merge_decision::should_merge;
use crate::merging::domain::merge_error::MergeError;
use crate::merging::domain::merge_fusion::merge;
use crate::merging::domain::merge_thresholds::MergeThresholds;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::source_image::SourceImage;

/// Per-photo deduplication: score pairs → fuse → repeat → square crops.
///
/// Pairs are scanned in index order. The first mergeable pair `(i, j)` is
/// replaced by its fusion at position `i` and the scan restarts, so the
/// earlier record plays the `a` role and wins label conflicts.
pub struct DedupeFacesUseCase {
    thresholds: MergeThresholds,
    logger: Box<dyn PipelineLogger>,
}

impl DedupeFacesUseCase {
    pub fn new(thresholds: MergeThresholds, logger: Box<dyn PipelineLogger>) -> Self {
        Self { thresholds, logger }
    }

    /// Collapses all detections of the same face and derives a square crop
    /// for each survivor.
    ///
    /// Zero-area survivors are kept without a square crop. Any pair without
    /// comparable encodings aborts the whole batch.
    pub fn execute(
        &mut self,
        faces: Vec<FaceRect>,
        source: &SourceImage,
    ) -> Result<Vec<FaceRect>, MergeError> {
        let detections_in = faces.len();
        let mut faces = faces;
        let mut merges = 0usize;

        while let Some((i, j)) = self.find_mergeable_pair(&faces)? {
            let merged = merge(&faces[i], &faces[j], source);
            faces.remove(j);
            faces[i] = merged;
            merges += 1;
        }

        let mut degenerate = 0usize;
        for face in &mut faces {
            if face.rectangle().area() == 0 {
                log::warn!(
                    "Skipping square crop for zero-area detection {}",
                    face.rectangle()
                );
                degenerate += 1;
                continue;
            }
            face.add_square_crop(source)?;
        }

        self.logger.metric("detections_in", detections_in as f64);
        self.logger.metric("merges", merges as f64);
        self.logger.metric("degenerate", degenerate as f64);
        self.logger.metric("detections_out", faces.len() as f64);
        self.logger.info(&format!(
            "Merged {detections_in} detections into {} faces",
            faces.len()
        ));
        self.logger.summary();

        Ok(faces)
    }

    fn find_mergeable_pair(
        &mut self,
        faces: &[FaceRect],
    ) -> Result<Option<(usize, usize)>, MergeError> {
        let n = faces.len();
        let total = n * n.saturating_sub(1) / 2;
        let mut compared = 0;

        for i in 0..n {
            for j in (i + 1)..n {
                compared += 1;
                self.logger.progress(compared, total);
                if should_merge(&faces[i], &faces[j], &self.thresholds)? {
                    return Ok(Some((i, j)));
                }
            }
        }
        Ok(None)
    }
}

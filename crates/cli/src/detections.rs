use std::fs;
use std::path::{Path, PathBuf};

use facemerge_core::merging::domain::face_rect::FaceRect;
use facemerge_core::shared::rectangle::Rectangle;
use serde::{Deserialize, Serialize};

/// One raw detector hit as supplied by the detection/encoding backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionInput {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    pub detection_level: u32,
    #[serde(default)]
    pub encoding: Option<Vec<f64>>,
    #[serde(default)]
    pub label: Option<String>,
}

impl DetectionInput {
    pub fn into_face_rect(self) -> FaceRect {
        let rect = Rectangle::new(self.top, self.bottom, self.left, self.right);
        let mut face = FaceRect::new(rect, self.detection_level);
        if let Some(encoding) = self.encoding {
            face = face.with_encoding(encoding);
        }
        if let Some(label) = self.label {
            face = face.with_label(label);
        }
        face
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquareOutput {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

/// A deduplicated face as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedFaceOutput {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    pub detection_level: u32,
    pub label: Option<String>,
    pub square: Option<SquareOutput>,
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_path: Option<PathBuf>,
}

impl MergedFaceOutput {
    pub fn from_face(face: &FaceRect, crop_path: Option<PathBuf>) -> Self {
        let rect = face.rectangle();
        Self {
            top: rect.top(),
            bottom: rect.bottom(),
            left: rect.left(),
            right: rect.right(),
            detection_level: face.detection_level(),
            label: face.label().map(str::to_string),
            square: face.square_bounds().map(|b| SquareOutput {
                top: b.top,
                bottom: b.bottom,
                left: b.left,
                right: b.right,
            }),
            identity: face.identity_digest(),
            crop_path,
        }
    }
}

pub fn read_detections(path: &Path) -> Result<Vec<FaceRect>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read detections {}: {e}", path.display()))?;
    let inputs: Vec<DetectionInput> = serde_json::from_str(&json)
        .map_err(|e| format!("invalid detections {}: {e}", path.display()))?;
    Ok(inputs
        .into_iter()
        .map(DetectionInput::into_face_rect)
        .collect())
}

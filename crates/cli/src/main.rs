mod config;
mod detections;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facemerge_core::merging::domain::face_rect::FaceRect;
use facemerge_core::merging::domain::image_writer::ImageWriter;
use facemerge_core::merging::infrastructure::image_file_reader::ImageFileReader;
use facemerge_core::merging::infrastructure::image_file_writer::ImageFileWriter;
use facemerge_core::pipeline::dedupe_faces_use_case::DedupeFacesUseCase;
use facemerge_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facemerge_core::shared::constants::IMAGE_EXTENSIONS;

use crate::config::ThresholdConfig;
use crate::detections::{read_detections, MergedFaceOutput};

/// Merge duplicate face detections of a photo into one record per face.
#[derive(Parser)]
#[command(name = "facemerge")]
struct Cli {
    /// Photo the detections were taken from.
    photo: PathBuf,

    /// JSON array of detections ({top, bottom, left, right, detection_level, encoding?, label?}).
    detections: PathBuf,

    /// Write one square crop per merged face into this directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Threshold config file (JSON). Defaults to the per-user config if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Normalized center distance under which boxes count as co-located.
    #[arg(long)]
    distance_threshold: Option<f64>,

    /// Encoding distance under which faces count as the same identity.
    #[arg(long)]
    encoding_threshold: Option<f64>,

    /// Insideness (0.0-1.0) over which one box counts as covering the other.
    #[arg(long)]
    intersect_threshold: Option<f64>,

    /// Write the merged detections here instead of stdout.
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = ThresholdConfig::load(cli.config.as_deref())?.with_overrides(
        cli.distance_threshold,
        cli.encoding_threshold,
        cli.intersect_threshold,
    );
    config.validate()?;

    let source = ImageFileReader::new().open(&cli.photo)?;
    let faces = read_detections(&cli.detections)?;
    log::info!(
        "Loaded {} detections for {}",
        faces.len(),
        cli.photo.display()
    );

    let mut use_case = DedupeFacesUseCase::new(
        config.to_thresholds(),
        Box::new(StdoutPipelineLogger::new()),
    );
    let merged = use_case.execute(faces, &source)?;

    let outputs = match &cli.output_dir {
        Some(dir) => write_crops(&merged, dir, &ImageFileWriter::new())?,
        None => merged
            .iter()
            .map(|face| MergedFaceOutput::from_face(face, None))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&outputs)?;
    match &cli.json_out {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Output written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn write_crops(
    faces: &[FaceRect],
    dir: &Path,
    writer: &dyn ImageWriter,
) -> Result<Vec<MergedFaceOutput>, Box<dyn std::error::Error>> {
    let mut outputs = Vec::with_capacity(faces.len());
    for (idx, face) in faces.iter().enumerate() {
        let crop_path = match face.square_crop() {
            Some(crop) => {
                let path = dir.join(format!("face_{idx}.png"));
                writer.write(&path, crop.view())?;
                Some(path)
            }
            None => None,
        };
        outputs.push(MergedFaceOutput::from_face(face, crop_path));
    }
    log::info!("Saved {} face crops to {}", outputs.len(), dir.display());
    Ok(outputs)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.photo.exists() {
        return Err(format!("Photo not found: {}", cli.photo.display()).into());
    }
    if !is_image(&cli.photo) {
        return Err(format!(
            "Unsupported photo format: {} (expected one of {})",
            cli.photo.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if !cli.detections.exists() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

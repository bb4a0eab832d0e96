//! Binary for checking a classifier artifact from the command line
//!
//! Prints the SHA-256 to pin in `models.classifier_sha256` and runs one
//! inference on a neutral pose.

use signa_core::{FeatureVector, FEATURE_LEN};
use signa_eye::error::VisionError;
use signa_eye::models::manager::file_sha256;
use signa_eye::models::OnnxScoreModel;
use signa_eye::ScoreModel;
use std::env;
use std::path::Path;

fn main() -> Result<(), VisionError> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: inspect_model <path/to/classifier.onnx>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    println!("sha256: {}", file_sha256(path)?);

    let model = OnnxScoreModel::load(path, 1)?;
    let neutral = FeatureVector::from_slice(&[0.5; FEATURE_LEN])?;
    match model.scores(&neutral) {
        Ok(scores) => println!("scores for neutral pose: {:?}", scores),
        Err(e) => {
            eprintln!("Inference failed: {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}

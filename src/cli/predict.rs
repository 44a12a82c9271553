//! Predict command - readability label and probability per file

use super::{check_failures, process_files, Engine};
use crate::classifier::{LogisticModel, Prediction, ReadabilityCalculator};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
struct FilePrediction {
    file: String,
    #[serde(flatten)]
    prediction: Prediction,
}

pub fn run(engine: Engine, model_path: &Path, files: &[PathBuf], format: &str) -> Result<()> {
    let model = LogisticModel::load(model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;
    info!("Loaded model from {}", model_path.display());

    let calculator = ReadabilityCalculator::new(Arc::new(model), engine.language, engine.lexicon, engine.config);
    let (results, failed) = process_files(files, |code| Ok(calculator.predict(code)?));

    let predictions: Vec<FilePrediction> = results
        .into_iter()
        .map(|(path, prediction)| FilePrediction {
            file: path.display().to_string(),
            prediction,
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&predictions)?),
        _ => {
            for p in &predictions {
                println!("{}\t{}\t{:.4}", p.file, p.prediction.label, p.prediction.probability);
            }
        }
    }

    check_failures(failed, files.len())
}

//! Metrics command - compute readability features per file

use super::{check_failures, process_files, Engine};
use crate::registry::FeatureRegistry;
use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct FileFeatures {
    file: String,
    features: IndexMap<String, f64>,
}

/// Run the metrics command. With no `features`, every feature is computed.
pub fn run(engine: &Engine, files: &[PathBuf], features: &[String], format: &str) -> Result<()> {
    let (results, failed) = process_files(files, |code| {
        let registry = FeatureRegistry::for_code(code, engine.lexer(), &engine.lexicon, &engine.config);
        if features.is_empty() {
            return Ok(registry.compute_all()?);
        }
        let values = registry.compute(features)?;
        Ok(features.iter().cloned().zip(values).collect())
    });

    let reports: Vec<FileFeatures> = results
        .into_iter()
        .map(|(path, features)| FileFeatures {
            file: path.display().to_string(),
            features,
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        _ => print!("{}", render_text(&reports)),
    }

    check_failures(failed, files.len())
}

fn render_text(reports: &[FileFeatures]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("{}\n", report.file));
        for (name, value) in &report.features {
            out.push_str(&format!("  {name}: {value}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let reports = vec![FileFeatures {
            file: "a.cpp".to_string(),
            features: IndexMap::from([
                ("Posnett lines".to_string(), 3.0),
                ("BW MAX char".to_string(), 12.5),
            ]),
        }];
        assert_eq!(
            render_text(&reports),
            "a.cpp\n  Posnett lines: 3\n  BW MAX char: 12.5\n"
        );
    }
}

//! The `studypulse validate` command.

use std::path::PathBuf;

use anyhow::Result;

use studypulse_stores::{load_config_from, Dataset};

pub fn execute(dataset_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = match dataset_path {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.dataset,
    };
    let dataset = Dataset::load_json(&path)?;

    println!(
        "Dataset: {} ({} subjects, {} topics, {} results)",
        path.display(),
        dataset.subjects.len(),
        dataset.topics.len(),
        dataset.results.len()
    );

    let warnings = dataset.validate();
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.id, w.message);
    }

    if warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

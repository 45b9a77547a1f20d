//! Offline model training entry point.
//!
//! Trains the structure classifier on a synthetic corpus and writes the
//! artifact to disk. Usage:
//!
//! ```text
//! train_model [output_path] [n_samples]
//! ```
//!
//! Defaults: `models/structure.json`, 20000 samples.

use docstruct::model::{train_offline, GbdtParams};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output: PathBuf = args
        .next()
        .unwrap_or_else(|| "models/structure.json".to_string())
        .into();
    let n_samples: usize = match args.next().map(|s| s.parse()).transpose() {
        Ok(n) => n.unwrap_or(20000),
        Err(_) => {
            eprintln!("Usage: train_model [output_path] [n_samples]");
            return ExitCode::FAILURE;
        }
    };

    let params = GbdtParams::default();
    log::info!(
        "Training on {} synthetic samples ({} rounds, depth {})",
        n_samples,
        params.n_rounds,
        params.max_depth
    );

    let model = match train_offline(n_samples, &params) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Training failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Failed to create {}: {}", parent.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(e) = model.save(&output) {
        eprintln!("Failed to save model: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Model written to {}", output.display());
    ExitCode::SUCCESS
}

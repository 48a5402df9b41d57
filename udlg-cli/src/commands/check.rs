use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;
use udlg::ParserConfig;

use crate::{
    app::GlobalOptions,
    commands::common::{collect_dialogs, load_dialog},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct FileHealth {
    path: String,
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthReport {
    checked: Vec<FileHealth>,
    cached: usize,
    failed: usize,
    report: String,
}

pub fn run(
    path: &Path,
    recursive: bool,
    output: &Path,
    use_cache: bool,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let files = if path.is_dir() {
        collect_dialogs(path, recursive)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut health = if use_cache && output.exists() {
        load_health(output)?
    } else {
        BTreeMap::new()
    };

    let pending: Vec<PathBuf> = files
        .into_iter()
        .filter(|file| !health.contains_key(&file.display().to_string()))
        .collect();
    let cached = health.len();

    let checked: Vec<FileHealth> = pending.par_iter().map(|file| check_file(file)).collect();
    for result in &checked {
        health.insert(result.path.clone(), result.healthy);
    }

    std::fs::write(output, serde_json::to_string_pretty(&health)?)
        .with_context(|| format!("failed to write health report: {}", output.display()))?;

    let report = HealthReport {
        failed: checked.iter().filter(|r| !r.healthy).count(),
        checked,
        cached,
        report: output.display().to_string(),
    };

    print_output(&report, opts, |report| {
        for result in report.checked.iter().filter(|r| !r.healthy) {
            let error = result.error.as_deref().unwrap_or("unknown error");
            println!("FAIL  {}  {}", result.path, error);
        }
        println!(
            "Checked {} files ({} failed, {} from cache), report written to {}",
            report.checked.len(),
            report.failed,
            report.cached,
            report.report
        );
    })
}

fn check_file(path: &Path) -> FileHealth {
    // Strict parsing also resolves every object reference
    let result = load_dialog(path, ParserConfig::strict()).and_then(|dialog| {
        anyhow::ensure!(
            dialog.document().is_terminated(),
            "document does not end with MessageEnd"
        );
        Ok(())
    });

    let display = path.display().to_string();
    match result {
        Ok(()) => {
            log::info!("file processing: {display} - OK");
            FileHealth {
                path: display,
                healthy: true,
                error: None,
            }
        }
        Err(error) => {
            log::info!("file processing: {display} - FAIL");
            FileHealth {
                path: display,
                healthy: false,
                error: Some(format!("{error:#}")),
            }
        }
    }
}

fn load_health(path: &Path) -> anyhow::Result<BTreeMap<String, bool>> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read health report: {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("invalid health report: {}", path.display()))
}

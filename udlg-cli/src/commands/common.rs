use std::path::{Path, PathBuf};

use anyhow::Context;
use udlg::{Document, File, ParserConfig, Udlg};

/// Load a `.udlg` file with the given parser configuration.
pub fn load_dialog(path: &Path, config: ParserConfig) -> anyhow::Result<Udlg> {
    let file = File::from_file(path)
        .with_context(|| format!("failed to open dialog: {}", path.display()))?;
    Udlg::parse_with_config(file.data(), config)
        .with_context(|| format!("failed to parse dialog: {}", path.display()))
}

/// Load the document of a `.udlg` file, or any other file as a bare object-graph stream.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    if is_dialog_file(path) {
        return Ok(load_dialog(path, ParserConfig::default())?.document().clone());
    }

    let file = File::from_file(path)
        .with_context(|| format!("failed to open stream: {}", path.display()))?;
    Document::parse(file.data())
        .with_context(|| format!("failed to parse stream: {}", path.display()))
}

/// Collect `.udlg` files from a directory, descending into subdirectories if `recursive`.
pub fn collect_dialogs(dir: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_dialogs_into(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_dialogs_into(
    dir: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_dialogs_into(&path, recursive, files)?;
            }
        } else if is_dialog_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns true if the path has a `.udlg` extension.
pub fn is_dialog_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("udlg"))
}

/// Path of the patch block for `dialog`, mirroring its position below `dialogs_dir` in `i18n_dir`.
pub fn patch_block_path(dialog: &Path, dialogs_dir: &Path, i18n_dir: &Path) -> Option<PathBuf> {
    let relative = dialog.strip_prefix(dialogs_dir).ok()?;
    Some(i18n_dir.join(relative).with_extension("txt"))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

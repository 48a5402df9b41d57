use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use md5::{Digest, Md5};
use serde::Serialize;
use udlg::{parse_patch_block, ParserConfig};

use crate::{
    app::GlobalOptions,
    commands::common::{collect_dialogs, load_dialog, patch_block_path},
    output::print_output,
};

/// Name of the digest cache kept in the i18n directory.
const CACHE_FILE: &str = "cache.json";

pub struct ApplyOptions<'a> {
    pub dialogs: &'a Path,
    pub i18n: &'a Path,
    pub output: &'a Path,
    pub skip_processed: bool,
}

#[derive(Debug, Serialize)]
struct ApplySummary {
    patched: Vec<String>,
    skipped: Vec<String>,
    missing: Vec<String>,
    failed: Vec<String>,
    patches: usize,
}

enum Outcome {
    Patched(usize),
    Skipped,
    Missing,
}

pub fn run(options: &ApplyOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let cache_path = options.i18n.join(CACHE_FILE);
    let mut cache = load_cache(&cache_path)?;

    let summary = apply_all(options, &mut cache)?;

    std::fs::write(&cache_path, serde_json::to_string_pretty(&cache)?)
        .with_context(|| format!("failed to write cache: {}", cache_path.display()))?;

    print_output(&summary, opts, |summary| {
        println!(
            "Patched {} dialogs ({} strings), skipped {} unchanged, {} without patch block, {} failed",
            summary.patched.len(),
            summary.patches,
            summary.skipped.len(),
            summary.missing.len(),
            summary.failed.len()
        );
    })?;

    if !summary.failed.is_empty() {
        anyhow::bail!("{} dialogs could not be patched", summary.failed.len());
    }
    Ok(())
}

/// Patch every dialog below `options.dialogs`. A dialog that fails is logged and recorded,
/// the remaining ones are still processed.
fn apply_all(
    options: &ApplyOptions,
    cache: &mut BTreeMap<String, String>,
) -> anyhow::Result<ApplySummary> {
    let mut summary = ApplySummary {
        patched: Vec::new(),
        skipped: Vec::new(),
        missing: Vec::new(),
        failed: Vec::new(),
        patches: 0,
    };

    for dialog in collect_dialogs(options.dialogs, true)? {
        let name = dialog.display().to_string();
        match apply_one(&dialog, options, cache) {
            Ok(Outcome::Patched(count)) => {
                summary.patches += count;
                summary.patched.push(name);
            }
            Ok(Outcome::Skipped) => summary.skipped.push(name),
            Ok(Outcome::Missing) => summary.missing.push(name),
            Err(error) => {
                log::error!("{error:#}");
                summary.failed.push(name);
            }
        }
    }

    Ok(summary)
}

fn apply_one(
    dialog: &Path,
    options: &ApplyOptions,
    cache: &mut BTreeMap<String, String>,
) -> anyhow::Result<Outcome> {
    let Some(block_path) = patch_block_path(dialog, options.dialogs, options.i18n) else {
        return Ok(Outcome::Missing);
    };
    let block = match std::fs::read(&block_path) {
        Ok(block) => block,
        Err(error) => {
            log::error!(
                "Can not access i18n file: {} ({error}), skipping",
                block_path.display()
            );
            return Ok(Outcome::Missing);
        }
    };

    let key = block_path.display().to_string();
    let digest = digest_hex(&block);
    if options.skip_processed && cache.get(&key) == Some(&digest) {
        log::info!("Skipping `{}`, already processed", dialog.display());
        return Ok(Outcome::Skipped);
    }

    log::info!("Processing: {}", dialog.display());
    let mut udlg = load_dialog(dialog, ParserConfig::default())?;
    let patches = parse_patch_block(&block)
        .with_context(|| format!("invalid patch block: {}", block_path.display()))?;
    let count = udlg
        .document_mut()
        .apply_patch(&patches)
        .with_context(|| format!("failed to patch {}", dialog.display()))?;

    let target = output_path(dialog, options)?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&target, udlg.to_bytes()?)
        .with_context(|| format!("failed to write dialog: {}", target.display()))?;

    cache.insert(key, digest);
    Ok(Outcome::Patched(count))
}

fn output_path(dialog: &Path, options: &ApplyOptions) -> anyhow::Result<PathBuf> {
    let relative = dialog
        .strip_prefix(options.dialogs)
        .with_context(|| format!("{} is outside the dialog directory", dialog.display()))?;
    Ok(options.output.join(relative))
}

fn digest_hex(data: &[u8]) -> String {
    Md5::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn load_cache(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data =
        std::fs::read(path).with_context(|| format!("failed to read cache: {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("invalid cache: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIALOG: &[u8] = include_bytes!("../../../tests/samples/dialog.udlg");
    const PATCHES: &[u8] = include_bytes!("../../../tests/samples/dialog.txt");

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("udlg-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn failing_dialog_does_not_stop_batch() {
        let root = scratch_dir("apply-batch");
        let dialogs = root.join("dialogs");
        let i18n = root.join("i18n");
        let output = root.join("out");
        std::fs::create_dir_all(&dialogs).unwrap();
        std::fs::create_dir_all(&i18n).unwrap();

        // Sorted before the valid dialog
        std::fs::write(dialogs.join("a_broken.udlg"), &DIALOG[..0x40]).unwrap();
        std::fs::write(i18n.join("a_broken.txt"), PATCHES).unwrap();
        std::fs::write(dialogs.join("b_intro.udlg"), DIALOG).unwrap();
        std::fs::write(i18n.join("b_intro.txt"), PATCHES).unwrap();

        let options = ApplyOptions {
            dialogs: &dialogs,
            i18n: &i18n,
            output: &output,
            skip_processed: false,
        };
        let mut cache = BTreeMap::new();
        let summary = apply_all(&options, &mut cache).unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].ends_with("a_broken.udlg"));
        assert_eq!(summary.patched.len(), 1);
        assert!(output.join("b_intro.udlg").exists());
        assert!(!output.join("a_broken.udlg").exists());

        assert_eq!(cache.len(), 1);
        let key = i18n.join("b_intro.txt").display().to_string();
        assert_eq!(cache.get(&key), Some(&digest_hex(PATCHES)));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn md5_digest() {
        assert_eq!(digest_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn mirrored_output_path() {
        let options = ApplyOptions {
            dialogs: Path::new("game/Dialogs"),
            i18n: Path::new("i18n"),
            output: Path::new("out"),
            skip_processed: false,
        };
        assert_eq!(
            output_path(Path::new("game/Dialogs/npc/guard.udlg"), &options).unwrap(),
            PathBuf::from("out/npc/guard.udlg")
        );
        assert!(output_path(Path::new("other/guard.udlg"), &options).is_err());
    }
}

use std::path::Path;

use anyhow::Context;

use crate::commands::common::load_document;

pub fn run(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let document = load_document(path)?;
    let json = serde_json::to_string_pretty(&document.to_tree())?;

    match output {
        Some(output) => {
            std::fs::write(output, json)
                .with_context(|| format!("failed to write dump: {}", output.display()))?;
            log::info!("Dumped {} records to {}", document.len(), output.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_document},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct StringEntry {
    record: usize,
    member: usize,
    text: String,
}

pub fn run(path: &Path, output: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let strings = load_document(path)?.strings();

    if let Some(output) = output {
        let block = format!("# {}\n{}", file_display_name(path), strings.to_text());
        std::fs::write(output, block)
            .with_context(|| format!("failed to write template: {}", output.display()))?;
        log::info!("Wrote {} strings to {}", strings.len(), output.display());
        return Ok(());
    }

    let entries: Vec<StringEntry> = strings
        .iter()
        .map(|(record, member, text)| StringEntry {
            record,
            member,
            text: text.to_string(),
        })
        .collect();

    print_output(&entries, opts, |_| print!("{}", strings.to_text()))
}

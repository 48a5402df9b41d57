use std::path::Path;

use serde::Serialize;
use udlg::ParserConfig;

use crate::{
    app::GlobalOptions,
    commands::common::load_dialog,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct DialogInfo {
    pub file: String,
    pub signature: String,
    pub identifier: String,
    pub spaces: [u64; 3],
    pub block_index: u32,
    pub header_name: String,
    pub entries: Vec<HeaderEntryInfo>,
    pub document_offset: usize,
    pub record_count: usize,
    pub object_count: usize,
    pub string_count: usize,
    pub root_id: i32,
    pub trailer_len: usize,
}

#[derive(Debug, Serialize)]
pub struct HeaderEntryInfo {
    pub signature: String,
    pub metadata: u8,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let dialog = load_dialog(path, ParserConfig::default())?;
    let start = dialog.start();
    let document = dialog.document();

    let info = DialogInfo {
        file: path.display().to_string(),
        signature: hex(&start.signature),
        identifier: format!("0x{:016X}", start.identifier),
        spaces: start.spaces,
        block_index: start.block_index,
        header_name: dialog.header().name_lossy(),
        entries: dialog
            .header()
            .entries
            .iter()
            .map(|entry| HeaderEntryInfo {
                signature: entry.signature_lossy(),
                metadata: entry.metadata,
            })
            .collect(),
        document_offset: dialog.header_end(),
        record_count: document.len(),
        object_count: document.references().len(),
        string_count: document.strings().len(),
        root_id: document.header().root_id,
        trailer_len: dialog.trailer().len(),
    };

    print_output(&info, opts, |info| {
        println!("File:            {}", info.file);
        println!("Signature:       {}", info.signature);
        println!("Identifier:      {}", info.identifier);
        println!(
            "Spaces:          {} {} {}",
            info.spaces[0], info.spaces[1], info.spaces[2]
        );
        println!("Block index:     {}", info.block_index);
        println!("Header:          {}", info.header_name);
        println!("Document offset: 0x{:X}", info.document_offset);
        println!("Root id:         {}", info.root_id);
        println!("Records:         {}", info.record_count);
        println!("Objects:         {}", info.object_count);
        println!("Strings:         {}", info.string_count);
        println!("Trailer:         {} bytes", info.trailer_len);

        if !info.entries.is_empty() {
            println!("\nHeader entries:");
            let mut tw = TabWriter::new(vec![("Signature", Align::Left), ("Meta", Align::Right)])
                .indent("  ");
            for entry in &info.entries {
                tw.row(vec![entry.signature.clone(), entry.metadata.to_string()]);
            }
            tw.print();
        }
    })
}

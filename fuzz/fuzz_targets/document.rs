#![no_main]

use libfuzzer_sys::fuzz_target;
use udlg::{parse_patch_block, Document, ParserConfig};

fuzz_target!(|data: &[u8]| {
    let _ = parse_patch_block(data);

    if let Ok(document) = Document::parse_with_config(data, ParserConfig::strict()) {
        let _ = document.to_tree();
        let bytes = document.to_bytes().unwrap();
        let again = Document::parse(&bytes).unwrap().to_bytes().unwrap();
        assert_eq!(bytes, again);
    }
});

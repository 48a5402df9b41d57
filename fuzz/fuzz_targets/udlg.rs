#![no_main]

use libfuzzer_sys::fuzz_target;
use udlg::Udlg;

fuzz_target!(|data: &[u8]| {
    if let Ok(dialog) = Udlg::parse(data) {
        // Non-canonical varints and booleans are normalized, so compare re-encodings
        let bytes = dialog.to_bytes().unwrap();
        let again = Udlg::parse(&bytes).unwrap().to_bytes().unwrap();
        assert_eq!(bytes, again);
    }
});

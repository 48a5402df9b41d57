//! The `.udlg` envelope: fixed blocks, document offset and trailer handling.

use std::{
    io::{Cursor, Read, Seek, SeekFrom},
    path::PathBuf,
};

use udlg::{prelude::*, udlg::HEADER_OFFSET};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/dialog.udlg")
}

#[test]
fn load_from_disk() -> Result<()> {
    let dialog = Udlg::from_file(&sample_path())?;

    assert_eq!(dialog.start().identifier, 0x1122_3344_5566_7788);
    assert_eq!(dialog.start().block_index, 3);
    assert_eq!(dialog.header().name_lossy(), "UDLG");

    let entries: Vec<(String, u8)> = dialog
        .header()
        .entries
        .iter()
        .map(|entry| (entry.signature_lossy(), entry.metadata))
        .collect();
    assert_eq!(
        entries,
        vec![("Dialog.Line".to_string(), 1), ("Dialog.Link".to_string(), 7)]
    );

    assert_eq!(dialog.header_end(), 88);
    assert_eq!(dialog.document().len(), 8);
    assert_eq!(dialog.trailer(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    Ok(())
}

#[test]
fn document_offset_matches_embedded_stream() -> Result<()> {
    let data = std::fs::read(sample_path())?;
    let offset = Udlg::document_offset(&data)?;
    assert_eq!(offset, HEADER_OFFSET + 36);

    let embedded = Document::parse(&data[offset..])?;
    let bare = Document::parse(&std::fs::read(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/dialog.dat"),
    )?)?;
    assert_eq!(embedded, bare);
    Ok(())
}

#[test]
fn from_reader_and_memory() -> Result<()> {
    let data = std::fs::read(sample_path())?;

    let mut cursor = Cursor::new(data.clone());
    cursor.seek(SeekFrom::End(0))?;
    let from_reader = Udlg::from_reader(&mut cursor)?;
    assert_eq!(from_reader, Udlg::parse(&data)?);

    let file = File::from_mem(data.clone())?;
    assert_eq!(file.len(), data.len());
    assert_eq!(Udlg::parse(file.data())?, from_reader);
    Ok(())
}

#[test]
fn non_seekable_reader() {
    struct Stream(Vec<u8>);

    impl Read for Stream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let count = buf.len().min(self.0.len());
            buf[..count].copy_from_slice(&self.0[..count]);
            self.0.drain(..count);
            Ok(count)
        }
    }

    impl Seek for Stream {
        fn seek(&mut self, _: SeekFrom) -> std::io::Result<u64> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "stream cannot seek",
            ))
        }
    }

    let mut stream = Stream(vec![0; 64]);
    assert!(matches!(
        Udlg::from_reader(&mut stream),
        Err(Error::NotSeekable(_))
    ));
}

#[test]
fn trailer_is_preserved_after_patch() -> Result<()> {
    let data = std::fs::read(sample_path())?;
    let mut dialog = Udlg::parse(&data)?;
    dialog.document_mut().apply_text_patch(3, 1, "Captain")?;

    let bytes = dialog.to_bytes()?;
    assert_eq!(&bytes[..88], &data[..88]);
    assert_eq!(&bytes[bytes.len() - 4..], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(bytes.len(), data.len() + "Captain".len() - "Guard".len());
    Ok(())
}

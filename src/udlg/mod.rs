//! The `.udlg` envelope.
//!
//! A dialog file starts with a fixed 52 byte [`StartBlock`], followed at offset `0x34` by a
//! [`Header`] naming the resources the dialog depends on. The embedded object-graph
//! [`Document`] starts right after the header. Anything following the document's `MessageEnd`
//! is kept verbatim as the trailer so whole files round-trip.
//!
//! ```text
//! 0x00  [16 signature][u64 identifier][3 x u64 spaces][u32 block index]
//! 0x34  [u8 0][u8 name length][name][u32 count][count x (u8 length, signature)][count x u8]
//!       [document ...][trailer ...]
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use udlg::Udlg;
//! use std::path::Path;
//!
//! let mut dialog = Udlg::from_file(Path::new("Data/Dialogs/intro.udlg"))?;
//! dialog.document_mut().apply_text_patch(5, 2, "Привет")?;
//! std::fs::write("intro.udlg", dialog.to_bytes()?)?;
//! # Ok::<(), udlg::Error>(())
//! ```

use std::{
    io::{Read, Seek},
    path::Path,
};

use log::debug;

use crate::{
    binaryformat::Document,
    config::ParserConfig,
    file::{File, Parser, Writer},
    Result,
};

/// Offset of the header block, which is also the size of the start block.
pub const HEADER_OFFSET: usize = 0x34;

/// Fixed-size block at the start of every `.udlg` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartBlock {
    /// File signature
    pub signature: [u8; 16],
    /// Dialog identifier
    pub identifier: u64,
    /// Three reserved values
    pub spaces: [u64; 3],
    /// Index of the block
    pub block_index: u32,
}

impl StartBlock {
    /// Encoded size in bytes.
    pub const SIZE: usize = HEADER_OFFSET;

    /// Read the start block from the beginning of `parser`'s data.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] for files shorter than the block.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        parser.seek(0)?;

        let mut signature = [0u8; 16];
        signature.copy_from_slice(parser.read_bytes(16)?);
        let identifier = parser.read_le::<u64>()?;
        let spaces = [
            parser.read_le::<u64>()?,
            parser.read_le::<u64>()?,
            parser.read_le::<u64>()?,
        ];
        let block_index = parser.read_le::<u32>()?;

        Ok(StartBlock {
            signature,
            identifier,
            spaces,
            block_index,
        })
    }

    /// Write the block.
    pub fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.signature);
        writer.write_le(self.identifier);
        for space in self.spaces {
            writer.write_le(space);
        }
        writer.write_le(self.block_index);
    }
}

/// A resource entry of the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Resource signature, usually an ASCII name
    pub signature: Vec<u8>,
    /// Metadata byte attached to the entry
    pub metadata: u8,
}

impl HeaderEntry {
    /// Signature as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn signature_lossy(&self) -> String {
        String::from_utf8_lossy(&self.signature).into_owned()
    }
}

/// Resource header located at [`HEADER_OFFSET`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Leading byte, zero in every known file
    pub reserved: u8,
    /// Header name
    pub name: Vec<u8>,
    /// Resource entries in file order
    pub entries: Vec<HeaderEntry>,
}

impl Header {
    /// Read the header at [`HEADER_OFFSET`]. The parser is left right after the header.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] if the header is truncated.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        parser.seek(HEADER_OFFSET)?;

        let reserved = parser.read_le::<u8>()?;
        let name_length = parser.read_le::<u8>()?;
        let name = parser.read_bytes(name_length as usize)?.to_vec();

        let entry_count = parser.read_le::<u32>()? as usize;
        // Every entry takes at least a length byte and a metadata byte
        if entry_count > parser.remaining() / 2 {
            return Err(malformed_error!(
                "Header declares {} entries but only {} bytes remain",
                entry_count,
                parser.remaining()
            ));
        }

        let mut signatures = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            let length = parser.read_le::<u8>()?;
            signatures.push(parser.read_bytes(length as usize)?.to_vec());
        }

        let entries = signatures
            .into_iter()
            .map(|signature| {
                Ok(HeaderEntry {
                    signature,
                    metadata: parser.read_le::<u8>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Header {
            reserved,
            name,
            entries,
        })
    }

    /// Write the header: all signatures first, then all metadata bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the name or a signature exceeds 255 bytes.
    pub fn write(&self, writer: &mut Writer) -> Result<()> {
        writer.write_le(self.reserved);
        writer.write_le(short_length(&self.name)?);
        writer.write_bytes(&self.name);

        let Ok(count) = u32::try_from(self.entries.len()) else {
            return Err(malformed_error!("Too many header entries - {}", self.entries.len()));
        };
        writer.write_le(count);

        for entry in &self.entries {
            writer.write_le(short_length(&entry.signature)?);
            writer.write_bytes(&entry.signature);
        }
        for entry in &self.entries {
            writer.write_le(entry.metadata);
        }
        Ok(())
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + 1
            + self.name.len()
            + 4
            + self
                .entries
                .iter()
                .map(|entry| 1 + entry.signature.len() + 1)
                .sum::<usize>()
    }

    /// Header name as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

fn short_length(bytes: &[u8]) -> Result<u8> {
    u8::try_from(bytes.len())
        .map_err(|_| malformed_error!("Header string of {} bytes exceeds 255", bytes.len()))
}

/// A parsed `.udlg` file.
#[derive(Clone, Debug, PartialEq)]
pub struct Udlg {
    start: StartBlock,
    header: Header,
    document: Document,
    trailer: Vec<u8>,
}

impl Udlg {
    /// Parse a complete file with the default [`ParserConfig`].
    ///
    /// # Errors
    /// Returns envelope read errors and any error of [`Document::parse`].
    pub fn parse(data: &[u8]) -> Result<Udlg> {
        Self::parse_with_config(data, ParserConfig::default())
    }

    /// Parse a complete file with an explicit configuration.
    ///
    /// `allow_trailing_data` does not apply: bytes after the document are the trailer.
    ///
    /// # Errors
    /// Returns envelope read errors and any error of [`Document::parse_with_config`].
    pub fn parse_with_config(data: &[u8], config: ParserConfig) -> Result<Udlg> {
        let mut parser = Parser::new(data);
        let start = StartBlock::read(&mut parser)?;
        let header = Header::read(&mut parser)?;

        let offset = parser.pos();
        let (document, end) = Document::parse_prefix(data, offset, config)?;
        let trailer = data[end..].to_vec();

        debug!(
            "Parsed udlg '{}': {} header entries, document at {:#x}, {} trailer bytes",
            header.name_lossy(),
            header.entries.len(),
            offset,
            trailer.len()
        );

        Ok(Udlg {
            start,
            header,
            document,
            trailer,
        })
    }

    /// Load and parse a file from disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read and any parse error.
    pub fn from_file(path: &Path) -> Result<Udlg> {
        let file = File::from_file(path)?;
        Self::parse(file.data())
    }

    /// Read and parse a seekable source.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSeekable`] if the reader cannot seek and any parse error.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Udlg> {
        let file = File::from_reader(reader)?;
        Self::parse(file.data())
    }

    /// Offset of the embedded document, computed from the header without decoding the
    /// document.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] if the header is truncated.
    pub fn document_offset(data: &[u8]) -> Result<usize> {
        let mut parser = Parser::new(data);
        let header = Header::read(&mut parser)?;
        Ok(HEADER_OFFSET + header.size())
    }

    /// Encode the complete file.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the header or the document cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::with_capacity(HEADER_OFFSET + self.header.size() + 1024);
        self.start.write(&mut writer);
        self.header.write(&mut writer)?;
        self.document.write(&mut writer)?;
        writer.write_bytes(&self.trailer);
        Ok(writer.into_inner())
    }

    /// The start block.
    #[must_use]
    pub fn start(&self) -> &StartBlock {
        &self.start
    }

    /// The resource header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The embedded document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The embedded document, for patching.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Bytes following the document.
    #[must_use]
    pub fn trailer(&self) -> &[u8] {
        &self.trailer
    }

    /// Offset of the embedded document in the encoded file.
    #[must_use]
    pub fn header_end(&self) -> usize {
        HEADER_OFFSET + self.header.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const SAMPLE: &[u8] = include_bytes!("../../tests/samples/dialog.udlg");

    #[test]
    fn start_block() {
        let mut parser = Parser::new(SAMPLE);
        let start = StartBlock::read(&mut parser).unwrap();
        assert_eq!(parser.pos(), StartBlock::SIZE);
        assert_eq!(start.signature[0], 0x0C);
        assert_eq!(start.identifier, 0x1122_3344_5566_7788);
        assert_eq!(start.spaces, [0, 1, 2]);
        assert_eq!(start.block_index, 3);

        let mut writer = Writer::new();
        start.write(&mut writer);
        assert_eq!(writer.as_slice(), &SAMPLE[..StartBlock::SIZE]);
    }

    #[test]
    fn header_block() {
        let mut parser = Parser::new(SAMPLE);
        let header = Header::read(&mut parser).unwrap();
        assert_eq!(header.reserved, 0);
        assert_eq!(header.name_lossy(), "UDLG");
        assert_eq!(header.entries.len(), 2);
        assert_eq!(header.entries[0].signature_lossy(), "Dialog.Line");
        assert_eq!(header.entries[0].metadata, 1);
        assert_eq!(header.entries[1].signature_lossy(), "Dialog.Link");
        assert_eq!(header.entries[1].metadata, 7);
        assert_eq!(header.size(), 36);
        assert_eq!(parser.pos(), HEADER_OFFSET + 36);

        let mut writer = Writer::new();
        header.write(&mut writer).unwrap();
        assert_eq!(writer.as_slice(), &SAMPLE[HEADER_OFFSET..HEADER_OFFSET + 36]);
    }

    #[test]
    fn document_offset() {
        assert_eq!(Udlg::document_offset(SAMPLE).unwrap(), 88);
        assert_eq!(SAMPLE[88], 0x00);
        assert!(matches!(
            Udlg::document_offset(&SAMPLE[..60]),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn parse_and_write() {
        let udlg = Udlg::parse(SAMPLE).unwrap();
        assert_eq!(udlg.header_end(), 88);
        assert_eq!(udlg.trailer(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(udlg.document().len(), 8);
        assert_eq!(udlg.to_bytes().unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn oversized_header_strings() {
        let header = Header {
            reserved: 0,
            name: vec![b'x'; 256],
            entries: Vec::new(),
        };
        let mut writer = Writer::new();
        assert!(matches!(
            header.write(&mut writer),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn truncated_envelope() {
        assert!(matches!(
            Udlg::parse(&SAMPLE[..40]),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(
            Udlg::parse(&SAMPLE[..88]),
            Err(Error::Empty)
        ));
        assert!(matches!(
            Udlg::parse(&SAMPLE[..200]),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}

//! Complete object-graph streams.
//!
//! A [`Document`] owns the [`SerializationHeader`] and the ordered sequence of top-level
//! [`Record`]s of one stream, always ending with `MessageEnd`, plus the [`ReferenceTable`]
//! built while decoding.
//!
//! Reading runs the [`RecordDecoder`] until it produces `MessageEnd`; there is no record count
//! in the stream. Writing is a flat pass over the record sequence in its original order, so
//! unreferenced records survive and an unmodified document is reproduced byte for byte.
//!
//! # Examples
//!
//! ```rust
//! use udlg::Document;
//!
//! let data = std::fs::read("tests/samples/string.dat")?;
//! let document = Document::parse(&data)?;
//!
//! assert_eq!(document.records()[0].as_str(), Some("String should be serialized"));
//! assert_eq!(document.to_bytes()?, data);
//! # Ok::<(), udlg::Error>(())
//! ```

use log::{debug, warn};

use crate::{
    binaryformat::{
        decoder::RecordDecoder,
        encoder::{write_header, write_record},
        MemberValue, Record, RecordLocation, ReferenceTable, SerializationHeader,
    },
    config::ParserConfig,
    file::Writer,
    Error, Result,
};

/// A decoded object-graph stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    header: SerializationHeader,
    records: Vec<Record>,
    references: ReferenceTable,
}

impl Document {
    /// Parse a stream with the default [`ParserConfig`].
    ///
    /// # Errors
    /// Any decoding error aborts the parse; see [`Error`].
    pub fn parse(data: &[u8]) -> Result<Document> {
        Self::parse_with_config(data, ParserConfig::default())
    }

    /// Parse a stream with an explicit configuration.
    ///
    /// # Errors
    /// Any decoding error aborts the parse. With `verify_references` set, dangling
    /// `MemberReference` ids fail with [`Error::UnresolvedReference`]; with
    /// `allow_trailing_data` unset, bytes after `MessageEnd` fail with [`Error::Malformed`].
    pub fn parse_with_config(data: &[u8], config: ParserConfig) -> Result<Document> {
        let (document, consumed) = Self::parse_prefix(data, 0, config)?;

        if consumed < data.len() {
            if !config.allow_trailing_data {
                return Err(malformed_error!(
                    "{} bytes of trailing data after MessageEnd at offset {}",
                    data.len() - consumed,
                    consumed
                ));
            }
            warn!(
                "Ignoring {} bytes after MessageEnd at offset {}",
                data.len() - consumed,
                consumed
            );
        }

        Ok(document)
    }

    /// Parse a stream starting at `offset` of `data` that may be followed by unrelated data.
    /// Returns the document and the offset one past its `MessageEnd`. Error offsets are
    /// relative to the start of `data`.
    pub(crate) fn parse_prefix(
        data: &[u8],
        offset: usize,
        config: ParserConfig,
    ) -> Result<(Document, usize)> {
        if offset >= data.len() {
            return Err(Error::Empty);
        }

        let mut decoder = RecordDecoder::at(data, offset, config)?;
        let header = decoder.read_header()?;

        let mut records = Vec::new();
        loop {
            let record = decoder.read_record(records.len())?;
            let done = record.is_message_end();
            records.push(record);
            if done {
                break;
            }
        }

        let end = decoder.pos();
        let document = Document {
            header,
            records,
            references: decoder.into_references(),
        };

        if config.verify_references {
            document.check_references()?;
        }

        debug!(
            "Parsed document: {} records, {} object ids, {} bytes",
            document.records.len(),
            document.references.len(),
            end - offset
        );

        Ok((document, end))
    }

    /// Encode the document. Every length is recomputed from the current contents.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a record became internally inconsistent.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::with_capacity(1024);
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Encode the document into an existing writer.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a record became internally inconsistent.
    pub fn write(&self, writer: &mut Writer) -> Result<()> {
        write_header(writer, &self.header);
        for record in &self.records {
            write_record(writer, record)?;
        }
        Ok(())
    }

    /// The stream header.
    #[must_use]
    pub fn header(&self) -> &SerializationHeader {
        &self.header
    }

    /// All top-level records in stream order, `MessageEnd` included.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to the records, for targeted edits that keep object ids intact.
    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// The object id table built while decoding.
    #[must_use]
    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }

    /// Number of top-level records, `MessageEnd` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the document has no records. Never the case for a parsed document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if the last record is `MessageEnd`.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.records.last().is_some_and(Record::is_message_end)
    }

    /// The record defining `object_id`, top-level or nested.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedReference`] if no record defines the id.
    pub fn resolve(&self, object_id: i32) -> Result<&Record> {
        let location = self.references.locate(object_id)?;
        self.record_at(location)
            .ok_or(Error::UnresolvedReference { object_id })
    }

    /// The record stored at `location`.
    #[must_use]
    pub fn record_at(&self, location: &RecordLocation) -> Option<&Record> {
        let mut record = self.records.get(location.record_index)?;
        for member_index in &location.path {
            record = match record.members()?.get(*member_index)? {
                MemberValue::Record(nested) => nested.as_ref(),
                MemberValue::Primitive(_) => return None,
            };
        }
        Some(record)
    }

    /// Verify that every `MemberReference` in the document, nested ones included, resolves.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedReference`] naming a dangling id.
    pub fn check_references(&self) -> Result<()> {
        let mut pending: Vec<&Record> = self.records.iter().collect();

        while let Some(record) = pending.pop() {
            match record {
                Record::MemberReference(reference) => {
                    self.references.locate(reference.id_ref)?;
                }
                Record::ClassWithId(class) => {
                    self.references.locate(class.metadata_id)?;
                    pending.extend(class.values.iter().filter_map(MemberValue::as_record));
                }
                Record::ClassWithMembersAndTypes(class) => {
                    pending.extend(class.values.iter().filter_map(MemberValue::as_record));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

//! Tagged record decoder.
//!
//! [`RecordDecoder`] is a state machine driven by the record tag: it reads one discriminant
//! byte, consumes exactly the wire layout of that variant and returns the owned [`Record`].
//! Class members that are not primitives are complete records themselves and are decoded
//! recursively through the same entry point, bounded by
//! [`ParserConfig::max_nesting_depth`](crate::ParserConfig::max_nesting_depth).
//!
//! While decoding, the decoder maintains two tables:
//! - the class schemas seen so far, keyed by the object id of their defining record, which
//!   `ClassWithId` records borrow to decode their members
//! - the [`ReferenceTable`] of every object id and where its record lives
//!
//! A class defining record is registered as soon as its metadata is known, before its members
//! are decoded, so members may refer back to their enclosing object. Strings, arrays and
//! `ClassWithId` instances are registered once fully decoded. `MemberReference` records are
//! not resolved here; resolution happens on use.

use std::{collections::HashMap, sync::Arc};

use log::{trace, warn};

use crate::{
    binaryformat::{
        primitive::{read_primitive, read_primitives},
        ArraySinglePrimitive, ArraySingleString, BinaryArray, BinaryArrayType,
        BinaryLibrary, BinaryObjectString, BinaryType, ClassSchema, ClassWithId,
        ClassWithMembersAndTypes, MemberReference, MemberType, MemberValue, PrimitiveType, Record,
        RecordLocation, RecordType, ReferenceTable, SerializationHeader,
    },
    config::ParserConfig,
    file::Parser,
    Error, Result,
};

/// Decoder for the records of one object-graph stream.
pub struct RecordDecoder<'a> {
    parser: Parser<'a>,
    config: ParserConfig,
    schemas: HashMap<i32, Arc<ClassSchema>>,
    references: ReferenceTable,
    depth: usize,
}

impl<'a> RecordDecoder<'a> {
    /// Create a decoder positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8], config: ParserConfig) -> Self {
        RecordDecoder {
            parser: Parser::new(data),
            config,
            schemas: HashMap::new(),
            references: ReferenceTable::new(),
            depth: 0,
        }
    }

    /// Create a decoder positioned at `offset` of `data`, for streams embedded in a larger
    /// buffer. Reported offsets stay relative to the start of `data`.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if `offset` lies past the end of `data`.
    pub fn at(data: &'a [u8], offset: usize, config: ParserConfig) -> Result<Self> {
        let mut decoder = Self::new(data, config);
        decoder.parser.seek(offset)?;
        Ok(decoder)
    }

    /// Current offset into the stream.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.parser.pos()
    }

    /// Number of bytes not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.parser.remaining()
    }

    /// The table of object ids registered so far.
    #[must_use]
    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }

    /// Give up the decoder, keeping the reference table it built.
    #[must_use]
    pub fn into_references(self) -> ReferenceTable {
        self.references
    }

    /// Read the `SerializedStreamHeader` opening the stream.
    ///
    /// # Errors
    /// Returns [`Error::NotBinaryStream`] if the first byte is not the header tag and
    /// [`Error::UnexpectedEof`] if the header is truncated.
    pub fn read_header(&mut self) -> Result<SerializationHeader> {
        let tag = self.parser.peek_byte()?;
        if tag != RecordType::SerializedStreamHeader.tag() {
            return Err(Error::NotBinaryStream { found: tag });
        }
        self.parser.advance_by(1)?;

        Ok(SerializationHeader {
            root_id: self.parser.read_le::<i32>()?,
            header_id: self.parser.read_le::<i32>()?,
            major_version: self.parser.read_le::<i32>()?,
            minor_version: self.parser.read_le::<i32>()?,
        })
    }

    /// Decode the next record as element `record_index` of the record sequence.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRecordType`] or [`Error::UnsupportedVariant`] for tags this
    /// decoder cannot handle, [`Error::UnexpectedEof`] for truncated input and
    /// [`Error::UnresolvedReference`] for `ClassWithId` records whose class is unknown.
    pub fn read_record(&mut self, record_index: usize) -> Result<Record> {
        self.depth = 0;
        self.decode(RecordLocation::top_level(record_index))
    }

    fn decode(&mut self, location: RecordLocation) -> Result<Record> {
        let offset = self.parser.pos();
        let tag = self.parser.read_le::<u8>()?;

        let Some(record_type) = RecordType::from_tag(tag) else {
            return Err(Error::UnknownRecordType { tag, offset });
        };
        if !record_type.is_supported() {
            return Err(Error::UnsupportedVariant {
                record_type,
                offset,
            });
        }

        trace!(
            "{:?} at offset {} (record {}, path {:?})",
            record_type,
            offset,
            location.record_index,
            location.path
        );

        let record = match record_type {
            RecordType::ClassWithId => {
                let object_id = self.parser.read_le::<i32>()?;
                let metadata_id = self.parser.read_le::<i32>()?;
                let schema = self
                    .schemas
                    .get(&metadata_id)
                    .cloned()
                    .ok_or(Error::UnresolvedReference {
                        object_id: metadata_id,
                    })?;

                let values = self.read_members(&schema, &location)?;
                self.register(object_id, location);

                Record::ClassWithId(ClassWithId {
                    object_id,
                    metadata_id,
                    schema,
                    values,
                })
            }
            RecordType::ClassWithMembersAndTypes => {
                let schema = ClassSchema::read(&mut self.parser)?;
                let library_id = self.parser.read_le::<i32>()?;

                let object_id = schema.class_info.object_id;
                self.schemas.insert(object_id, Arc::clone(&schema));
                self.register(object_id, location.clone());

                let values = self.read_members(&schema, &location)?;

                Record::ClassWithMembersAndTypes(ClassWithMembersAndTypes {
                    schema,
                    library_id,
                    values,
                })
            }
            RecordType::BinaryObjectString => {
                let object_id = self.parser.read_le::<i32>()?;
                let value = self.parser.read_prefixed_string_utf8()?;
                self.register(object_id, location);

                Record::BinaryObjectString(BinaryObjectString { object_id, value })
            }
            RecordType::BinaryArray => {
                let array = self.read_binary_array(offset)?;
                self.register(array.object_id, location);

                Record::BinaryArray(array)
            }
            RecordType::MemberReference => Record::MemberReference(MemberReference {
                id_ref: self.parser.read_le::<i32>()?,
            }),
            RecordType::ObjectNull => Record::ObjectNull,
            RecordType::MessageEnd => Record::MessageEnd,
            RecordType::BinaryLibrary => Record::BinaryLibrary(BinaryLibrary {
                library_id: self.parser.read_le::<i32>()?,
                name: self.parser.read_prefixed_string_utf8()?,
            }),
            RecordType::ArraySinglePrimitive => {
                let object_id = self.parser.read_le::<i32>()?;
                let length = self.read_length()?;
                let primitive_type = PrimitiveType::read(&mut self.parser)?;
                let values = read_primitives(&mut self.parser, primitive_type, length)?;
                self.register(object_id, location);

                Record::ArraySinglePrimitive(ArraySinglePrimitive {
                    object_id,
                    primitive_type,
                    values,
                })
            }
            RecordType::ArraySingleString => {
                let object_id = self.parser.read_le::<i32>()?;
                let length = self.parser.read_le::<i32>()?;
                if length < 0 {
                    return Err(malformed_error!(
                        "Negative string array length {} at offset {}",
                        length,
                        offset
                    ));
                }
                self.register(object_id, location);

                Record::ArraySingleString(ArraySingleString { object_id, length })
            }
            RecordType::SerializedStreamHeader => {
                return Err(malformed_error!(
                    "Stream header at offset {} inside the record sequence",
                    offset
                ))
            }
            _ => {
                return Err(Error::UnsupportedVariant {
                    record_type,
                    offset,
                })
            }
        };

        Ok(record)
    }

    fn read_members(
        &mut self,
        schema: &ClassSchema,
        location: &RecordLocation,
    ) -> Result<Vec<MemberValue>> {
        let mut values = Vec::with_capacity(schema.member_count());

        for (index, member_type) in schema.member_type_info.member_types.iter().enumerate() {
            let value = match member_type {
                MemberType::Primitive(kind) => {
                    MemberValue::Primitive(read_primitive(&mut self.parser, *kind)?)
                }
                _ => {
                    let mut path = location.path.clone();
                    path.push(index);
                    let nested = RecordLocation {
                        record_index: location.record_index,
                        path,
                    };

                    let offset = self.parser.pos();
                    let record = self.decode_nested(nested)?;
                    if record.is_message_end() {
                        return Err(malformed_error!(
                            "MessageEnd at offset {} used as value of member '{}' of '{}'",
                            offset,
                            schema.class_info.member_names[index],
                            schema.name()
                        ));
                    }

                    MemberValue::Record(Box::new(record))
                }
            };
            values.push(value);
        }

        Ok(values)
    }

    fn decode_nested(&mut self, location: RecordLocation) -> Result<Record> {
        if self.depth >= self.config.max_nesting_depth {
            return Err(Error::RecursionLimit(self.config.max_nesting_depth));
        }

        self.depth += 1;
        let record = self.decode(location);
        self.depth -= 1;
        record
    }

    fn read_binary_array(&mut self, offset: usize) -> Result<BinaryArray> {
        let object_id = self.parser.read_le::<i32>()?;
        let array_type = BinaryArrayType::read(&mut self.parser)?;
        if !matches!(
            array_type,
            BinaryArrayType::Single | BinaryArrayType::SingleOffset
        ) {
            return Err(Error::UnsupportedVariant {
                record_type: RecordType::BinaryArray,
                offset,
            });
        }

        let rank = self.parser.read_le::<i32>()?;
        if rank != 1 {
            return Err(malformed_error!(
                "{:?} array at offset {} with rank {}",
                array_type,
                offset,
                rank
            ));
        }

        let length = self.read_length()?;
        let lower_bounds = if array_type.has_lower_bounds() {
            vec![self.parser.read_le::<i32>()?]
        } else {
            Vec::new()
        };

        let binary_type = BinaryType::read(&mut self.parser)?;
        let element_type = MemberType::read_additional(&mut self.parser, binary_type)?;

        let values = match element_type {
            MemberType::Primitive(kind) => read_primitives(&mut self.parser, kind, length)?,
            _ => Vec::new(),
        };

        Ok(BinaryArray {
            object_id,
            array_type,
            lengths: vec![length as i32],
            lower_bounds,
            element_type,
            values,
        })
    }

    fn read_length(&mut self) -> Result<usize> {
        let offset = self.parser.pos();
        let length = self.parser.read_le::<i32>()?;
        usize::try_from(length)
            .map_err(|_| malformed_error!("Negative array length {} at offset {}", length, offset))
    }

    fn register(&mut self, object_id: i32, location: RecordLocation) {
        if let Some(previous) = self.references.register(object_id, location) {
            warn!(
                "Object id {} redefined, previous definition in record {}",
                object_id, previous.record_index
            );
        }
    }
}

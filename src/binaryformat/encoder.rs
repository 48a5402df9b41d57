//! Record encoder.
//!
//! Mirrors [`crate::binaryformat::decoder`] field for field. Counts, lengths and ranks are
//! derived from the record contents at write time. Records whose contents contradict their own
//! metadata (a value count differing from the member count, a primitive of the wrong kind) are
//! rejected instead of producing a stream that cannot be read back.

use crate::{
    binaryformat::{
        class::count_u32, primitive::write_primitive, BinaryArray, ClassSchema, MemberType,
        MemberValue, PrimitiveType, PrimitiveValue, Record, RecordType, SerializationHeader,
    },
    file::Writer,
    Result,
};

/// Write the `SerializedStreamHeader`.
pub fn write_header(writer: &mut Writer, header: &SerializationHeader) {
    writer.write_le(RecordType::SerializedStreamHeader.tag());
    writer.write_le(header.root_id);
    writer.write_le(header.header_id);
    writer.write_le(header.major_version);
    writer.write_le(header.minor_version);
}

/// Write one record, including all records nested in its members.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the record is internally inconsistent or a length
/// cannot be encoded.
pub fn write_record(writer: &mut Writer, record: &Record) -> Result<()> {
    writer.write_le(record.record_type().tag());

    match record {
        Record::ClassWithId(record) => {
            writer.write_le(record.object_id);
            writer.write_le(record.metadata_id);
            write_members(writer, &record.schema, &record.values)?;
        }
        Record::ClassWithMembersAndTypes(record) => {
            record.schema.write(writer)?;
            writer.write_le(record.library_id);
            write_members(writer, &record.schema, &record.values)?;
        }
        Record::BinaryObjectString(record) => {
            writer.write_le(record.object_id);
            writer.write_prefixed_string_utf8(&record.value)?;
        }
        Record::BinaryArray(record) => write_binary_array(writer, record)?,
        Record::MemberReference(record) => writer.write_le(record.id_ref),
        Record::ObjectNull | Record::MessageEnd => {}
        Record::BinaryLibrary(record) => {
            writer.write_le(record.library_id);
            writer.write_prefixed_string_utf8(&record.name)?;
        }
        Record::ArraySinglePrimitive(record) => {
            writer.write_le(record.object_id);
            writer.write_le(length_i32(record.values.len())?);
            writer.write_le(record.primitive_type.to_byte());
            write_primitive_values(writer, record.primitive_type, &record.values)?;
        }
        Record::ArraySingleString(record) => {
            writer.write_le(record.object_id);
            writer.write_le(record.length);
        }
    }

    Ok(())
}

fn write_members(writer: &mut Writer, schema: &ClassSchema, values: &[MemberValue]) -> Result<()> {
    if values.len() != schema.member_count() {
        return Err(malformed_error!(
            "Instance of '{}' holds {} values for {} members",
            schema.name(),
            values.len(),
            schema.member_count()
        ));
    }

    for ((name, member_type), value) in schema.members().zip(values) {
        match (member_type, value) {
            (MemberType::Primitive(kind), MemberValue::Primitive(primitive))
                if primitive.primitive_type() == *kind =>
            {
                write_primitive(writer, primitive);
            }
            (MemberType::Primitive(_), _) | (_, MemberValue::Primitive(_)) => {
                return Err(malformed_error!(
                    "Value of member '{}' of '{}' does not match its declared type {:?}",
                    name,
                    schema.name(),
                    member_type
                ));
            }
            (_, MemberValue::Record(record)) => write_record(writer, record)?,
        }
    }

    Ok(())
}

fn write_binary_array(writer: &mut Writer, array: &BinaryArray) -> Result<()> {
    let rank = array.lengths.len();
    let expected_bounds = if array.array_type.has_lower_bounds() {
        rank
    } else {
        0
    };
    if array.lower_bounds.len() != expected_bounds {
        return Err(malformed_error!(
            "{:?} array {} has {} lower bounds for rank {}",
            array.array_type,
            array.object_id,
            array.lower_bounds.len(),
            rank
        ));
    }

    writer.write_le(array.object_id);
    writer.write_le(array.array_type.to_byte());
    writer.write_le(length_i32(rank)?);
    for length in &array.lengths {
        writer.write_le(*length);
    }
    for bound in &array.lower_bounds {
        writer.write_le(*bound);
    }
    writer.write_le(array.element_type.binary_type().to_byte());
    array.element_type.write_additional(writer)?;

    match array.element_type {
        MemberType::Primitive(kind) => {
            if array.values.len() != array.element_count() {
                return Err(malformed_error!(
                    "Array {} holds {} values for {} elements",
                    array.object_id,
                    array.values.len(),
                    array.element_count()
                ));
            }
            write_primitive_values(writer, kind, &array.values)
        }
        _ if !array.values.is_empty() => Err(malformed_error!(
            "Array {} of {:?} carries inline values",
            array.object_id,
            array.element_type
        )),
        _ => Ok(()),
    }
}

fn write_primitive_values(
    writer: &mut Writer,
    kind: PrimitiveType,
    values: &[PrimitiveValue],
) -> Result<()> {
    for value in values {
        if value.primitive_type() != kind {
            return Err(malformed_error!(
                "{:?} value in an array of {:?}",
                value.primitive_type(),
                kind
            ));
        }
        write_primitive(writer, value);
    }
    Ok(())
}

fn length_i32(length: usize) -> Result<i32> {
    i32::try_from(count_u32(length)?).map_err(|_| malformed_error!("Length {} exceeds i32", length))
}

//! Fixed-width scalar values.
//!
//! Primitive members of class records and the elements of primitive arrays are stored inline
//! without a record tag. Their width is implied by the [`PrimitiveType`] declared in the class
//! or array metadata. Kinds without a fixed-width encoding (`Decimal`, `TimeSpan`, `DateTime`,
//! `Null` and `String`) are rejected with [`Error::UnsupportedPrimitive`]; strings travel as
//! [`crate::binaryformat::BinaryObjectString`] records instead.

use crate::{
    binaryformat::PrimitiveType,
    file::{Parser, Writer},
    Error, Result,
};

/// A decoded primitive value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(u8),
    /// Single byte, as written by the game's serializer.
    Char(u8),
    Double(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    SByte(i8),
    Single(f32),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
}

impl PrimitiveValue {
    /// The kind of this value.
    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveType::Boolean,
            PrimitiveValue::Byte(_) => PrimitiveType::Byte,
            PrimitiveValue::Char(_) => PrimitiveType::Char,
            PrimitiveValue::Double(_) => PrimitiveType::Double,
            PrimitiveValue::Int16(_) => PrimitiveType::Int16,
            PrimitiveValue::Int32(_) => PrimitiveType::Int32,
            PrimitiveValue::Int64(_) => PrimitiveType::Int64,
            PrimitiveValue::SByte(_) => PrimitiveType::SByte,
            PrimitiveValue::Single(_) => PrimitiveType::Single,
            PrimitiveValue::UInt16(_) => PrimitiveType::UInt16,
            PrimitiveValue::UInt32(_) => PrimitiveType::UInt32,
            PrimitiveValue::UInt64(_) => PrimitiveType::UInt64,
        }
    }

    /// Render the value for structural dumps.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match *self {
            PrimitiveValue::Boolean(value) => value.into(),
            PrimitiveValue::Byte(value) => value.into(),
            PrimitiveValue::Char(value) => char::from(value).to_string().into(),
            PrimitiveValue::Double(value) => value.into(),
            PrimitiveValue::Int16(value) => value.into(),
            PrimitiveValue::Int32(value) => value.into(),
            PrimitiveValue::Int64(value) => value.into(),
            PrimitiveValue::SByte(value) => value.into(),
            PrimitiveValue::Single(value) => value.into(),
            PrimitiveValue::UInt16(value) => value.into(),
            PrimitiveValue::UInt32(value) => value.into(),
            PrimitiveValue::UInt64(value) => value.into(),
        }
    }
}

/// Read one inline value of the given kind.
///
/// # Errors
/// Returns [`Error::UnsupportedPrimitive`] for kinds without a fixed-width encoding and
/// [`Error::UnexpectedEof`] if the value is truncated.
pub fn read_primitive(parser: &mut Parser, kind: PrimitiveType) -> Result<PrimitiveValue> {
    Ok(match kind {
        PrimitiveType::Boolean => PrimitiveValue::Boolean(parser.read_le::<u8>()? != 0),
        PrimitiveType::Byte => PrimitiveValue::Byte(parser.read_le::<u8>()?),
        PrimitiveType::Char => PrimitiveValue::Char(parser.read_le::<u8>()?),
        PrimitiveType::Double => PrimitiveValue::Double(parser.read_le::<f64>()?),
        PrimitiveType::Int16 => PrimitiveValue::Int16(parser.read_le::<i16>()?),
        PrimitiveType::Int32 => PrimitiveValue::Int32(parser.read_le::<i32>()?),
        PrimitiveType::Int64 => PrimitiveValue::Int64(parser.read_le::<i64>()?),
        PrimitiveType::SByte => PrimitiveValue::SByte(parser.read_le::<i8>()?),
        PrimitiveType::Single => PrimitiveValue::Single(parser.read_le::<f32>()?),
        PrimitiveType::UInt16 => PrimitiveValue::UInt16(parser.read_le::<u16>()?),
        PrimitiveType::UInt32 => PrimitiveValue::UInt32(parser.read_le::<u32>()?),
        PrimitiveType::UInt64 => PrimitiveValue::UInt64(parser.read_le::<u64>()?),
        PrimitiveType::Decimal
        | PrimitiveType::TimeSpan
        | PrimitiveType::DateTime
        | PrimitiveType::Null
        | PrimitiveType::String => {
            return Err(Error::UnsupportedPrimitive {
                primitive_type: kind,
                offset: parser.pos(),
            })
        }
    })
}

/// Read `count` values of one kind, as stored by primitive arrays.
///
/// # Errors
/// See [`read_primitive`]. The data is checked to hold all values before any is decoded.
pub fn read_primitives(
    parser: &mut Parser,
    kind: PrimitiveType,
    count: usize,
) -> Result<Vec<PrimitiveValue>> {
    let Some(size) = kind.size() else {
        return Err(Error::UnsupportedPrimitive {
            primitive_type: kind,
            offset: parser.pos(),
        });
    };

    // Reject absurd lengths before allocating for them
    match count.checked_mul(size) {
        Some(needed) if needed <= parser.remaining() => {}
        _ => {
            return Err(Error::UnexpectedEof {
                offset: parser.pos(),
                needed: count.saturating_mul(size),
            })
        }
    }

    (0..count).map(|_| read_primitive(parser, kind)).collect()
}

/// Write one inline value.
pub fn write_primitive(writer: &mut Writer, value: &PrimitiveValue) {
    match *value {
        PrimitiveValue::Boolean(value) => writer.write_le::<u8>(u8::from(value)),
        PrimitiveValue::Byte(value) | PrimitiveValue::Char(value) => writer.write_le(value),
        PrimitiveValue::Double(value) => writer.write_le(value),
        PrimitiveValue::Int16(value) => writer.write_le(value),
        PrimitiveValue::Int32(value) => writer.write_le(value),
        PrimitiveValue::Int64(value) => writer.write_le(value),
        PrimitiveValue::SByte(value) => writer.write_le(value),
        PrimitiveValue::Single(value) => writer.write_le(value),
        PrimitiveValue::UInt16(value) => writer.write_le(value),
        PrimitiveValue::UInt32(value) => writer.write_le(value),
        PrimitiveValue::UInt64(value) => writer.write_le(value),
    }
}

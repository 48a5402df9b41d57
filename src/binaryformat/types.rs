//! Discriminant enums of the binary object format.
//!
//! Every structure in the stream is introduced by a one-byte tag: records by a [`RecordType`],
//! member descriptors by a [`BinaryType`], primitive values by a [`PrimitiveType`] and
//! multi-dimensional arrays by a [`BinaryArrayType`]. The numeric values are fixed by the wire
//! format.

use strum::{EnumCount, EnumIter};

use crate::{file::Parser, Result};

/// Record discriminant. Values 18 to 20 are not assigned.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
#[allow(missing_docs)]
pub enum RecordType {
    SerializedStreamHeader = 0,
    ClassWithId = 1,
    SystemClassWithMembers = 2,
    ClassWithMembers = 3,
    SystemClassWithMembersAndTypes = 4,
    ClassWithMembersAndTypes = 5,
    BinaryObjectString = 6,
    BinaryArray = 7,
    MemberPrimitiveTyped = 8,
    MemberReference = 9,
    ObjectNull = 10,
    MessageEnd = 11,
    BinaryLibrary = 12,
    ObjectNullMultiple256 = 13,
    ObjectNullMultiple = 14,
    ArraySinglePrimitive = 15,
    ArraySingleObject = 16,
    ArraySingleString = 17,
    MethodCall = 21,
    MethodReturn = 22,
}

impl RecordType {
    /// Map a raw tag to its record type, `None` for values outside the format.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<RecordType> {
        Some(match tag {
            0 => RecordType::SerializedStreamHeader,
            1 => RecordType::ClassWithId,
            2 => RecordType::SystemClassWithMembers,
            3 => RecordType::ClassWithMembers,
            4 => RecordType::SystemClassWithMembersAndTypes,
            5 => RecordType::ClassWithMembersAndTypes,
            6 => RecordType::BinaryObjectString,
            7 => RecordType::BinaryArray,
            8 => RecordType::MemberPrimitiveTyped,
            9 => RecordType::MemberReference,
            10 => RecordType::ObjectNull,
            11 => RecordType::MessageEnd,
            12 => RecordType::BinaryLibrary,
            13 => RecordType::ObjectNullMultiple256,
            14 => RecordType::ObjectNullMultiple,
            15 => RecordType::ArraySinglePrimitive,
            16 => RecordType::ArraySingleObject,
            17 => RecordType::ArraySingleString,
            21 => RecordType::MethodCall,
            22 => RecordType::MethodReturn,
            _ => return None,
        })
    }

    /// The wire tag.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns true for the record kinds this library decodes and encodes.
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            RecordType::SerializedStreamHeader
                | RecordType::ClassWithId
                | RecordType::ClassWithMembersAndTypes
                | RecordType::BinaryObjectString
                | RecordType::BinaryArray
                | RecordType::MemberReference
                | RecordType::ObjectNull
                | RecordType::MessageEnd
                | RecordType::BinaryLibrary
                | RecordType::ArraySinglePrimitive
                | RecordType::ArraySingleString
        )
    }
}

/// Scalar kinds of the format. Value 4 is not assigned.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
#[allow(missing_docs)]
pub enum PrimitiveType {
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Decimal = 5,
    Double = 6,
    Int16 = 7,
    Int32 = 8,
    Int64 = 9,
    SByte = 10,
    Single = 11,
    TimeSpan = 12,
    DateTime = 13,
    UInt16 = 14,
    UInt32 = 15,
    UInt64 = 16,
    Null = 17,
    String = 18,
}

impl PrimitiveType {
    /// Map a raw type byte to its primitive type, `None` for unassigned values.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<PrimitiveType> {
        Some(match byte {
            1 => PrimitiveType::Boolean,
            2 => PrimitiveType::Byte,
            3 => PrimitiveType::Char,
            5 => PrimitiveType::Decimal,
            6 => PrimitiveType::Double,
            7 => PrimitiveType::Int16,
            8 => PrimitiveType::Int32,
            9 => PrimitiveType::Int64,
            10 => PrimitiveType::SByte,
            11 => PrimitiveType::Single,
            12 => PrimitiveType::TimeSpan,
            13 => PrimitiveType::DateTime,
            14 => PrimitiveType::UInt16,
            15 => PrimitiveType::UInt32,
            16 => PrimitiveType::UInt64,
            17 => PrimitiveType::Null,
            18 => PrimitiveType::String,
            _ => return None,
        })
    }

    /// Read a primitive type byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] naming the offset of an unassigned value and
    /// [`crate::Error::UnexpectedEof`] at the end of the data.
    pub fn read(parser: &mut Parser) -> Result<PrimitiveType> {
        let offset = parser.pos();
        let byte = parser.read_le::<u8>()?;
        Self::from_byte(byte).ok_or_else(|| {
            malformed_error!("Invalid primitive type {} at offset {}", byte, offset)
        })
    }

    /// The wire value.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Encoded width in bytes, `None` for kinds without a fixed-width encoding.
    #[must_use]
    pub fn size(self) -> Option<usize> {
        match self {
            PrimitiveType::Boolean
            | PrimitiveType::Byte
            | PrimitiveType::Char
            | PrimitiveType::SByte => Some(1),
            PrimitiveType::Int16 | PrimitiveType::UInt16 => Some(2),
            PrimitiveType::Int32 | PrimitiveType::UInt32 | PrimitiveType::Single => Some(4),
            PrimitiveType::Int64 | PrimitiveType::UInt64 | PrimitiveType::Double => Some(8),
            PrimitiveType::Decimal
            | PrimitiveType::TimeSpan
            | PrimitiveType::DateTime
            | PrimitiveType::Null
            | PrimitiveType::String => None,
        }
    }
}

/// Member type descriptor of a class record.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryType {
    Primitive = 0,
    String = 1,
    Object = 2,
    SystemClass = 3,
    Class = 4,
    ObjectArray = 5,
    StringArray = 6,
    PrimitiveArray = 7,
}

impl BinaryType {
    /// Map a raw type byte to its binary type, `None` for values above 7.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<BinaryType> {
        Some(match byte {
            0 => BinaryType::Primitive,
            1 => BinaryType::String,
            2 => BinaryType::Object,
            3 => BinaryType::SystemClass,
            4 => BinaryType::Class,
            5 => BinaryType::ObjectArray,
            6 => BinaryType::StringArray,
            7 => BinaryType::PrimitiveArray,
            _ => return None,
        })
    }

    /// Read a binary type byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] naming the offset of an invalid value and
    /// [`crate::Error::UnexpectedEof`] at the end of the data.
    pub fn read(parser: &mut Parser) -> Result<BinaryType> {
        let offset = parser.pos();
        let byte = parser.read_le::<u8>()?;
        Self::from_byte(byte).ok_or_else(|| invalid_binary_type(byte, offset))
    }

    /// The wire value.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Shape of a [`crate::binaryformat::BinaryArray`].
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryArrayType {
    Single = 0,
    Jagged = 1,
    Rectangular = 2,
    SingleOffset = 3,
    JaggedOffset = 4,
    RectangularOffset = 5,
}

impl BinaryArrayType {
    /// Map a raw byte to its array type, `None` for values above 5.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<BinaryArrayType> {
        Some(match byte {
            0 => BinaryArrayType::Single,
            1 => BinaryArrayType::Jagged,
            2 => BinaryArrayType::Rectangular,
            3 => BinaryArrayType::SingleOffset,
            4 => BinaryArrayType::JaggedOffset,
            5 => BinaryArrayType::RectangularOffset,
            _ => return None,
        })
    }

    /// Read an array type byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] naming the offset of an invalid value and
    /// [`crate::Error::UnexpectedEof`] at the end of the data.
    pub fn read(parser: &mut Parser) -> Result<BinaryArrayType> {
        let offset = parser.pos();
        let byte = parser.read_le::<u8>()?;
        Self::from_byte(byte).ok_or_else(|| {
            malformed_error!("Invalid binary array type {} at offset {}", byte, offset)
        })
    }

    /// The wire value.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true for the kinds that carry per-dimension lower bounds.
    #[must_use]
    pub fn has_lower_bounds(self) -> bool {
        matches!(
            self,
            BinaryArrayType::SingleOffset
                | BinaryArrayType::JaggedOffset
                | BinaryArrayType::RectangularOffset
        )
    }
}

pub(crate) fn invalid_binary_type(byte: u8, offset: usize) -> crate::Error {
    malformed_error!("Invalid binary type {} at offset {}", byte, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn record_type_tags() {
        for record_type in RecordType::iter() {
            assert_eq!(RecordType::from_tag(record_type.tag()), Some(record_type));
        }
        assert_eq!(RecordType::COUNT, 20);

        for tag in [18u8, 19, 20, 23, 0xFF] {
            assert_eq!(RecordType::from_tag(tag), None);
        }
    }

    #[test]
    fn record_type_support() {
        let supported: Vec<u8> = RecordType::iter()
            .filter(|r| r.is_supported())
            .map(RecordType::tag)
            .collect();
        assert_eq!(supported, vec![0, 1, 5, 6, 7, 9, 10, 11, 12, 15, 17]);
    }

    #[test]
    fn primitive_type_bytes() {
        for primitive in PrimitiveType::iter() {
            assert_eq!(PrimitiveType::from_byte(primitive.to_byte()), Some(primitive));
        }
        assert_eq!(PrimitiveType::from_byte(0), None);
        assert_eq!(PrimitiveType::from_byte(4), None);
        assert_eq!(PrimitiveType::from_byte(19), None);

        assert_eq!(PrimitiveType::Char.size(), Some(1));
        assert_eq!(PrimitiveType::Single.size(), Some(4));
        assert_eq!(PrimitiveType::UInt64.size(), Some(8));
        assert_eq!(PrimitiveType::Decimal.size(), None);
        assert_eq!(PrimitiveType::String.size(), None);
    }

    #[test]
    fn binary_type_bytes() {
        for binary_type in BinaryType::iter() {
            assert_eq!(BinaryType::from_byte(binary_type.to_byte()), Some(binary_type));
        }
        assert_eq!(BinaryType::from_byte(8), None);

        for array_type in BinaryArrayType::iter() {
            assert_eq!(BinaryArrayType::from_byte(array_type.to_byte()), Some(array_type));
        }
        assert_eq!(BinaryArrayType::from_byte(6), None);
        assert!(BinaryArrayType::SingleOffset.has_lower_bounds());
        assert!(!BinaryArrayType::Jagged.has_lower_bounds());
    }

    #[test]
    fn invalid_bytes_report_offset() {
        let data = [0x08, 0x04, 0x09, 0x07];

        let mut parser = Parser::new(&data);
        assert_eq!(PrimitiveType::read(&mut parser).unwrap(), PrimitiveType::Int32);
        assert!(matches!(
            PrimitiveType::read(&mut parser),
            Err(crate::Error::Malformed { message, .. }) if message.contains("at offset 1")
        ));

        let mut parser = Parser::new(&data);
        parser.seek(2).unwrap();
        assert!(matches!(
            BinaryType::read(&mut parser),
            Err(crate::Error::Malformed { message, .. }) if message.contains("at offset 2")
        ));
        assert!(matches!(
            BinaryArrayType::read(&mut parser),
            Err(crate::Error::Malformed { message, .. }) if message.contains("at offset 3")
        ));
        assert!(matches!(
            PrimitiveType::read(&mut parser),
            Err(crate::Error::UnexpectedEof { offset: 4, .. })
        ));
    }
}

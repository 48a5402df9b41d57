//! Record variants of the binary object format.
//!
//! [`Record`] is a closed sum over the record kinds this library decodes. Every variant owns
//! its data; relations to other records are expressed through object ids resolved by the
//! [`crate::binaryformat::ReferenceTable`]. Derived values such as string lengths, member
//! counts, ranks and array lengths are not stored and are recomputed on every write, with the
//! exception of [`ArraySingleString::length`] whose elements live outside the record.

use std::sync::Arc;

use crate::binaryformat::{
    BinaryArrayType, ClassSchema, MemberType, PrimitiveType, PrimitiveValue, RecordType,
};

/// Stream header preceding the first record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerializationHeader {
    /// Object id of the graph root
    pub root_id: i32,
    /// Id of the header object, `-1` when there is none
    pub header_id: i32,
    /// Major format version
    pub major_version: i32,
    /// Minor format version
    pub minor_version: i32,
}

/// Instance of a class whose schema was defined by an earlier record.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassWithId {
    /// Id of this instance
    pub object_id: i32,
    /// Object id of the record that defined the class
    pub metadata_id: i32,
    /// Schema shared with the defining record; not part of the wire layout
    pub schema: Arc<ClassSchema>,
    /// Member values in declaration order
    pub values: Vec<MemberValue>,
}

/// Class definition together with its first instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassWithMembersAndTypes {
    /// Class layout; `schema.class_info.object_id` is the instance id
    pub schema: Arc<ClassSchema>,
    /// Id of the `BinaryLibrary` defining the assembly
    pub library_id: i32,
    /// Member values in declaration order
    pub values: Vec<MemberValue>,
}

/// A string object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryObjectString {
    /// Id of the string
    pub object_id: i32,
    /// Text content
    pub value: String,
}

/// Array with an explicit shape description.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryArray {
    /// Id of the array
    pub object_id: i32,
    /// Shape kind
    pub array_type: BinaryArrayType,
    /// Length of each dimension; the rank is the number of entries
    pub lengths: Vec<i32>,
    /// Lower bound of each dimension, present only for the offset kinds
    pub lower_bounds: Vec<i32>,
    /// Element type descriptor
    pub element_type: MemberType,
    /// Inline elements for primitive element types; other element types follow as records
    pub values: Vec<PrimitiveValue>,
}

impl BinaryArray {
    /// Total number of elements across all dimensions.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.lengths
            .iter()
            .map(|length| usize::try_from(*length).unwrap_or(0))
            .product()
    }
}

/// Reference to an object defined elsewhere in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberReference {
    /// Object id of the referenced record
    pub id_ref: i32,
}

/// Assembly declaration referenced by library ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryLibrary {
    /// Id of the library
    pub library_id: i32,
    /// Assembly name
    pub name: String,
}

/// One-dimensional array of primitive values.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySinglePrimitive {
    /// Id of the array
    pub object_id: i32,
    /// Element kind
    pub primitive_type: PrimitiveType,
    /// Elements; the written length is taken from here
    pub values: Vec<PrimitiveValue>,
}

/// One-dimensional string array header.
///
/// The elements are not part of this record: they follow it as `length` independent top-level
/// records (strings, references or nulls).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArraySingleString {
    /// Id of the array
    pub object_id: i32,
    /// Number of element records following this one
    pub length: i32,
}

/// A member value of a class record.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberValue {
    /// Value of a member declared as primitive, stored inline
    Primitive(PrimitiveValue),
    /// Any other member: a complete nested record
    Record(Box<Record>),
}

impl MemberValue {
    /// The nested record, if this is not a primitive.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            MemberValue::Record(record) => Some(record),
            MemberValue::Primitive(_) => None,
        }
    }

    /// The inline primitive, if any.
    #[must_use]
    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            MemberValue::Primitive(value) => Some(value),
            MemberValue::Record(_) => None,
        }
    }
}

/// A decoded record.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Record {
    ClassWithId(ClassWithId),
    ClassWithMembersAndTypes(ClassWithMembersAndTypes),
    BinaryObjectString(BinaryObjectString),
    BinaryArray(BinaryArray),
    MemberReference(MemberReference),
    ObjectNull,
    MessageEnd,
    BinaryLibrary(BinaryLibrary),
    ArraySinglePrimitive(ArraySinglePrimitive),
    ArraySingleString(ArraySingleString),
}

impl Record {
    /// The discriminant this record is written with.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::ClassWithId(_) => RecordType::ClassWithId,
            Record::ClassWithMembersAndTypes(_) => RecordType::ClassWithMembersAndTypes,
            Record::BinaryObjectString(_) => RecordType::BinaryObjectString,
            Record::BinaryArray(_) => RecordType::BinaryArray,
            Record::MemberReference(_) => RecordType::MemberReference,
            Record::ObjectNull => RecordType::ObjectNull,
            Record::MessageEnd => RecordType::MessageEnd,
            Record::BinaryLibrary(_) => RecordType::BinaryLibrary,
            Record::ArraySinglePrimitive(_) => RecordType::ArraySinglePrimitive,
            Record::ArraySingleString(_) => RecordType::ArraySingleString,
        }
    }

    /// Object id introduced by this record, if it introduces one.
    ///
    /// Library ids live in a separate namespace and are not reported here.
    #[must_use]
    pub fn object_id(&self) -> Option<i32> {
        match self {
            Record::ClassWithId(record) => Some(record.object_id),
            Record::ClassWithMembersAndTypes(record) => Some(record.schema.class_info.object_id),
            Record::BinaryObjectString(record) => Some(record.object_id),
            Record::BinaryArray(record) => Some(record.object_id),
            Record::ArraySinglePrimitive(record) => Some(record.object_id),
            Record::ArraySingleString(record) => Some(record.object_id),
            Record::MemberReference(_)
            | Record::ObjectNull
            | Record::MessageEnd
            | Record::BinaryLibrary(_) => None,
        }
    }

    /// Schema of a class record.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<ClassSchema>> {
        match self {
            Record::ClassWithId(record) => Some(&record.schema),
            Record::ClassWithMembersAndTypes(record) => Some(&record.schema),
            _ => None,
        }
    }

    /// Member values of a class record.
    #[must_use]
    pub fn members(&self) -> Option<&[MemberValue]> {
        match self {
            Record::ClassWithId(record) => Some(&record.values),
            Record::ClassWithMembersAndTypes(record) => Some(&record.values),
            _ => None,
        }
    }

    /// Mutable member values of a class record.
    pub fn members_mut(&mut self) -> Option<&mut Vec<MemberValue>> {
        match self {
            Record::ClassWithId(record) => Some(&mut record.values),
            Record::ClassWithMembersAndTypes(record) => Some(&mut record.values),
            _ => None,
        }
    }

    /// Text of a string record.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Record::BinaryObjectString(record) => Some(&record.value),
            _ => None,
        }
    }

    /// Returns true for the stream terminator.
    #[must_use]
    pub fn is_message_end(&self) -> bool {
        matches!(self, Record::MessageEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binaryformat::{ClassInfo, MemberTypeInfo};

    fn schema() -> Arc<ClassSchema> {
        Arc::new(ClassSchema {
            class_info: ClassInfo {
                object_id: 1,
                name: "Dialog.Line".to_string(),
                member_names: vec!["Id".to_string(), "Text".to_string()],
            },
            member_type_info: MemberTypeInfo {
                member_types: vec![MemberType::Primitive(PrimitiveType::Int32), MemberType::String],
            },
        })
    }

    #[test]
    fn record_accessors() {
        let text = Record::BinaryObjectString(BinaryObjectString {
            object_id: 3,
            value: "hello".to_string(),
        });
        let class = Record::ClassWithMembersAndTypes(ClassWithMembersAndTypes {
            schema: schema(),
            library_id: 2,
            values: vec![
                MemberValue::Primitive(PrimitiveValue::Int32(1)),
                MemberValue::Record(Box::new(text.clone())),
            ],
        });

        assert_eq!(class.record_type(), RecordType::ClassWithMembersAndTypes);
        assert_eq!(class.object_id(), Some(1));
        assert_eq!(class.schema().unwrap().name(), "Dialog.Line");
        let members = class.members().unwrap();
        assert_eq!(members[0].as_primitive(), Some(&PrimitiveValue::Int32(1)));
        assert_eq!(members[1].as_record().unwrap().as_str(), Some("hello"));

        assert_eq!(text.object_id(), Some(3));
        assert!(text.members().is_none());
        assert!(Record::MessageEnd.is_message_end());
        assert_eq!(Record::ObjectNull.object_id(), None);
        assert_eq!(
            Record::BinaryLibrary(BinaryLibrary {
                library_id: 2,
                name: "Lib".to_string()
            })
            .object_id(),
            None
        );
    }

    #[test]
    fn binary_array_element_count() {
        let array = BinaryArray {
            object_id: 9,
            array_type: BinaryArrayType::Single,
            lengths: vec![4],
            lower_bounds: Vec::new(),
            element_type: MemberType::String,
            values: Vec::new(),
        };
        assert_eq!(array.element_count(), 4);
    }
}

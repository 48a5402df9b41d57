//! Class metadata: names, member names and member type descriptors.
//!
//! A `ClassWithMembersAndTypes` record opens with a [`ClassInfo`] followed by a
//! [`MemberTypeInfo`]. The type info is stored in two passes: first one [`BinaryType`] byte per
//! member, then the additional info of every member that needs one, in member order. Reading
//! the two passes interleaved would desynchronize the stream.
//!
//! The decoded pair forms a [`ClassSchema`], shared through an [`Arc`] between the defining
//! record and every `ClassWithId` record that reuses it.

use std::sync::Arc;

use crate::{
    binaryformat::{types::invalid_binary_type, BinaryType, PrimitiveType},
    file::{Parser, Writer},
    Result,
};

/// Object id, name and member names of a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    /// Id of the object introduced together with this class
    pub object_id: i32,
    /// Fully qualified class name
    pub name: String,
    /// Member names, in declaration order
    pub member_names: Vec<String>,
}

impl ClassInfo {
    /// Read a `ClassInfo` structure.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] on truncated input and
    /// [`crate::Error::Malformed`] for invalid strings.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        let object_id = parser.read_le::<i32>()?;
        let name = parser.read_prefixed_string_utf8()?;
        let member_count = parser.read_le::<u32>()?;

        // Every name needs at least its length byte
        if member_count as usize > parser.remaining() {
            return Err(malformed_error!(
                "Class '{}' declares {} members but only {} bytes remain",
                name,
                member_count,
                parser.remaining()
            ));
        }

        let member_names = (0..member_count)
            .map(|_| parser.read_prefixed_string_utf8())
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassInfo {
            object_id,
            name,
            member_names,
        })
    }

    /// Write the structure; the member count is taken from `member_names`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a count or string length cannot be encoded.
    pub fn write(&self, writer: &mut Writer) -> Result<()> {
        writer.write_le(self.object_id);
        writer.write_prefixed_string_utf8(&self.name)?;
        writer.write_le(count_u32(self.member_names.len())?);
        for name in &self.member_names {
            writer.write_prefixed_string_utf8(name)?;
        }
        Ok(())
    }
}

/// Reference to a user class in another library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTypeInfo {
    /// Fully qualified class name
    pub type_name: String,
    /// Id of the `BinaryLibrary` record defining the assembly
    pub library_id: i32,
}

/// Type descriptor of one member: a [`BinaryType`] merged with its additional info.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MemberType {
    /// Inline value of the given kind
    Primitive(PrimitiveType),
    String,
    Object,
    /// Class from the runtime library, identified by name
    SystemClass(String),
    /// User class
    Class(ClassTypeInfo),
    ObjectArray,
    StringArray,
    /// Array of the given primitive kind
    PrimitiveArray(PrimitiveType),
}

impl MemberType {
    /// The [`BinaryType`] tag of this descriptor.
    #[must_use]
    pub fn binary_type(&self) -> BinaryType {
        match self {
            MemberType::Primitive(_) => BinaryType::Primitive,
            MemberType::String => BinaryType::String,
            MemberType::Object => BinaryType::Object,
            MemberType::SystemClass(_) => BinaryType::SystemClass,
            MemberType::Class(_) => BinaryType::Class,
            MemberType::ObjectArray => BinaryType::ObjectArray,
            MemberType::StringArray => BinaryType::StringArray,
            MemberType::PrimitiveArray(_) => BinaryType::PrimitiveArray,
        }
    }

    /// Read the additional info belonging to `binary_type`, nothing for the kinds that carry
    /// none.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] on truncated input and
    /// [`crate::Error::Malformed`] for invalid type bytes or strings.
    pub fn read_additional(parser: &mut Parser, binary_type: BinaryType) -> Result<Self> {
        Ok(match binary_type {
            BinaryType::Primitive => {
                MemberType::Primitive(PrimitiveType::read(parser)?)
            }
            BinaryType::PrimitiveArray => MemberType::PrimitiveArray(PrimitiveType::read(parser)?),
            BinaryType::SystemClass => MemberType::SystemClass(parser.read_prefixed_string_utf8()?),
            BinaryType::Class => MemberType::Class(ClassTypeInfo {
                type_name: parser.read_prefixed_string_utf8()?,
                library_id: parser.read_le::<i32>()?,
            }),
            BinaryType::String => MemberType::String,
            BinaryType::Object => MemberType::Object,
            BinaryType::ObjectArray => MemberType::ObjectArray,
            BinaryType::StringArray => MemberType::StringArray,
        })
    }

    /// Write the additional info of this descriptor, if any.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a string length cannot be encoded.
    pub fn write_additional(&self, writer: &mut Writer) -> Result<()> {
        match self {
            MemberType::Primitive(kind) | MemberType::PrimitiveArray(kind) => {
                writer.write_le(kind.to_byte());
            }
            MemberType::SystemClass(name) => writer.write_prefixed_string_utf8(name)?,
            MemberType::Class(info) => {
                writer.write_prefixed_string_utf8(&info.type_name)?;
                writer.write_le(info.library_id);
            }
            MemberType::String
            | MemberType::Object
            | MemberType::ObjectArray
            | MemberType::StringArray => {}
        }
        Ok(())
    }
}

/// Type descriptors of all members of a class.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MemberTypeInfo {
    /// One descriptor per member, in declaration order
    pub member_types: Vec<MemberType>,
}

impl MemberTypeInfo {
    /// Read the descriptors of `member_count` members.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEof`] on truncated input and
    /// [`crate::Error::Malformed`] for invalid type bytes.
    pub fn read(parser: &mut Parser, member_count: usize) -> Result<Self> {
        let start = parser.pos();
        let binary_types = parser
            .read_bytes(member_count)?
            .iter()
            .enumerate()
            .map(|(index, byte)| {
                BinaryType::from_byte(*byte)
                    .ok_or_else(|| invalid_binary_type(*byte, start + index))
            })
            .collect::<Result<Vec<_>>>()?;

        let member_types = binary_types
            .into_iter()
            .map(|binary_type| MemberType::read_additional(parser, binary_type))
            .collect::<Result<Vec<_>>>()?;

        Ok(MemberTypeInfo { member_types })
    }

    /// Write all tags, then all additional info.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a string length cannot be encoded.
    pub fn write(&self, writer: &mut Writer) -> Result<()> {
        for member_type in &self.member_types {
            writer.write_le(member_type.binary_type().to_byte());
        }
        for member_type in &self.member_types {
            member_type.write_additional(writer)?;
        }
        Ok(())
    }

    /// Number of members described.
    #[must_use]
    pub fn len(&self) -> usize {
        self.member_types.len()
    }

    /// Returns true for classes without members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.member_types.is_empty()
    }
}

/// Complete class layout needed to decode member values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSchema {
    /// Name, defining object id and member names
    pub class_info: ClassInfo,
    /// Per-member type descriptors
    pub member_type_info: MemberTypeInfo,
}

impl ClassSchema {
    /// Read `ClassInfo` followed by `MemberTypeInfo`.
    ///
    /// # Errors
    /// See [`ClassInfo::read`] and [`MemberTypeInfo::read`].
    pub fn read(parser: &mut Parser) -> Result<Arc<Self>> {
        let class_info = ClassInfo::read(parser)?;
        let member_type_info = MemberTypeInfo::read(parser, class_info.member_names.len())?;

        Ok(Arc::new(ClassSchema {
            class_info,
            member_type_info,
        }))
    }

    /// Write `ClassInfo` followed by `MemberTypeInfo`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if names and descriptors disagree in count, or a
    /// length cannot be encoded.
    pub fn write(&self, writer: &mut Writer) -> Result<()> {
        if self.class_info.member_names.len() != self.member_type_info.len() {
            return Err(malformed_error!(
                "Class '{}' has {} member names but {} member types",
                self.class_info.name,
                self.class_info.member_names.len(),
                self.member_type_info.len()
            ));
        }

        self.class_info.write(writer)?;
        self.member_type_info.write(writer)
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.class_info.name
    }

    /// Number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.class_info.member_names.len()
    }

    /// Member names and descriptors, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &MemberType)> {
        self.class_info
            .member_names
            .iter()
            .map(String::as_str)
            .zip(self.member_type_info.member_types.iter())
    }
}

pub(crate) fn count_u32(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| malformed_error!("Count {} exceeds u32", count))
}

//! The binary object-graph format embedded in `.udlg` files.
//!
//! The stream is a header followed by tagged records and terminated by `MessageEnd`. Records
//! define strings, arrays, libraries and class instances; class records carry their member
//! layout (or borrow it from an earlier definition) and then one value per member, where
//! non-primitive values are complete nested records. Objects refer to each other through
//! integer ids.
//!
//! # Key Components
//!
//! - [`Document`] - parse and write whole streams, resolve object ids
//! - [`Record`] - closed sum over the supported record kinds
//! - [`decoder::RecordDecoder`] / [`encoder`] - the per-record wire codec
//! - [`ClassSchema`], [`MemberType`] - class metadata
//! - [`ReferenceTable`] - object id to record position mapping
//! - [`PrimitiveValue`] - inline scalar values
//!
//! # Supported Records
//!
//! | Tag | Record                   |
//! |-----|--------------------------|
//! | 0   | SerializedStreamHeader   |
//! | 1   | ClassWithId              |
//! | 5   | ClassWithMembersAndTypes |
//! | 6   | BinaryObjectString       |
//! | 7   | BinaryArray (single-dimension kinds) |
//! | 9   | MemberReference          |
//! | 10  | ObjectNull               |
//! | 11  | MessageEnd               |
//! | 12  | BinaryLibrary            |
//! | 15  | ArraySinglePrimitive     |
//! | 17  | ArraySingleString        |
//!
//! The remaining tags of the format are recognized and rejected with
//! [`crate::Error::UnsupportedVariant`].

mod class;
pub mod decoder;
mod document;
pub mod encoder;
mod primitive;
mod record;
mod references;
mod tree;
mod types;

pub use class::{ClassInfo, ClassSchema, ClassTypeInfo, MemberType, MemberTypeInfo};
pub use document::Document;
pub use primitive::{read_primitive, read_primitives, write_primitive, PrimitiveValue};
pub use record::{
    ArraySinglePrimitive, ArraySingleString, BinaryArray, BinaryLibrary, BinaryObjectString,
    ClassWithId, ClassWithMembersAndTypes, MemberReference, MemberValue, Record,
    SerializationHeader,
};
pub use references::{RecordLocation, ReferenceTable};
pub use types::{BinaryArrayType, BinaryType, PrimitiveType, RecordType};

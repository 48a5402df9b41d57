use thiserror::Error;

use crate::binaryformat::{PrimitiveType, RecordType};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding errors are fatal to the parse that raised them: a misread field shifts every later
/// offset, so no partial [`crate::Document`] is ever produced. Patch errors leave the document
/// they were applied to untouched.
///
/// # Error Categories
///
/// ## Stream Decoding Errors
/// - [`Error::MalformedVarint`] - 7-bit encoded integer did not terminate within 5 bytes
/// - [`Error::UnexpectedEof`] - A fixed-width read ran past the end of the input
/// - [`Error::UnknownRecordType`] - Record discriminant outside the known tag space
/// - [`Error::UnsupportedVariant`] - Known record kind that this library does not decode
/// - [`Error::UnsupportedPrimitive`] - Primitive kind without a fixed-width encoding
/// - [`Error::Malformed`] - Structural inconsistency inside an otherwise readable stream
/// - [`Error::RecursionLimit`] - Nested member records exceeded the configured depth
///
/// ## Graph Errors
/// - [`Error::UnresolvedReference`] - Object id that no record in the document defines
///
/// ## Patch Errors
/// - [`Error::TypeMismatch`] - Patch target is not an inline string member
/// - [`Error::IndexOutOfRange`] - Patch coordinate outside the document
///
/// ## Input Errors
/// - [`Error::NotSeekable`] - Reader could not seek
/// - [`Error::NotBinaryStream`] - Input does not open with a stream header
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use udlg::{Document, Error};
///
/// match Document::parse(&[0x06]) {
///     Err(Error::NotBinaryStream { found }) => assert_eq!(found, 0x06),
///     other => panic!("unexpected result: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A 7-bit encoded integer kept its continuation bit set for more than 5 bytes, or its
    /// fifth byte carried bits that do not fit into 32 bits.
    #[error("Malformed 7-bit encoded integer at offset {offset}")]
    MalformedVarint {
        /// Offset of the first byte of the integer
        offset: usize,
    },

    /// The input ended in the middle of a field.
    #[error("Unexpected end of data at offset {offset} ({needed} more bytes required)")]
    UnexpectedEof {
        /// Cursor position at which the read was attempted
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
    },

    /// The record discriminant is not part of the format.
    #[error("Unknown record type {tag} at offset {offset}")]
    UnknownRecordType {
        /// The raw discriminant byte
        tag: u8,
        /// Offset of the discriminant byte
        offset: usize,
    },

    /// The record kind exists in the format but is not decoded by this library.
    ///
    /// Also raised for [`crate::binaryformat::BinaryArrayType`] layouts other than the
    /// single-dimension ones.
    #[error("Unsupported record variant {record_type:?} at offset {offset}")]
    UnsupportedVariant {
        /// The recognized record kind
        record_type: RecordType,
        /// Offset of the discriminant byte
        offset: usize,
    },

    /// A primitive kind without a fixed-width wire encoding reached the primitive codec.
    #[error("Unsupported primitive type {primitive_type:?} at offset {offset}")]
    UnsupportedPrimitive {
        /// The primitive kind
        primitive_type: PrimitiveType,
        /// Offset at which the value would start
        offset: usize,
    },

    /// An object id does not resolve to any record of the document.
    #[error("Unresolved object reference {object_id}")]
    UnresolvedReference {
        /// The object id that failed to resolve
        object_id: i32,
    },

    /// A patch targeted a member that does not hold an inline string.
    #[error("Type mismatch - {0}")]
    TypeMismatch(String),

    /// A patch coordinate does not exist in the document.
    #[error("Index out of range - record {record_index}, member {member_index}")]
    IndexOutOfRange {
        /// Index into the record sequence
        record_index: usize,
        /// Index into the member values of that record
        member_index: usize,
    },

    /// The provided reader does not support seeking.
    #[error("Input is not seekable: {0}")]
    NotSeekable(std::io::Error),

    /// The input does not open with a serialized stream header.
    #[error("Not a binary object stream (first byte {found:#04x})")]
    NotBinaryStream {
        /// The byte found where the header tag was expected
        found: u8,
    },

    /// The data is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Nested member records went deeper than the configured limit.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

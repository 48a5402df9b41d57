//! # udlg Prelude
//!
//! The types needed for everyday work with dialog files: loading envelopes and documents,
//! walking records and applying text patches.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all udlg operations
pub use crate::Error;

/// The result type used throughout udlg
pub use crate::Result;

/// Parser options
pub use crate::ParserConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Dialog files and bare object-graph streams
pub use crate::{Document, Udlg};

/// Low-level file access and wire codec
pub use crate::{File, Parser, Writer};

// ================================================================================================
// Records
// ================================================================================================

/// Record kinds and their contents
pub use crate::binaryformat::{
    BinaryObjectString, ClassSchema, ClassWithId, ClassWithMembersAndTypes, MemberType,
    MemberValue, PrimitiveType, PrimitiveValue, Record, RecordLocation, RecordType,
};

// ================================================================================================
// Patching
// ================================================================================================

/// Text patches
pub use crate::patch::{parse_patch_block, PatchSet, TextPatch};

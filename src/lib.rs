// Copyright 2026 The udlg Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # udlg
//!
//! Reader and writer for Underrail `.udlg` dialog files and the binary object-graph stream
//! embedded in them.
//!
//! A dialog file is a small fixed envelope followed by a serialized object graph: a header
//! record, a sequence of tagged records (classes, strings, arrays, references) and a
//! terminating `MessageEnd`. `udlg` decodes that stream into an owned [`Document`], lets you
//! replace dialog text in place, and writes the result back. Unmodified input is reproduced
//! byte for byte.
//!
//! ## Features
//!
//! - **Exact round trips** - every length and count is recomputed on write
//! - **Memory-mapped input** - files are mapped instead of read where possible
//! - **Object id resolution** - forward and nested references resolve through a [`ReferenceTable`]
//! - **Text patches** - `R,M=>'text'` blocks for localization, see [`patch`]
//! - **Structural dumps** - [`Document::to_tree`] renders a JSON tree for inspection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use udlg::prelude::*;
//! use std::path::Path;
//!
//! let mut dialog = Udlg::from_file(Path::new("Data/Dialogs/intro.udlg"))?;
//! println!("{} records", dialog.document().len());
//!
//! let patches = parse_patch_block(b"5,2=>'::Another:: string to set.'\n")?;
//! dialog.document_mut().apply_patch(&patches)?;
//! std::fs::write("intro.udlg", dialog.to_bytes()?)?;
//! # Ok::<(), udlg::Error>(())
//! ```
//!
//! ### Bare Streams
//!
//! ```rust
//! use udlg::Document;
//!
//! let data = std::fs::read("tests/samples/simpleclass.dat")?;
//! let document = Document::parse(&data)?;
//!
//! assert!(document.is_terminated());
//! assert_eq!(document.resolve(6)?.as_str(), Some("greeting"));
//! assert_eq!(document.to_bytes()?, data);
//! # Ok::<(), udlg::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`binaryformat`] - records, class metadata, the record codec and [`Document`]
//! - [`udlg`] - the dialog envelope around a document
//! - [`patch`] - text patch blocks and in-place string replacement
//! - [`config`] - parser options
//! - [`file`] - byte sources, [`Parser`] and [`Writer`]
//! - [`prelude`] - re-exports of the commonly used types
//! - [`Error`] and [`Result`] - error handling

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// ```rust
/// use udlg::prelude::*;
///
/// let data = std::fs::read("tests/samples/string.dat")?;
/// let document = Document::parse(&data)?;
/// assert_eq!(document.records()[0].record_type(), RecordType::BinaryObjectString);
/// # Ok::<(), Error>(())
/// ```
pub mod prelude;

/// The binary object-graph stream format.
///
/// # Key Components
///
/// - [`Document`] - whole streams
/// - [`binaryformat::Record`] - the decoded record kinds
/// - [`binaryformat::decoder`] and [`binaryformat::encoder`] - the record codec
/// - [`ReferenceTable`] - object id resolution
pub mod binaryformat;

/// Parser configuration.
pub mod config;

/// Byte sources and the little-endian wire layer shared by all decoders.
pub mod file;

/// Text patches for dialog strings.
pub mod patch;

/// The `.udlg` dialog envelope.
pub mod udlg;

/// `udlg` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use udlg::{Result, Udlg};
///
/// fn load(path: &str) -> Result<Udlg> {
///     Udlg::from_file(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `udlg` Error type
///
/// The error type for every operation of this crate. Decoding errors carry the byte offset they
/// occurred at.
pub use error::Error;

/// Decoded object-graph stream
pub use binaryformat::Document;

/// Object id to record position mapping
pub use binaryformat::ReferenceTable;

/// Parser options
pub use config::ParserConfig;

/// Text patch types and the patch block reader
pub use patch::{parse_patch_block, PatchSet, TextPatch};

/// Dialog envelope
pub use udlg::{Header, HeaderEntry, StartBlock, Udlg};

/// Low-level input and output
///
/// # Examples
///
/// ```rust
/// use udlg::{Parser, Writer};
///
/// let mut writer = Writer::new();
/// writer.write_7bit_encoded_int(300);
/// writer.write_prefixed_string_utf8("Юникод")?;
///
/// let bytes = writer.into_inner();
/// let mut parser = Parser::new(&bytes);
/// assert_eq!(parser.read_7bit_encoded_int()?, 300);
/// assert_eq!(parser.read_prefixed_string_utf8()?, "Юникод");
/// # Ok::<(), udlg::Error>(())
/// ```
pub use file::{File, Parser, Writer};

//! Byte sources and the low-level wire layer.
//!
//! A [`File`] owns the raw input of a `.udlg` file or a bare object-graph stream. It is backed
//! either by a read-only memory mapping ([`File::from_file`]) or by an owned buffer
//! ([`File::from_mem`], [`File::from_reader`]); both hide behind the [`Backend`] trait so the
//! decoders only ever see a byte slice.
//!
//! The sub-modules provide the primitives every decoder builds upon:
//! - [`io`] - the [`io::WireIO`] trait and [`io::read_le_at`] for fixed-width values
//! - [`parser`] - [`Parser`], a bounds-checked read cursor
//! - [`writer`] - [`Writer`], the matching output buffer
//!
//! # Examples
//!
//! ```rust,no_run
//! use udlg::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("tests/samples/dialog.udlg"))?;
//! println!("{} bytes, starts with {:02x?}", file.len(), file.data_slice(0, 4)?);
//! # Ok::<(), udlg::Error>(())
//! ```

pub mod io;
pub mod parser;
pub mod writer;

mod memory;
mod physical;

use std::{
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use crate::{Error, Result};
use memory::Memory;
use physical::Physical;

pub use parser::Parser;
pub use writer::Writer;

/// Backing storage of a [`File`].
pub trait Backend: Send + Sync {
    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Borrow the complete data.
    fn data(&self) -> &[u8];

    /// Total number of bytes.
    fn len(&self) -> usize;
}

/// Raw input bytes, either memory mapped or owned.
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory-map a file from disk.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be opened or mapped, and
    /// [`Error::Empty`] for zero-length files.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Take ownership of an in-memory buffer.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    /// Read a seekable source from its beginning to the end.
    ///
    /// # Errors
    /// Returns [`Error::NotSeekable`] if the reader cannot be rewound, [`Error::FileError`] on
    /// read failures and [`Error::Empty`] if nothing was read.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<File> {
        reader.seek(SeekFrom::Start(0)).map_err(Error::NotSeekable)?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        Self::from_mem(data)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Error::Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Total number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file holds no data. Never the case for a loaded file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the complete data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if the range exceeds the data.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }
}

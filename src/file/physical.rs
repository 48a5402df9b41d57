//! Memory-mapped file byte source.

use super::Backend;
use crate::{Error, Result};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A read-only memory mapping of a file on disk.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;

        // The mapping is read-only and lives as long as `Physical`.
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let eof = Error::UnexpectedEof {
            offset,
            needed: len,
        };
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(eof);
        };

        if offset_end > self.data.len() {
            return Err(eof);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

//! Heap-backed byte source.

use super::Backend;
use crate::{Error, Result};

/// Owns its input as a plain vector, e.g. for bytes read from a non-file reader.
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
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
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

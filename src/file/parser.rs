//! Bounds-checked cursor over an in-memory byte buffer.
//!
//! [`Parser`] is the read side of the wire layer. It keeps a position inside a borrowed slice
//! and offers typed little-endian reads, the 7-bit encoded integer used for string lengths, and
//! length-prefixed UTF-8 strings. Every read validates that enough data remains and reports the
//! failing offset, so decoding errors can be traced back to a byte position in the input.
//!
//! # Examples
//!
//! ```rust
//! use udlg::Parser;
//!
//! let data = [0x05, b'h', b'e', b'l', b'l', b'o', 0x2A, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_prefixed_string_utf8()?, "hello");
//! assert_eq!(parser.read_le::<i32>()?, 42);
//! assert!(!parser.has_more_data());
//! # Ok::<(), udlg::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, WireIO},
    Error, Result,
};

/// Maximum number of bytes a 7-bit encoded `u32` may occupy.
pub const MAX_7BIT_ENCODED_LEN: usize = 5;

/// A cursor-based reader for little-endian binary data.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true while unread bytes remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the cursor to an absolute position. Seeking to the very end is allowed.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if `pos` lies past the end of the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::UnexpectedEof {
                offset: pos,
                needed: 0,
            });
        }

        self.position = pos;
        Ok(())
    }

    /// Move forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if fewer than `step` bytes remain.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        self.ensure(step)?;
        self.position += step;
        Ok(())
    }

    /// Current cursor position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The complete underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The unread part of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Look at the current byte without consuming it.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(Error::UnexpectedEof {
                offset: self.position,
                needed: 1,
            })
    }

    /// Read a little-endian value and advance past it.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if the value does not fit into the remaining data.
    pub fn read_le<T: WireIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Read a 7-bit encoded unsigned integer.
    ///
    /// Each byte carries 7 data bits, least significant group first; the high bit flags that
    /// another byte follows. A `u32` needs at most 5 bytes, and the fifth may only use its low
    /// 4 bits.
    ///
    /// # Errors
    /// Returns [`Error::MalformedVarint`] for encodings longer than 5 bytes or exceeding 32
    /// bits, and [`Error::UnexpectedEof`] if the data ends inside the integer.
    pub fn read_7bit_encoded_int(&mut self) -> Result<u32> {
        let start = self.position;
        let mut value = 0u32;

        for index in 0..MAX_7BIT_ENCODED_LEN {
            let byte = self.read_le::<u8>()?;

            if index == MAX_7BIT_ENCODED_LEN - 1 && byte > 0x0F {
                return Err(Error::MalformedVarint { offset: start });
            }

            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(Error::MalformedVarint { offset: start })
    }

    /// Read a 7-bit length prefix followed by that many UTF-8 bytes.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] when the payload is truncated and
    /// [`Error::Malformed`] if it is not valid UTF-8.
    pub fn read_prefixed_string_utf8(&mut self) -> Result<String> {
        let length = self.read_7bit_encoded_int()? as usize;
        let start = self.position;
        let bytes = self.read_bytes(length)?;

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            malformed_error!(
                "Invalid UTF-8 string at offset {}-{}: {}",
                start,
                start + length,
                e.utf8_error()
            )
        })
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        match self.position.checked_add(needed) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::UnexpectedEof {
                offset: self.position,
                needed,
            }),
        }
    }
}

//! Growable little-endian output buffer.
//!
//! [`Writer`] is the write-side counterpart of [`crate::file::Parser`]. Length prefixes are
//! always derived from the data being written, never taken from a value decoded earlier, so a
//! string can change size between parse and write without further bookkeeping.

use crate::{file::io::WireIO, Result};

/// Encode `value` as a 7-bit encoded integer using the minimal number of bytes.
///
/// # Examples
///
/// ```rust
/// use udlg::file::writer::encode_7bit_int;
///
/// assert_eq!(encode_7bit_int(127), vec![0x7F]);
/// assert_eq!(encode_7bit_int(390), vec![0x86, 0x03]);
/// ```
#[must_use]
pub fn encode_7bit_int(value: u32) -> Vec<u8> {
    let mut writer = Writer::with_capacity(5);
    writer.write_7bit_encoded_int(value);
    writer.into_inner()
}

/// Sequential writer producing little-endian binary data.
#[derive(Debug, Default)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Writer { buffer: Vec::new() }
    }

    /// Create an empty writer with preallocated space.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return its buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Append a value in little-endian byte order.
    pub fn write_le<T: WireIO>(&mut self, value: T) {
        self.buffer.extend_from_slice(value.to_le_bytes().as_ref());
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a 7-bit encoded integer.
    pub fn write_7bit_encoded_int(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Append the byte length of `value` as a 7-bit encoded integer followed by its UTF-8
    /// bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the string is longer than `u32::MAX` bytes.
    pub fn write_prefixed_string_utf8(&mut self, value: &str) -> Result<()> {
        let Ok(length) = u32::try_from(value.len()) else {
            return Err(malformed_error!(
                "String of {} bytes exceeds the maximum encodable length",
                value.len()
            ));
        };

        self.write_7bit_encoded_int(length);
        self.write_bytes(value.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::parser::Parser;

    #[test]
    fn test_encode_7bit_int() {
        let test_cases = vec![
            (0, vec![0x00]),
            (10, vec![0x0A]),
            (127, vec![0x7F]),
            (128, vec![0x80, 0x01]),
            (256, vec![0x80, 0x02]),
            (384, vec![0x80, 0x03]),
            (390, vec![0x86, 0x03]),
            (u32::MAX, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];

        for (value, expected) in test_cases {
            assert_eq!(encode_7bit_int(value), expected);

            let mut writer = Writer::new();
            writer.write_7bit_encoded_int(value);
            assert_eq!(writer.as_slice(), expected.as_slice());

            let mut parser = Parser::new(&expected);
            assert_eq!(parser.read_7bit_encoded_int().unwrap(), value);
        }
    }

    #[test]
    fn test_write_values() {
        let mut writer = Writer::with_capacity(16);
        assert!(writer.is_empty());

        writer.write_le::<u8>(0x0B);
        writer.write_le::<i32>(-1);
        writer.write_le::<u16>(0x0201);
        writer.write_bytes(&[0xAA]);

        assert_eq!(writer.len(), 8);
        assert_eq!(
            writer.into_inner(),
            vec![0x0B, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x02, 0xAA]
        );
    }

    #[test]
    fn test_write_prefixed_string() {
        let mut writer = Writer::new();
        writer.write_prefixed_string_utf8("").unwrap();
        writer.write_prefixed_string_utf8("Юникод").unwrap();

        let bytes = writer.into_inner();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 12);
        assert_eq!(&bytes[2..], "Юникод".as_bytes());

        let long = "Z".repeat(130);
        let mut writer = Writer::new();
        writer.write_prefixed_string_utf8(&long).unwrap();
        assert_eq!(&writer.as_slice()[..2], &[0x82, 0x01]);
        assert_eq!(writer.len(), 132);
    }
}

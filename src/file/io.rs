//! Fixed-width little-endian value access.
//!
//! Every integer and float in the binary object format, as well as in the UDLG envelope, is
//! stored little-endian. [`WireIO`] abstracts the conversion for the scalar types the format
//! uses so that [`crate::file::Parser`] and [`crate::file::Writer`] can stay generic over them.

use crate::{Error, Result};

/// Scalar type with a fixed-width little-endian wire representation.
pub trait WireIO: Sized + Copy {
    /// Byte array holding the encoded value.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode a value from its little-endian bytes.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Encode a value to its little-endian bytes.
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_wire_io {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl WireIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_wire_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
}

/// Read a little-endian value at `offset`, advancing `offset` past it on success.
///
/// # Errors
/// Returns [`Error::UnexpectedEof`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: WireIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let eof = Error::UnexpectedEof {
        offset: *offset,
        needed: type_len,
    };

    let Some(end) = offset.checked_add(type_len) else {
        return Err(eof);
    };
    if end > data.len() {
        return Err(eof);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(eof);
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_values() {
        let mut offset = 0;
        assert_eq!(read_le_at::<u8>(&TEST_BUFFER, &mut offset).unwrap(), 0x01);
        assert_eq!(offset, 1);

        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0201);

        let mut offset = 0;
        assert_eq!(
            read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap(),
            0x0403_0201
        );

        let mut offset = 0;
        assert_eq!(
            read_le_at::<u64>(&TEST_BUFFER, &mut offset).unwrap(),
            0x0807_0605_0403_0201
        );
        assert_eq!(offset, 8);

        let mut offset = 0;
        assert_eq!(read_le_at::<i32>(&[0xFF; 4], &mut offset).unwrap(), -1);
    }

    #[test]
    fn read_le_floats() {
        let bytes = 1.5f64.to_le_bytes();
        let mut offset = 0;
        assert_eq!(read_le_at::<f64>(&bytes, &mut offset).unwrap(), 1.5);

        let bytes = (-0.25f32).to_le_bytes();
        let mut offset = 0;
        assert_eq!(read_le_at::<f32>(&bytes, &mut offset).unwrap(), -0.25);
    }

    #[test]
    fn read_le_eof() {
        let mut offset = 6;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(
            result,
            Err(Error::UnexpectedEof {
                offset: 6,
                needed: 4
            })
        ));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn roundtrip_bytes() {
        assert_eq!(WireIO::to_le_bytes(0x1234_5678u32), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(WireIO::to_le_bytes(-2i16), [0xFE, 0xFF]);
    }
}

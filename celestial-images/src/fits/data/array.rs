use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::core::{BitPix, ByteOrder};
use crate::fits::{FitsError, Result};

/// Sample types that can be stored in a FITS image.
pub trait DataArray: Sized + Copy + PartialEq {
    const BITPIX: BitPix;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Result<Vec<Self>>;
    fn to_bytes(data: &[Self], byte_order: ByteOrder) -> Result<Vec<u8>>;

    /// Physical value before any `BSCALE`/`BZERO` scaling.
    fn to_f64(self) -> f64;
}

fn check_length(bytes: &[u8], bitpix: BitPix) -> Result<()> {
    if bytes.len() % bitpix.bytes_per_pixel() != 0 {
        return Err(FitsError::InvalidFormat(format!(
            "{} bytes is not a whole number of BITPIX {} samples",
            bytes.len(),
            bitpix.value()
        )));
    }
    Ok(())
}

impl DataArray for u8 {
    const BITPIX: BitPix = BitPix::U8;

    fn from_bytes(bytes: &[u8], _byte_order: ByteOrder) -> Result<Vec<Self>> {
        Ok(bytes.to_vec())
    }

    fn to_bytes(data: &[Self], _byte_order: ByteOrder) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_data_array {
    ($ty:ty, $bitpix:expr, $read:ident, $write:ident) => {
        impl DataArray for $ty {
            const BITPIX: BitPix = $bitpix;

            fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Result<Vec<Self>> {
                check_length(bytes, Self::BITPIX)?;
                let count = bytes.len() / Self::BITPIX.bytes_per_pixel();
                let mut cursor = Cursor::new(bytes);
                let mut result = Vec::with_capacity(count);
                for _ in 0..count {
                    let value = match byte_order {
                        ByteOrder::BigEndian => cursor.$read::<BigEndian>()?,
                        ByteOrder::LittleEndian => cursor.$read::<LittleEndian>()?,
                    };
                    result.push(value);
                }
                Ok(result)
            }

            fn to_bytes(data: &[Self], byte_order: ByteOrder) -> Result<Vec<u8>> {
                let mut result = Vec::with_capacity(data.len() * Self::BITPIX.bytes_per_pixel());
                for &value in data {
                    match byte_order {
                        ByteOrder::BigEndian => result.$write::<BigEndian>(value)?,
                        ByteOrder::LittleEndian => result.$write::<LittleEndian>(value)?,
                    }
                }
                Ok(result)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_data_array!(i16, BitPix::I16, read_i16, write_i16);
impl_data_array!(i32, BitPix::I32, read_i32, write_i32);
impl_data_array!(i64, BitPix::I64, read_i64, write_i64);
impl_data_array!(f32, BitPix::F32, read_f32, write_f32);
impl_data_array!(f64, BitPix::F64, read_f64, write_f64);

fn widen<T: DataArray>(bytes: &[u8], byte_order: ByteOrder) -> Result<Vec<f64>> {
    Ok(T::from_bytes(bytes, byte_order)?
        .into_iter()
        .map(DataArray::to_f64)
        .collect())
}

/// Decodes raw samples of any `BITPIX` into `f64`.
pub fn decode_as_f64(bytes: &[u8], bitpix: BitPix, byte_order: ByteOrder) -> Result<Vec<f64>> {
    match bitpix {
        BitPix::U8 => widen::<u8>(bytes, byte_order),
        BitPix::I16 => widen::<i16>(bytes, byte_order),
        BitPix::I32 => widen::<i32>(bytes, byte_order),
        BitPix::I64 => widen::<i64>(bytes, byte_order),
        BitPix::F32 => widen::<f32>(bytes, byte_order),
        BitPix::F64 => widen::<f64>(bytes, byte_order),
    }
}

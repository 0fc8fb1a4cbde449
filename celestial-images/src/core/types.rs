/// Sample type of a FITS data array, keyed by its `BITPIX` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitPix {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl BitPix {
    pub fn from_value(value: i64) -> Option<Self> {
        Some(match value {
            8 => Self::U8,
            16 => Self::I16,
            32 => Self::I32,
            64 => Self::I64,
            -32 => Self::F32,
            -64 => Self::F64,
            _ => return None,
        })
    }

    /// Header value; negative for IEEE floating point.
    pub fn value(self) -> i32 {
        match self {
            Self::F32 | Self::F64 => -8 * self.bytes_per_pixel() as i32,
            _ => 8 * self.bytes_per_pixel() as i32,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }
}

/// FITS files are big-endian; the other order exists for raw buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::core::{BitPix, ByteOrder};
use crate::fits::data::decode_as_f64;
use crate::fits::header::{Header, HeaderParser};
use crate::fits::{FitsError, Result};

/// Primary HDU decoded to physical `f64` values.
#[derive(Debug, Clone)]
pub struct PrimaryImage {
    pub header: Header,
    /// Axis lengths, NAXIS1 first.
    pub dimensions: Vec<usize>,
    pub data: Vec<f64>,
}

pub struct FitsReader<R: Read> {
    reader: R,
}

impl FitsReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> FitsReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the primary header and image. `BSCALE`/`BZERO` are applied so
    /// the returned samples are physical values whatever the stored `BITPIX`.
    pub fn read_primary(&mut self) -> Result<PrimaryImage> {
        let (header, header_len) = HeaderParser::parse_header(&mut self.reader)?;
        if !header.is_primary() {
            return Err(FitsError::InvalidFormat(
                "primary header does not start with SIMPLE = T".to_string(),
            ));
        }

        let bitpix_value = header.require_integer("BITPIX")?;
        let bitpix = BitPix::from_value(bitpix_value).ok_or(FitsError::InvalidBitPix(bitpix_value))?;

        let naxis = header.require_integer("NAXIS")?;
        if !(0..=999).contains(&naxis) {
            return Err(FitsError::InvalidKeywordValue {
                keyword: "NAXIS".to_string(),
                value: naxis.to_string(),
            });
        }
        let mut dimensions = Vec::with_capacity(naxis as usize);
        for axis in 1..=naxis {
            let name = format!("NAXIS{}", axis);
            let len = header.require_integer(&name)?;
            let len = usize::try_from(len).map_err(|_| FitsError::InvalidKeywordValue {
                keyword: name,
                value: len.to_string(),
            })?;
            dimensions.push(len);
        }

        let byte_len = data_len(&dimensions, bitpix)?;
        // Grows with the data actually present, so a lying header cannot
        // force a huge allocation.
        let mut bytes = Vec::new();
        (&mut self.reader)
            .take(byte_len as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < byte_len {
            return Err(FitsError::UnexpectedEof);
        }

        let mut data = decode_as_f64(&bytes, bitpix, ByteOrder::BigEndian)?;
        let bscale = header.get_real("BSCALE").unwrap_or(1.0);
        let bzero = header.get_real("BZERO").unwrap_or(0.0);
        if bscale != 1.0 || bzero != 0.0 {
            for value in data.iter_mut() {
                *value = *value * bscale + bzero;
            }
        }

        debug!(
            bitpix = bitpix.value(),
            ?dimensions,
            header_len,
            "read FITS primary image"
        );

        Ok(PrimaryImage {
            header,
            dimensions,
            data,
        })
    }
}

/// Size in bytes of the data array described by `dimensions`.
fn data_len(dimensions: &[usize], bitpix: BitPix) -> Result<usize> {
    if dimensions.is_empty() {
        return Ok(0);
    }
    dimensions
        .iter()
        .try_fold(bitpix.bytes_per_pixel(), |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| FitsError::InvalidKeywordValue {
            keyword: "NAXIS".to_string(),
            value: format!("{:?} overflows the data size", dimensions),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::header::Keyword;
    use crate::fits::io::FitsWriter;

    fn written<T: crate::fits::data::DataArray>(data: &[T], dims: &[usize], keywords: &[Keyword]) -> Vec<u8> {
        let mut writer = FitsWriter::new(Vec::new());
        writer.write_primary_image(data, dims, keywords).unwrap();
        writer.into_inner()
    }

    #[test]
    fn reads_back_f64_cube() {
        let data: Vec<f64> = (0..24).map(|i| i as f64 * 0.1).collect();
        let bytes = written(&data, &[2, 3, 4], &[Keyword::string("EXTNAME", "SKYMAP")]);

        let image = FitsReader::new(bytes.as_slice()).read_primary().unwrap();
        assert_eq!(image.dimensions, vec![2, 3, 4]);
        assert_eq!(image.data, data);
        assert_eq!(image.header.get_string("EXTNAME"), Some("SKYMAP"));
    }

    #[test]
    fn applies_bscale_and_bzero() {
        let bytes = written(
            &[0i16, 1, -2],
            &[3],
            &[Keyword::real("BSCALE", 0.5), Keyword::real("BZERO", 10.0)],
        );
        let image = FitsReader::new(bytes.as_slice()).read_primary().unwrap();
        assert_eq!(image.data, vec![10.0, 10.5, 9.0]);
    }

    #[test]
    fn reads_integer_and_single_precision() {
        let bytes = written(&[1u8, 200], &[2], &[]);
        assert_eq!(FitsReader::new(bytes.as_slice()).read_primary().unwrap().data, vec![1.0, 200.0]);
        let bytes = written(&[0.25f32, -4.0], &[2], &[]);
        assert_eq!(FitsReader::new(bytes.as_slice()).read_primary().unwrap().data, vec![0.25, -4.0]);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let bytes = written(&[1.0f64; 400], &[400], &[]);
        let short = &bytes[..bytes.len() - crate::fits::BLOCK_SIZE];
        assert!(matches!(
            FitsReader::new(short).read_primary(),
            Err(FitsError::UnexpectedEof)
        ));
    }

    #[test]
    fn oversized_axes_are_rejected() {
        let mut bytes = written(&[0.0f64; 4], &[4], &[]);
        let card = format!("{:<80}", "NAXIS1  =  4611686018427387904");
        let at = (0..bytes.len())
            .step_by(80)
            .find(|&i| bytes[i..i + 8] == *b"NAXIS1  ")
            .unwrap();
        bytes[at..at + 80].copy_from_slice(card.as_bytes());
        assert!(matches!(
            FitsReader::new(bytes.as_slice()).read_primary(),
            Err(FitsError::InvalidKeywordValue { .. })
        ));

        let card = format!("{:<80}", "NAXIS1  =        1000000000000");
        bytes[at..at + 80].copy_from_slice(card.as_bytes());
        assert!(matches!(
            FitsReader::new(bytes.as_slice()).read_primary(),
            Err(FitsError::UnexpectedEof)
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("planes.fits");
        let data: Vec<f64> = (0..12).map(|i| i as f64 - 5.5).collect();
        let mut writer = FitsWriter::create(&path).unwrap();
        writer
            .write_primary_image(&data, &[3, 2, 2], &[Keyword::integer("NMAPS", 2)])
            .unwrap();
        drop(writer);

        assert_eq!(std::fs::metadata(&path).unwrap().len() % 2880, 0);
        let image = FitsReader::open(&path).unwrap().read_primary().unwrap();
        assert_eq!(image.dimensions, vec![3, 2, 2]);
        assert_eq!(image.data, data);
        assert_eq!(image.header.get_integer("NMAPS"), Some(2));

        assert!(matches!(
            FitsReader::open(dir.path().join("absent.fits")),
            Err(FitsError::Io(_))
        ));
    }

    #[test]
    fn empty_primary() {
        let bytes = written::<f64>(&[], &[], &[]);
        let image = FitsReader::new(bytes.as_slice()).read_primary().unwrap();
        assert!(image.dimensions.is_empty());
        assert!(image.data.is_empty());
    }

    #[test]
    fn not_fits() {
        let bytes = vec![b' '; crate::fits::BLOCK_SIZE];
        assert!(FitsReader::new(bytes.as_slice()).read_primary().is_err());
    }
}

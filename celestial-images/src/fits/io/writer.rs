use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::core::ByteOrder;
use crate::fits::data::DataArray;
use crate::fits::header::{Header, Keyword, KeywordValue};
use crate::fits::{padding_for, FitsError, Result, CARD_SIZE};

/// Widest value field a card can hold after `KEYWORD= `.
const MAX_VALUE_LEN: usize = CARD_SIZE - 10;

/// Writes a single primary image HDU.
pub struct FitsWriter<W: Write> {
    writer: W,
}

impl FitsWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FitsWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes header and big-endian data for an image of `dimensions`
    /// (NAXIS1 first). Structural keywords in `keywords` are ignored; the
    /// writer derives them from `T` and `dimensions`.
    pub fn write_primary_image<T: DataArray>(
        &mut self,
        data: &[T],
        dimensions: &[usize],
        keywords: &[Keyword],
    ) -> Result<()> {
        let expected: usize = dimensions.iter().product();
        if (dimensions.is_empty() && !data.is_empty()) || (!dimensions.is_empty() && expected != data.len()) {
            return Err(FitsError::InvalidFormat(format!(
                "image of {:?} needs {} samples, got {}",
                dimensions,
                expected,
                data.len()
            )));
        }

        let header = build_primary_header::<T>(dimensions, keywords);
        let mut header_bytes = Vec::with_capacity((header.len() + 1) * CARD_SIZE);
        for keyword in header.iter() {
            header_bytes.extend_from_slice(&format_card(keyword)?);
        }
        header_bytes.extend_from_slice(&end_card());
        header_bytes.resize(header_bytes.len() + padding_for(header_bytes.len()), b' ');

        let mut data_bytes = T::to_bytes(data, ByteOrder::BigEndian)?;
        data_bytes.resize(data_bytes.len() + padding_for(data_bytes.len()), 0);

        debug!(
            bitpix = T::BITPIX.value(),
            ?dimensions,
            cards = header.len(),
            "writing FITS primary image"
        );

        self.writer.write_all(&header_bytes)?;
        self.writer.write_all(&data_bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn build_primary_header<T: DataArray>(dimensions: &[usize], keywords: &[Keyword]) -> Header {
    let mut header = Header::new();

    header.add_keyword(Keyword::logical("SIMPLE", true));
    header.add_keyword(Keyword::integer("BITPIX", T::BITPIX.value() as i64));
    header.add_keyword(Keyword::integer("NAXIS", dimensions.len() as i64));
    for (i, &dim) in dimensions.iter().enumerate() {
        header.add_keyword(Keyword::integer(format!("NAXIS{}", i + 1), dim as i64));
    }
    header.add_keyword(Keyword::logical("EXTEND", false));

    for keyword in keywords.iter().filter(|k| !k.is_mandatory()) {
        header.add_keyword(keyword.clone());
    }

    header
}

fn end_card() -> [u8; CARD_SIZE] {
    let mut card = [b' '; CARD_SIZE];
    card[0..3].copy_from_slice(b"END");
    card
}

/// Real values use the shortest representation that parses back to the
/// same `f64`.
fn format_real(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(FitsError::InvalidKeywordValue {
            keyword: String::new(),
            value: value.to_string(),
        });
    }
    Ok(format!("{:?}", value).replace('e', "E"))
}

fn format_value(value: &KeywordValue) -> Result<String> {
    let text = match value {
        KeywordValue::Logical(b) => format!("{:>20}", if *b { "T" } else { "F" }),
        KeywordValue::Integer(i) => format!("{:>20}", i),
        KeywordValue::Real(r) => format!("{:>20}", format_real(*r)?),
        KeywordValue::String(s) => format!("'{:<8}'", s.replace('\'', "''")),
    };
    Ok(text)
}

pub(crate) fn format_card(keyword: &Keyword) -> Result<[u8; CARD_SIZE]> {
    let mut card = [b' '; CARD_SIZE];

    let name = keyword.name.as_bytes();
    if name.len() > 8 || !keyword.name.is_ascii() {
        return Err(FitsError::InvalidFormat(format!(
            "keyword name '{}' is not 1-8 ASCII characters",
            keyword.name
        )));
    }
    card[..name.len()].copy_from_slice(name);

    let Some(value) = &keyword.value else {
        if let Some(text) = &keyword.comment {
            let bytes = text.as_bytes();
            let len = bytes.len().min(CARD_SIZE - 8);
            card[8..8 + len].copy_from_slice(&bytes[..len]);
        }
        return Ok(card);
    };

    let value_str = format_value(value).map_err(|_| FitsError::InvalidKeywordValue {
        keyword: keyword.name.clone(),
        value: value.to_string(),
    })?;
    if value_str.len() > MAX_VALUE_LEN || !value_str.is_ascii() {
        return Err(FitsError::InvalidKeywordValue {
            keyword: keyword.name.clone(),
            value: value_str,
        });
    }

    card[8] = b'=';
    card[9] = b' ';
    let end = 10 + value_str.len();
    card[10..end].copy_from_slice(value_str.as_bytes());

    if let Some(comment) = &keyword.comment {
        let start = end + 3;
        if start < CARD_SIZE {
            card[end + 1] = b'/';
            let bytes = comment.as_bytes();
            let len = bytes.len().min(CARD_SIZE - start);
            card[start..start + len].copy_from_slice(&bytes[..len]);
        }
    }

    Ok(card)
}

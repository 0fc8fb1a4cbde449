use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use std::str;

use crate::fits::header::{Keyword, KeywordValue};
use crate::fits::{FitsError, Result, BLOCK_SIZE, CARD_SIZE};

/// Ordered keyword list with name lookup. Later cards with the same name
/// shadow earlier ones for lookup but all are kept for writing.
#[derive(Debug, Clone, Default)]
pub struct Header {
    keywords: Vec<Keyword>,
    keyword_index: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct HeaderCard {
    pub keyword: String,
    pub value: Option<String>,
    pub comment: Option<String>,
}

pub struct HeaderParser;

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_keyword(&mut self, keyword: Keyword) {
        let index = self.keywords.len();
        self.keyword_index.insert(keyword.name.clone(), index);
        self.keywords.push(keyword);
    }

    /// Replaces the value of an existing keyword, or appends it.
    pub fn set_keyword(&mut self, keyword: Keyword) {
        match self.keyword_index.get(&keyword.name) {
            Some(&index) => self.keywords[index] = keyword,
            None => self.add_keyword(keyword),
        }
    }

    pub fn get_keyword(&self, name: &str) -> Option<&Keyword> {
        self.keyword_index
            .get(name)
            .and_then(|&index| self.keywords.get(index))
    }

    pub fn get_keyword_value(&self, name: &str) -> Option<&KeywordValue> {
        self.get_keyword(name)?.value.as_ref()
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get_keyword_value(name)?.as_integer()
    }

    pub fn get_real(&self, name: &str) -> Option<f64> {
        self.get_keyword_value(name)?.as_real()
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get_keyword_value(name)?.as_string()
    }

    pub fn get_logical(&self, name: &str) -> Option<bool> {
        self.get_keyword_value(name)?.as_logical()
    }

    pub fn require_integer(&self, name: &str) -> Result<i64> {
        match self.get_keyword_value(name) {
            Some(KeywordValue::Integer(v)) => Ok(*v),
            Some(other) => Err(FitsError::InvalidKeywordValue {
                keyword: name.to_string(),
                value: other.to_string(),
            }),
            None => Err(FitsError::KeywordNotFound {
                keyword: name.to_string(),
            }),
        }
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn is_primary(&self) -> bool {
        self.get_logical("SIMPLE").unwrap_or(false)
    }
}

impl HeaderCard {
    pub fn parse(data: &[u8; CARD_SIZE]) -> Result<Self> {
        let card_str = str::from_utf8(data)
            .map_err(|_| FitsError::HeaderParse("invalid UTF-8 in header card".to_string()))?;
        if !card_str.is_ascii() {
            return Err(FitsError::HeaderParse(
                "non-ASCII character in header card".to_string(),
            ));
        }

        let mut card = HeaderCard {
            keyword: card_str[0..8].trim().to_string(),
            value: None,
            comment: None,
        };

        if &card_str[8..10] == "= " {
            let (value, comment) = split_value_comment(&card_str[10..]);
            card.value = value;
            card.comment = comment;
        } else {
            let text = card_str[8..].trim();
            if !text.is_empty() {
                card.comment = Some(text.to_string());
            }
        }

        Ok(card)
    }

    pub fn is_end(&self) -> bool {
        self.keyword == "END"
    }

    pub fn is_blank(&self) -> bool {
        self.keyword.is_empty() && self.value.is_none()
    }

    pub fn to_keyword(&self) -> Result<Keyword> {
        let mut keyword = Keyword::new(self.keyword.clone());
        keyword.comment = self.comment.clone();
        if let Some(value_str) = &self.value {
            keyword.value = Some(parse_value(&self.keyword, value_str)?);
        }
        Ok(keyword)
    }
}

/// Splits the value field at the first `/` that is not inside a quoted
/// string.
fn split_value_comment(field: &str) -> (Option<String>, Option<String>) {
    let mut in_string = false;
    let mut split_at = None;
    for (i, c) in field.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '/' if !in_string => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (value, comment) = match split_at {
        Some(i) => (&field[..i], Some(field[i + 1..].trim())),
        None => (field, None),
    };
    let value = value.trim();
    (
        (!value.is_empty()).then(|| value.to_string()),
        comment.filter(|c| !c.is_empty()).map(str::to_string),
    )
}

fn parse_value(keyword: &str, value_str: &str) -> Result<KeywordValue> {
    let trimmed = value_str.trim();

    match trimmed {
        "T" => return Ok(KeywordValue::Logical(true)),
        "F" => return Ok(KeywordValue::Logical(false)),
        _ => {}
    }

    if let Some(rest) = trimmed.strip_prefix('\'') {
        let content = rest.strip_suffix('\'').ok_or_else(|| FitsError::InvalidKeywordValue {
            keyword: keyword.to_string(),
            value: value_str.to_string(),
        })?;
        return Ok(KeywordValue::String(
            content.replace("''", "'").trim_end().to_string(),
        ));
    }

    if let Ok(int_val) = trimmed.parse::<i64>() {
        return Ok(KeywordValue::Integer(int_val));
    }

    // Fortran-style double exponents are legal in FITS.
    if let Ok(float_val) = trimmed.replace(['D', 'd'], "E").parse::<f64>() {
        return Ok(KeywordValue::Real(float_val));
    }

    Ok(KeywordValue::String(trimmed.to_string()))
}

impl HeaderParser {
    /// Reads header blocks up to and including the one holding `END`.
    /// Returns the header and the number of bytes consumed.
    pub fn parse_header<R: Read>(reader: &mut R) -> Result<(Header, usize)> {
        let mut header = Header::new();
        let mut block = [0u8; BLOCK_SIZE];
        let mut consumed = 0;

        loop {
            reader.read_exact(&mut block).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => FitsError::UnexpectedEof,
                _ => FitsError::Io(e),
            })?;
            consumed += BLOCK_SIZE;

            for raw in block.chunks_exact(CARD_SIZE) {
                let mut data = [0u8; CARD_SIZE];
                data.copy_from_slice(raw);
                let card = HeaderCard::parse(&data)?;
                if card.is_end() {
                    return Ok((header, consumed));
                }
                if !card.is_blank() {
                    header.add_keyword(card.to_keyword()?);
                }
            }
        }
    }
}

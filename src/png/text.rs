use thiserror::Error;

use crate::charset::normalize;
use crate::inflate::{inflate, InflateError};

#[derive(Error, Debug)]
pub enum TextChunkError {
    #[error("keyword is not null terminated")]
    MissingKeywordTerminator,
    #[error("chunk ends before the compression fields")]
    Truncated,
    #[error("language tag is not null terminated")]
    MissingLanguageTerminator,
    #[error("translated keyword is not null terminated")]
    MissingTranslatedKeywordTerminator,
    #[error("unsupported compression method {0}")]
    UnsupportedCompressionMethod(u8),
    #[error(transparent)]
    Decompression(#[from] InflateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    ZlibCompressed,
    International,
}

/// One decoded text chunk, `text` is already decompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub keyword: Vec<u8>,
    pub kind: TextKind,
    pub compressed: bool,
    pub language: Option<String>,
    pub translated_keyword: Option<String>,
    pub text: Vec<u8>,
}

// The only compression method PNG defines
const METHOD_ZLIB: u8 = 0;

fn split_nul(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = data.iter().position(|&b| b == 0)?;
    Some((&data[..pos], &data[pos + 1..]))
}

impl TextChunk {
    pub fn parse_text(data: &[u8]) -> Result<TextChunk, TextChunkError> {
        let (keyword, text) = split_nul(data).ok_or(TextChunkError::MissingKeywordTerminator)?;

        Ok(TextChunk {
            keyword: keyword.to_vec(),
            kind: TextKind::Plain,
            compressed: false,
            language: None,
            translated_keyword: None,
            text: text.to_vec(),
        })
    }

    pub fn parse_ztxt(data: &[u8], limit: usize) -> Result<TextChunk, TextChunkError> {
        let (keyword, rest) = split_nul(data).ok_or(TextChunkError::MissingKeywordTerminator)?;

        // Method byte plus at least one byte of stream
        let (method, payload) = match rest {
            [method, payload @ ..] if !payload.is_empty() => (*method, payload),
            _ => return Err(TextChunkError::Truncated),
        };
        if method != METHOD_ZLIB {
            return Err(TextChunkError::UnsupportedCompressionMethod(method));
        }

        Ok(TextChunk {
            keyword: keyword.to_vec(),
            kind: TextKind::ZlibCompressed,
            compressed: true,
            language: None,
            translated_keyword: None,
            text: inflate(payload, limit)?,
        })
    }

    /// Decompression failure is not an error here, the text is kept as the
    /// raw payload bytes.
    pub fn parse_itxt(data: &[u8], limit: usize) -> Result<TextChunk, TextChunkError> {
        let (keyword, rest) = split_nul(data).ok_or(TextChunkError::MissingKeywordTerminator)?;

        let (flag, method, rest) = match rest {
            [flag, method, rest @ ..] => (*flag, *method, rest),
            _ => return Err(TextChunkError::Truncated),
        };
        let (language, rest) = split_nul(rest).ok_or(TextChunkError::MissingLanguageTerminator)?;
        let (translated, text) =
            split_nul(rest).ok_or(TextChunkError::MissingTranslatedKeywordTerminator)?;

        let compressed = flag == 1 && method == METHOD_ZLIB;
        let text = if compressed {
            decode_lenient(text, limit)
        } else {
            text.to_vec()
        };

        Ok(TextChunk {
            keyword: keyword.to_vec(),
            kind: TextKind::International,
            compressed,
            language: Some(normalize(language)),
            translated_keyword: Some(normalize(translated)),
            text,
        })
    }

    pub fn keyword(&self) -> String {
        normalize(&self.keyword)
    }

    pub fn text(&self) -> String {
        normalize(&self.text)
    }
}

// Decode attempts for a compressed iTXt payload, first success wins. The
// last one cannot fail.
const LENIENT: &[fn(&[u8], usize) -> Option<Vec<u8>>] = &[inflated, stored];

fn inflated(data: &[u8], limit: usize) -> Option<Vec<u8>> {
    inflate(data, limit).ok()
}

fn stored(data: &[u8], _limit: usize) -> Option<Vec<u8>> {
    Some(data.to_vec())
}

fn decode_lenient(data: &[u8], limit: usize) -> Vec<u8> {
    LENIENT
        .iter()
        .find_map(|attempt| attempt(data, limit))
        .unwrap_or_default()
}

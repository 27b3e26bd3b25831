//! Read step: size ceiling, binary sniffing, decoding

use crate::features::parsing::{AnalysisError, AnalysisResult};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Bytes inspected for a NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8192;

pub const FALLBACK_ENCODING: &str = "iso-8859-1";

/// Decoded file content
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub size_bytes: u64,
    /// Set when the fallback decoder was used
    pub encoding: Option<&'static str>,
}

impl SourceText {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Size of the file on disk, checked before anything is read
pub fn file_size(path: &Path) -> AnalysisResult<u64> {
    Ok(fs::metadata(path)?.len())
}

pub fn read_source(path: &Path, max_size: u64, encoding_fallback: bool) -> AnalysisResult<SourceText> {
    let size = file_size(path)?;
    if size > max_size {
        return Err(AnalysisError::ResourceLimit { size, limit: max_size });
    }

    // The file may grow between stat and read
    let mut bytes = Vec::with_capacity(size as usize);
    File::open(path)?
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > max_size {
        return Err(AnalysisError::ResourceLimit {
            size: bytes.len() as u64,
            limit: max_size,
        });
    }

    let size_bytes = bytes.len() as u64;
    let (text, encoding) = decode(bytes, encoding_fallback)?;
    Ok(SourceText {
        text,
        size_bytes,
        encoding,
    })
}

/// UTF-8 (BOM stripped), or ISO-8859-1 when allowed
pub fn decode(mut bytes: Vec<u8>, encoding_fallback: bool) -> AnalysisResult<(String, Option<&'static str>)> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if let Some(offset) = sniff.iter().position(|&b| b == 0) {
        return Err(AnalysisError::Encoding(format!(
            "binary content (NUL byte at offset {})",
            offset
        )));
    }

    if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes.drain(..3);
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, None)),
        Err(e) if encoding_fallback => {
            // Every byte is a valid ISO-8859-1 code point
            let text = e.as_bytes().iter().map(|&b| b as char).collect();
            Ok((text, Some(FALLBACK_ENCODING)))
        }
        Err(e) => Err(AnalysisError::Encoding(format!(
            "content is not valid UTF-8 (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ))),
    }
}

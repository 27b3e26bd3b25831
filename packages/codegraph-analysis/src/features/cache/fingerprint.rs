//! Fingerprint utilities and cache key derivation
//!
//! The key pre-image is a fixed sequence of length-prefixed fields. Order
//! never depends on map iteration, so one logical input always hashes to
//! the same key.

use crate::features::cache::{CacheKey, CacheResult, Fingerprint};
use crate::shared::models::StructuralModel;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

/// Bumped whenever extraction output changes shape or meaning
pub const EXTRACTOR_VERSION: u32 = 1;

const KEY_DOMAIN: &[u8] = b"codegraph-analysis/cache-key";

impl Fingerprint {
    /// Compute from file path (streamed)
    pub fn from_file(path: impl AsRef<Path>) -> CacheResult<Self> {
        let mut file = File::open(path.as_ref())?;
        Ok(Self(hash_reader(&mut file)?))
    }

    /// Content hash plus mtime (ns) and size
    pub fn from_file_with_metadata(path: impl AsRef<Path>) -> CacheResult<(Self, u64, u64)> {
        let path = path.as_ref();
        let metadata = path.metadata()?;

        let mtime_ns = metadata
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_nanos() as u64;

        let mut file = File::open(path)?;
        let hash = hash_reader(&mut file)?;

        Ok((Self(hash), mtime_ns, metadata.len()))
    }
}

fn hash_reader(reader: &mut impl Read) -> std::io::Result<blake3::Hash> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Compact, canonical description of a StructuralModel
///
/// Counts and names only, never full text. A change in what extraction
/// produces changes the signature, which in turn invalidates old entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralSignature(String);

impl StructuralSignature {
    pub fn from_model(model: &StructuralModel) -> Self {
        let mut out = format!(
            "v{};f{};c{};i{};g{}",
            EXTRACTOR_VERSION,
            model.functions.len(),
            model.classes.len(),
            model.imports.len(),
            model.global_variables.len(),
        );

        out.push_str(";fn:");
        push_joined(&mut out, model.functions.iter().map(|f| f.name.as_str()));

        out.push_str(";cls:");
        for (i, class) in model.classes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&class.name);
            out.push('(');
            push_joined(&mut out, class.methods.iter().map(|m| m.name.as_str()));
            out.push(')');
        }

        out.push_str(";imp:");
        push_joined(&mut out, model.imports.iter().map(|i| i.module.as_str()));

        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_joined<'a>(out: &mut String, items: impl Iterator<Item = &'a str>) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(item);
    }
}

/// Every input that affects a cached enrichment result
#[derive(Debug, Clone)]
pub struct FingerprintInputs<'a> {
    pub content: &'a [u8],
    pub enrichment_config_id: &'a str,
    pub structural_signature: &'a StructuralSignature,
    pub schema_version: &'a str,
    /// Only set when keys are configured to be path-sensitive
    pub path: Option<&'a str>,
}

impl CacheKey {
    /// Derive the key. Field order is fixed; each field is length-prefixed so
    /// no two input tuples share a pre-image.
    pub fn derive(inputs: &FingerprintInputs<'_>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(KEY_DOMAIN);

        let content = normalize_content(inputs.content);
        update_field(&mut hasher, &content);
        update_field(&mut hasher, inputs.enrichment_config_id.as_bytes());
        update_field(&mut hasher, inputs.structural_signature.as_str().as_bytes());
        update_field(&mut hasher, inputs.schema_version.as_bytes());

        match inputs.path {
            Some(path) => {
                hasher.update(&[1]);
                update_field(&mut hasher, path.as_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }

        CacheKey::from_fingerprint(Fingerprint(hasher.finalize()))
    }
}

fn update_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Strip a UTF-8 BOM and fold CRLF to LF
pub fn normalize_content(content: &[u8]) -> Cow<'_, [u8]> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    if !content.windows(2).any(|w| w == b"\r\n") {
        return Cow::Borrowed(content);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut iter = content.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    Cow::Owned(out)
}

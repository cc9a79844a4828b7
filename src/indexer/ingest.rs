//! Reading one queued file into an `IndexedFile`
//!
//! # Decode policy
//!
//! File bytes are decoded as UTF-8 with invalid sequences **dropped**: the
//! valid text on either side is kept and nothing is substituted. A file whose
//! first 8 KiB contain a NUL byte is treated as binary and rejected, as is a
//! file above the configured size limit. Rejections are per-item failures.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use super::language::detect_language;
use crate::database::IndexedFile;

/// How much of the file is sniffed for NUL bytes
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Read `path` and build the record to store
pub fn read_indexed_file(path: &Path, max_file_size: u64) -> Result<IndexedFile> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to get metadata for {}", path.display()))?;

    if metadata.len() > max_file_size {
        bail!(
            "File too large ({} bytes, limit {} bytes)",
            metadata.len(),
            max_file_size
        );
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if looks_binary(&bytes) {
        bail!("Binary content");
    }

    let last_modified = metadata
        .modified()
        .ok()
        .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    Ok(IndexedFile {
        path: path.to_string_lossy().into_owned(),
        content: decode_lossy(&bytes),
        language: detect_language(path),
        last_modified,
        size: bytes.len() as u64,
    })
}

/// UTF-8 decode that drops malformed sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn looks_binary(bytes: &[u8]) -> bool {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    sniff.contains(&0)
}

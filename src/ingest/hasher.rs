use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use memmap2::MmapOptions;
use sha2::{Digest, Sha256};

use crate::error::{CatalogError, Result};

const MMAP_THRESHOLD: u64 = 500 * 1024 * 1024; // 500 MB
const CHUNK_SIZE: usize = 8192;

/// Hex-encoded SHA-256 of the full file content.
pub fn calculate_hash(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
    let len = file.metadata().map_err(|e| CatalogError::io(path, e))?.len();

    let mut hasher = Sha256::new();

    if len > MMAP_THRESHOLD {
        // The mapping is only read while the file stays open; a concurrent truncation would fault.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| CatalogError::io(path, e))?;
        hasher.update(&mmap[..]);
    } else {
        let mut reader = BufReader::new(file);
        let mut buffer = [0; CHUNK_SIZE];
        loop {
            let count = reader.read(&mut buffer).map_err(|e| CatalogError::io(path, e))?;
            if count == 0 {
                break;
            }
            hasher.update(&buffer[..count]);
        }
    }

    Ok(hex::encode(hasher.finalize()))
}

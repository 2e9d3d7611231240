//! Smart file reader with automatic decompression support.
//!
//! logrotate usually compresses older `wtmp` generations, so the rotated
//! family mixes plain and compressed files. This module reads all of them
//! the same way.
//!
//! # Supported Formats
//!
//! - Plain files
//! - Gzip compressed files (.gz)
//! - Zstandard compressed files (.zst)
//!
//! # Examples
//!
//! ```no_run
//! use access_audit::utils::reader::read_all;
//!
//! // Automatically handles .gz, .zst, or plain files
//! let bytes = read_all("/var/log/wtmp.1.gz").unwrap();
//! println!("{} bytes of login records", bytes.len());
//! ```

use crate::error::AuditError;
use crate::utils::format::format_number;
use crate::utils::progress::ProgressBar;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const READ_CHUNK: usize = 64 * 1024;

/// Opens a file with automatic decompression based on extension.
///
/// Detects file type by extension:
/// - `.gz` → Gzip decompression
/// - `.zst` → Zstandard decompression
/// - Otherwise → Plain file
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>, AuditError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| AuditError::io(path, err))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "gz" => {
            let decoder = GzDecoder::new(file);
            Ok(Box::new(decoder))
        }
        "zst" => {
            let decoder = zstd::Decoder::new(file).map_err(|err| AuditError::io(path, err))?;
            Ok(Box::new(decoder))
        }
        _ => Ok(Box::new(file)),
    }
}

/// Read a whole (possibly compressed) file into memory, showing progress on
/// stderr.
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<u8>, AuditError> {
    let path = path.as_ref();
    let mut reader = open_file(path)?;

    let label = format!("Reading {}", path.display());
    let file_size = std::fs::metadata(path).ok().map(|m| m.len() as usize);
    let is_plain = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("gz" | "zst")
    );
    // Compressed sizes don't match decoded byte counts
    let progress = match file_size {
        Some(size) if is_plain => ProgressBar::new(size, &label),
        _ => ProgressBar::new_spinner(&label),
    };

    let mut buffer = Vec::with_capacity(file_size.unwrap_or(0));
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let read = reader
            .read(&mut chunk)
            .map_err(|err| AuditError::io(path, err))?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        progress.update(buffer.len());
    }

    progress.finish_with_message(&format!(
        "Read {} bytes from {}",
        format_number(buffer.len()),
        path.display()
    ));
    Ok(buffer)
}

//! Input reading for raw model output.
//!
//! Reads a reply saved to disk, or standard input when no path is given.

use crate::error::{IoError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Maximum input size accepted (64MB). Model replies are far smaller.
const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024;

/// Reads a UTF-8 file into a string.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist, and
/// [`IoError::ReadFailed`] if it is too large, unreadable, or not UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if !path_ref.exists() {
        return Err(IoError::FileNotFound { path: path_str }.into());
    }

    let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;

    let size = file
        .metadata()
        .map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?
        .len();

    if size > MAX_INPUT_SIZE {
        return Err(IoError::ReadFailed {
            path: path_str,
            reason: format!("file too large: {size} bytes (max: {MAX_INPUT_SIZE} bytes)"),
        }
        .into());
    }

    read_utf8(file, &path_str)
}

/// Reads from `path`, or from stdin when `path` is `None` or `-`.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is not UTF-8.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => read_file(p),
        _ => read_utf8(std::io::stdin().lock(), "<stdin>"),
    }
}

fn read_utf8<R: Read>(reader: R, label: &str) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_INPUT_SIZE + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::ReadFailed {
            path: label.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() as u64 > MAX_INPUT_SIZE {
        return Err(IoError::ReadFailed {
            path: label.to_string(),
            reason: format!("input exceeds {MAX_INPUT_SIZE} bytes"),
        }
        .into());
    }

    String::from_utf8(bytes).map_err(|e| {
        IoError::ReadFailed {
            path: label.to_string(),
            reason: format!("invalid UTF-8: {e}"),
        }
        .into()
    })
}

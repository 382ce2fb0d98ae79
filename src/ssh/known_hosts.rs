// ABOUTME: Known-hosts bookkeeping for SSH host key verification.
// ABOUTME: Appends openssh-format entries to a file, skipping duplicates.

use super::error::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append `host <key_line>` to the file unless an equivalent entry exists.
///
/// The file and its parent directory are created on first use. Comparison
/// is line-based, ignoring surrounding whitespace and case.
pub fn record(path: &Path, host: &str, key_line: &str) -> Result<()> {
    let entry = format!("{} {}", host.trim(), key_line.trim());
    if contains(path, &entry)? {
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", entry)?;
    Ok(())
}

/// Whether the file already holds an entry equal to `line`.
/// A missing file holds nothing.
pub fn contains(path: &Path, line: &str) -> Result<bool> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let wanted = line.trim();
    Ok(contents
        .lines()
        .any(|existing| existing.trim().eq_ignore_ascii_case(wanted)))
}

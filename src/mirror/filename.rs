//! Destination filename sanitization and collision resolution.

use std::io;
use std::path::{Path, PathBuf};

/// Maximum length of a sanitized title, in characters.
const MAX_TITLE_CHARS: usize = 80;

/// Placeholder stem for items without a usable title.
const UNTITLED: &str = "Untitled";

/// Characters not accepted in filenames on at least one supported platform.
const ILLEGAL_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Sanitizes an item title into a filename stem.
///
/// Each illegal character becomes `_`, surrounding whitespace is trimmed and
/// the result is truncated to 80 characters. Absent titles, and titles that
/// sanitize to nothing, become the `Untitled` placeholder.
#[must_use]
pub fn sanitize_title(title: Option<&str>) -> String {
    let Some(raw) = title else {
        return UNTITLED.to_string();
    };

    let replaced: String = raw
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let stem: String = replaced.trim().chars().take(MAX_TITLE_CHARS).collect();

    if stem.is_empty() {
        UNTITLED.to_string()
    } else {
        stem
    }
}

/// A collision-free destination for one attachment.
#[derive(Debug)]
pub enum Destination {
    /// Nothing usable exists at this path yet; place the file here.
    New(PathBuf),
    /// An existing file at this path already resolves to the source.
    AlreadyPlaced(PathBuf),
}

/// Finds the destination path for an attachment with the given stem.
///
/// Starts at `<stem>.pdf` and appends `_1`, `_2`, ... while the candidate is
/// taken by a different file. A candidate whose canonical path equals the
/// source's means the attachment is already in place.
///
/// # Errors
///
/// Returns an IO error if canonicalizing an existing candidate or the source
/// fails.
pub fn resolve_destination(
    dest_dir: &Path,
    stem: &str,
    source: &Path,
) -> io::Result<Destination> {
    let mut candidate = dest_dir.join(format!("{stem}.pdf"));
    let mut counter: u32 = 1;

    loop {
        if !candidate.exists() {
            return Ok(Destination::New(candidate));
        }
        if candidate.canonicalize()? == source.canonicalize()? {
            return Ok(Destination::AlreadyPlaced(candidate));
        }
        candidate = dest_dir.join(format!("{stem}_{counter}.pdf"));
        counter += 1;
    }
}

//! Story file names derived from subject ids.
//!
//! Subject ids come from the outside world (usernames, display handles) and
//! may contain anything. Before one is used as a path component it is
//! transliterated to ASCII and stripped of characters filesystems reject.

use deunicode::deunicode;

use crate::story::SubjectId;

/// Extension of story files in a library directory.
pub const STORY_FILE_EXTENSION: &str = "json";

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum filename length for most filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Errors that can occur while naming a story file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("Subject id {0:?} has no usable characters for a file name")]
    Unusable(String),

    #[error("Filename too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },
}

/// Sanitizes a string for use as a file stem.
///
/// Applies the following transformations in order:
/// 1. Unicode → ASCII transliteration
/// 2. Whitespace → hyphens
/// 3. Invalid filesystem characters removed
/// 4. Multiple hyphens collapsed to single
/// 5. Leading/trailing dots, spaces, hyphens trimmed
/// 6. Windows reserved names prefixed with `_`
///
/// Returns an empty string when nothing survives.
pub fn sanitize(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;

    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if INVALID_CHARS.contains(&c) {
            continue;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '@' {
            result.push(c);
            last_was_hyphen = false;
        }
        // Anything else that survived deunicode is dropped
    }

    let trimmed = result.trim_matches(|c| c == '.' || c == ' ' || c == '-');
    handle_reserved_name(trimmed)
}

/// File name (`<stem>.json`) holding the stories of `subject`.
pub fn story_file_name(subject: &SubjectId) -> Result<String, FilenameError> {
    let stem = sanitize(subject.as_str());
    if stem.is_empty() {
        return Err(FilenameError::Unusable(subject.as_str().to_string()));
    }

    let name = format!("{}.{}", stem, STORY_FILE_EXTENSION);
    if name.len() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::TooLong {
            length: name.len(),
            max: MAX_FILENAME_LENGTH,
        });
    }
    Ok(name)
}

/// Checks if a name is a Windows reserved name and prefixes it if so.
///
/// Handles both exact matches (CON) and names with extensions (CON.txt).
fn handle_reserved_name(name: &str) -> String {
    let base_name = match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    };

    let upper = base_name.to_uppercase();
    if WINDOWS_RESERVED.iter().any(|reserved| upper == *reserved) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

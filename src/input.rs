//! Splitting freeform text into place names.

use crate::error::{InputError, MAX_ENTRIES};

/// Parse one place name per line.
///
/// Lines are trimmed and blank lines dropped. Order is kept and repeated
/// names are not collapsed.
pub fn parse_place_names(text: &str) -> Result<Vec<String>, InputError> {
    let names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if names.is_empty() {
        return Err(InputError::EmptyInput);
    }
    if names.len() > MAX_ENTRIES {
        return Err(InputError::TooManyEntries {
            count: names.len(),
            max: MAX_ENTRIES,
        });
    }
    Ok(names)
}

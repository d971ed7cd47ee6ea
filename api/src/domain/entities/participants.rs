//! Participant list normalization
//!
//! Turns the free text typed into the participant editor into the ordered
//! list of entrant names that the store accepts.

use crate::error::DomainError;

/// Default upper bound on the number of entrants in a single game
pub const DEFAULT_MAX_PARTICIPANTS: usize = 10_000;

/// Split raw text into participant names.
///
/// One name per line, surrounding whitespace trimmed, blank lines dropped.
/// Order is kept and duplicates are kept.
pub fn normalize_participants(raw: &str, max: usize) -> Result<Vec<String>, DomainError> {
    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    check_count(names.len(), max)?;
    Ok(names)
}

/// Validate an already-split list: every entry must be non-empty after trimming.
///
/// Returns the trimmed names.
pub fn validate_participants(list: Vec<String>, max: usize) -> Result<Vec<String>, DomainError> {
    check_count(list.len(), max)?;

    list.into_iter()
        .enumerate()
        .map(|(index, name)| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(DomainError::Validation(format!(
                    "participant #{} is empty",
                    index + 1
                )))
            } else if trimmed.len() == name.len() {
                Ok(name)
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

fn check_count(count: usize, max: usize) -> Result<(), DomainError> {
    if count > max {
        return Err(DomainError::Validation(format!(
            "too many participants: {} (maximum is {})",
            count, max
        )));
    }
    Ok(())
}

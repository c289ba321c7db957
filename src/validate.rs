//! Input validation at the CLI boundary.
//!
//! Status and priority arrive as free text. They are resolved here into the
//! closed model types so the store never sees an unrecognized value.
//! Three-tier resolution: exact match → synonym lookup → error with
//! suggestion.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{Priority, TicketStatus};

// ── Synonym maps ─────────────────────────────────────────────

/// Lowercased spellings accepted for each status, keyed to the status.
pub static STATUS_SYNONYMS: LazyLock<HashMap<&str, TicketStatus>> = LazyLock::new(|| {
    [
        ("to do", TicketStatus::ToDo),
        ("todo", TicketStatus::ToDo),
        ("to-do", TicketStatus::ToDo),
        ("to_do", TicketStatus::ToDo),
        ("open", TicketStatus::ToDo),
        ("new", TicketStatus::ToDo),
        ("pending", TicketStatus::ToDo),
        ("backlog", TicketStatus::ToDo),
        ("in progress", TicketStatus::InProgress),
        ("in-progress", TicketStatus::InProgress),
        ("in_progress", TicketStatus::InProgress),
        ("inprogress", TicketStatus::InProgress),
        ("wip", TicketStatus::InProgress),
        ("doing", TicketStatus::InProgress),
        ("started", TicketStatus::InProgress),
        ("active", TicketStatus::InProgress),
        ("done", TicketStatus::Done),
        ("complete", TicketStatus::Done),
        ("completed", TicketStatus::Done),
        ("finished", TicketStatus::Done),
        ("closed", TicketStatus::Done),
        ("resolved", TicketStatus::Done),
    ]
    .into_iter()
    .collect()
});

/// Priority names. TaskGenius: 1=highest, 5=lowest.
pub static PRIORITY_SYNONYMS: LazyLock<HashMap<&str, u8>> = LazyLock::new(|| {
    [
        ("highest", 1),
        ("critical", 1),
        ("urgent", 1),
        ("high", 2),
        ("important", 2),
        ("medium", 3),
        ("normal", 3),
        ("default", 3),
        ("low", 4),
        ("minor", 4),
        ("lowest", 5),
        ("trivial", 5),
    ]
    .into_iter()
    .collect()
});

/// Resolve a status from its display name or a synonym.
///
/// # Errors
///
/// Returns `Error::InvalidStatus` carrying the closest known spelling, if
/// any is within edit distance 3.
pub fn normalize_status(input: &str) -> Result<TicketStatus> {
    let lower = input.trim().to_lowercase();

    if let Some(&status) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Ok(status);
    }

    let suggestion = find_closest_status(&lower).map(|s| s.as_str().to_string());
    Err(Error::InvalidStatus {
        input: input.to_string(),
        suggestion,
    })
}

/// Resolve a priority from "1"-"5", "P1"-"P5", or a name.
///
/// # Errors
///
/// Returns `Error::InvalidPriority` for anything else.
pub fn normalize_priority(input: &str) -> Result<Priority> {
    let lower = input.trim().to_lowercase();

    let value = lower
        .parse::<u8>()
        .ok()
        .or_else(|| lower.strip_prefix('p').and_then(|n| n.parse::<u8>().ok()))
        .or_else(|| PRIORITY_SYNONYMS.get(lower.as_str()).copied());

    value
        .and_then(|v| Priority::try_from(v).ok())
        .ok_or_else(|| Error::InvalidPriority(input.to_string()))
}

/// Reject empty or whitespace-only required input.
///
/// # Errors
///
/// Returns `Error::RequiredField` naming the field.
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::RequiredField { field });
    }
    Ok(trimmed)
}

fn find_closest_status(input: &str) -> Option<TicketStatus> {
    STATUS_SYNONYMS
        .iter()
        .map(|(&spelling, &status)| (levenshtein_distance(input, spelling), spelling, status))
        .filter(|(dist, _, _)| *dist <= 3)
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, _, status)| status)
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing IDs similar to the searched ID.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("To Do").unwrap(), TicketStatus::ToDo);
        assert_eq!(normalize_status("todo").unwrap(), TicketStatus::ToDo);
        assert_eq!(normalize_status("IN PROGRESS").unwrap(), TicketStatus::InProgress);
        assert_eq!(normalize_status("wip").unwrap(), TicketStatus::InProgress);
        assert_eq!(normalize_status(" done ").unwrap(), TicketStatus::Done);
    }

    #[test]
    fn test_normalize_status_suggests() {
        match normalize_status("dnoe") {
            Err(Error::InvalidStatus { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("Done"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            normalize_status("archived-forever"),
            Err(Error::InvalidStatus { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_normalize_priority() {
        assert_eq!(normalize_priority("2").unwrap(), Priority::HIGH);
        assert_eq!(normalize_priority("P5").unwrap(), Priority::LOWEST);
        assert_eq!(normalize_priority("highest").unwrap(), Priority::HIGHEST);
        assert!(normalize_priority("0").is_err());
        assert!(normalize_priority("P9").is_err());
        assert!(normalize_priority("nonsense").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("title", "  X ").unwrap(), "X");
        assert!(matches!(
            require_non_empty("title", "   "),
            Err(Error::RequiredField { field: "title" })
        ));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_ids() {
        let ids = vec!["ticket_1".to_string(), "ticket_2".to_string(), "task_1".to_string()];
        let result = find_similar_ids("ticket_9", &ids, 3);
        assert_eq!(result, vec!["ticket_1", "ticket_2"]);
    }
}

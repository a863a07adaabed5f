//! Normalized substring filtering over student records.
//!
//! # Invariants
//! - Query and candidate text go through the same `normalize`.
//! - A blank query matches every record.
//! - Filtering keeps store order.

use crate::model::student::StudentRecord;

/// Trims, collapses internal whitespace runs to one space, and lower-cases.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns whether `record` matches an already-normalized query.
///
/// Candidates are the full name (`first last`), the email and the phone.
pub fn matches_normalized(record: &StudentRecord, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return true;
    }

    let full_name = format!(
        "{} {}",
        normalize(&record.first_name),
        normalize(&record.last_name)
    );
    full_name.contains(normalized_query)
        || normalize(&record.email).contains(normalized_query)
        || normalize(&record.phone).contains(normalized_query)
}

/// Returns whether `record` matches the raw user `query`.
pub fn matches(record: &StudentRecord, query: &str) -> bool {
    matches_normalized(record, &normalize(query))
}

/// Returns the records matching `query`, in their original order.
pub fn filter_records<'a>(records: &'a [StudentRecord], query: &str) -> Vec<&'a StudentRecord> {
    let normalized = normalize(query);
    records
        .iter()
        .filter(|record| matches_normalized(record, &normalized))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn normalize_trims_collapses_and_lowercases() {
        assert_eq!(normalize("  Jane \t  DOE\n"), "jane doe");
        assert_eq!(normalize("   "), "");
    }
}

use regex::Regex;
use std::sync::LazyLock;

use crate::models::RunIdentifier;

static RUN_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{8}-\d+)/?$").expect("run identifier pattern compiles"));

/// Pick the `count` most recent run identifiers out of a bucket listing,
/// returned oldest first. Entries that are not run directories are skipped.
pub fn resolve_run_identifiers<S: AsRef<str>>(listing: &[S], count: usize) -> Vec<RunIdentifier> {
    let mut identifiers: Vec<RunIdentifier> = listing
        .iter()
        .filter_map(|entry| RUN_ID_PATTERN.captures(entry.as_ref()))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    identifiers.sort_by(|a, b| b.cmp(a));
    identifiers.dedup();
    identifiers.truncate(count);
    identifiers.reverse();
    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[RunIdentifier]) -> Vec<&str> {
        v.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_most_recent_in_ascending_order() {
        let listing = ["20230101-1/", "20230101-10/", "20230102-1/", "notamatch/"];
        let resolved = resolve_run_identifiers(&listing, 2);
        assert_eq!(ids(&resolved), vec!["20230101-10", "20230102-1"]);
    }

    #[test]
    fn test_fewer_matches_than_requested() {
        let listing = ["20230105-0/", "logs/", "20230104-3"];
        let resolved = resolve_run_identifiers(&listing, 10);
        assert_eq!(ids(&resolved), vec!["20230104-3", "20230105-0"]);
    }

    #[test]
    fn test_empty_listing() {
        let listing: [&str; 0] = [];
        assert!(resolve_run_identifiers(&listing, 3).is_empty());
        assert!(resolve_run_identifiers(&["latest/", "README"], 3).is_empty());
    }

    #[test]
    fn test_rejects_partial_matches() {
        let listing = ["20230101-1/mlbf/", "x20230101-2/", "2023010-1/", "20230101-3/"];
        let resolved = resolve_run_identifiers(&listing, 5);
        assert_eq!(ids(&resolved), vec!["20230101-3"]);
    }

    #[test]
    fn test_sequence_ordering_within_day() {
        let listing = ["20230101-2/", "20230101-10/", "20230101-9/", "20221231-99/"];
        let resolved = resolve_run_identifiers(&listing, 3);
        assert_eq!(ids(&resolved), vec!["20230101-2", "20230101-9", "20230101-10"]);
    }

    #[test]
    fn test_seven_digit_sequence_is_newest() {
        let listing = ["20230101-999999/", "20230101-1000000/", "20230101-99999999999999999999999/"];
        let resolved = resolve_run_identifiers(&listing, 2);
        assert_eq!(ids(&resolved), vec!["20230101-1000000", "20230101-99999999999999999999999"]);
    }
}

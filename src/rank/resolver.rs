use serde::{Deserialize, Serialize};

use crate::db::models::RankOutcome;

/// One entry from a fetched result page, in page order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Finds the 1-based position of the first entry whose URL contains `target`
/// as a case-sensitive substring. No normalization is applied; the caller
/// decides what fragment identifies its page. Pure: same inputs, same answer.
pub fn resolve_rank(results: &[ResultEntry], target: &str) -> RankOutcome {
    for (index, entry) in results.iter().enumerate() {
        if entry.url.contains(target) {
            return RankOutcome::Ranked(index as u32 + 1);
        }
    }
    RankOutcome::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> ResultEntry {
        ResultEntry {
            url: url.to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn returns_first_match_position() {
        let results = vec![
            entry("other.com/a"),
            entry("example.com/gym"),
            entry("x.com/b"),
        ];
        assert_eq!(
            resolve_rank(&results, "example.com"),
            RankOutcome::Ranked(2)
        );
    }

    #[test]
    fn prefers_smallest_index_over_later_matches() {
        let results = vec![
            entry("example.com/pricing"),
            entry("example.com/about"),
        ];
        assert_eq!(
            resolve_rank(&results, "example.com"),
            RankOutcome::Ranked(1)
        );
    }

    #[test]
    fn absent_target_is_not_found() {
        let results = vec![entry("other.com/a"), entry("x.com/b")];
        assert_eq!(resolve_rank(&results, "example.com"), RankOutcome::NotFound);
    }

    #[test]
    fn empty_result_page_is_not_found() {
        assert_eq!(resolve_rank(&[], "example.com"), RankOutcome::NotFound);
    }

    #[test]
    fn match_is_case_sensitive() {
        let results = vec![entry("Example.com/gym")];
        assert_eq!(resolve_rank(&results, "example.com"), RankOutcome::NotFound);
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let results = vec![entry("a.com"), entry("example.com/x")];
        let first = resolve_rank(&results, "example.com");
        assert_eq!(first, resolve_rank(&results, "example.com"));
        assert_eq!(first, RankOutcome::Ranked(2));
    }
}

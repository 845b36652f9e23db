//! Ranking snapshot model matching the `top100` table.

use serde::{Deserialize, Serialize};

/// One repository in the ranking snapshot.
///
/// `position_prev` holds the position from the previous ingestion run, so a
/// client can render rank deltas without keeping history of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRecord {
    pub repo: String,
    pub owner: String,
    pub position_cur: i32,
    pub position_prev: i32,
    pub stars: i32,
    pub watchers: i32,
    pub forks: i32,
    pub open_issues: i32,
    pub language: Option<String>,
}

/// Closed set of fields the ranking endpoint can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Stars,
    Forks,
    OpenIssues,
    Watchers,
}

impl SortField {
    /// Column name used in ORDER BY clauses. Only values from this closed
    /// set ever reach the SQL layer.
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::Stars => "stars",
            SortField::Forks => "forks",
            SortField::OpenIssues => "open_issues",
            SortField::Watchers => "watchers",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stars" => Some(SortField::Stars),
            "forks" => Some(SortField::Forks),
            "open_issues" => Some(SortField::OpenIssues),
            "watchers" => Some(SortField::Watchers),
            _ => None,
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_round_trip() {
        for name in ["stars", "forks", "open_issues", "watchers"] {
            let field = SortField::from_str(name).unwrap();
            assert_eq!(field.as_column(), name);
        }
    }

    #[test]
    fn test_sort_field_rejects_unknown() {
        assert_eq!(SortField::from_str("language"), None);
        assert_eq!(SortField::from_str("stars; DROP TABLE top100"), None);
        assert_eq!(SortField::from_str(""), None);
    }

    #[test]
    fn test_repo_record_serialization() {
        let record = RepoRecord {
            repo: "go".to_string(),
            owner: "golang".to_string(),
            position_cur: 12,
            position_prev: 14,
            stars: 120000,
            watchers: 120000,
            forks: 17000,
            open_issues: 9000,
            language: Some("Go".to_string()),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["repo"], "go");
        assert_eq!(value["owner"], "golang");
        assert_eq!(value["position_cur"], 12);
        assert_eq!(value["position_prev"], 14);
        assert_eq!(value["open_issues"], 9000);
        assert_eq!(value["language"], "Go");
    }
}

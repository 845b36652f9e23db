//! Activity model matching the `activity` table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Commit activity of one repository on one calendar day.
///
/// `authors` is the de-duplicated set of author names that committed on that
/// day; the ingester never writes an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub commits: i32,
    pub authors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_record_serialization() {
        let record = ActivityRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            commits: 5,
            authors: vec!["a".to_string(), "b".to_string()],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["commits"], 5);
        assert_eq!(value["authors"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_activity_record_deserialization() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"date": "2024-02-29", "commits": 3, "authors": ["carol"]}"#,
        )
        .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(record.commits, 3);
        assert_eq!(record.authors, vec!["carol".to_string()]);
    }
}

//! GitHub REST API client.
//!
//! Fetches the star ranking via the search endpoint and commit activity via
//! the paginated commits endpoint, following the `Link` header for the page
//! count and throttling between pages to stay inside API rate limits.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::{DailyActivity, RepoInfo, RepoInfoSource};

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Max page size the commits endpoint allows.
const COMMITS_PER_PAGE: u32 = 100;

/// Pause between pagination requests.
const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Errors from the GitHub client.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// GitHub REST client implementing [`RepoInfoSource`].
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    /// Build a client for the given API base URL, optionally authenticated.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        // GitHub rejects requests without a User-Agent.
        headers.insert(USER_AGENT, HeaderValue::from_static("top100-backend"));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        if let Some(token) = token {
            if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        tracing::debug!("GithubClient initialized with base_url={}", base_url);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RepoInfoSource for GithubClient {
    async fn top_repositories(&self, limit: u32) -> Result<Vec<RepoInfo>, GithubError> {
        let url = format!("{}/search/repositories", self.base_url);
        tracing::debug!("Fetching top {} repositories from {}", limit, url);

        let per_page = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", "stars:>0"),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::Status {
                status: response.status(),
                url,
            });
        }

        let body: SearchResponse = response.json().await?;
        tracing::debug!("Fetched {} repositories", body.items.len());

        Ok(body
            .items
            .into_iter()
            .map(|item| RepoInfo {
                name: item.name,
                owner: item.owner.login,
                stars: item.stargazers_count,
                watchers: item.watchers_count,
                forks: item.forks_count,
                open_issues: item.open_issues_count,
                language: item.language,
            })
            .collect())
    }

    async fn repository_activity(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyActivity>, GithubError> {
        let url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = until.to_rfc3339_opts(SecondsFormat::Secs, true);
        tracing::debug!(
            "Fetching activity for {}/{} from {} to {}",
            owner,
            repo,
            since,
            until
        );

        let per_page = COMMITS_PER_PAGE.to_string();
        let mut commits: Vec<CommitEntry> = Vec::new();
        let mut page: u32 = 1;
        let mut last_page: Option<u32> = None;

        loop {
            let page_param = page.to_string();
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("since", since.as_str()),
                    ("until", until.as_str()),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(GithubError::Status {
                    status: response.status(),
                    url,
                });
            }

            if last_page.is_none() {
                let pages = response
                    .headers()
                    .get(LINK)
                    .and_then(|value| value.to_str().ok())
                    .map(last_page_number)
                    .unwrap_or(1);
                last_page = Some(pages);
                tracing::debug!("Found last page as {}", pages);
            }

            let batch: Vec<CommitEntry> = response.json().await?;
            tracing::debug!(
                "Fetched {} commits for {}/{}, total so far: {}",
                batch.len(),
                owner,
                repo,
                commits.len() + batch.len()
            );
            commits.extend(batch);

            if page >= last_page.unwrap_or(1) {
                break;
            }
            page += 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(group_by_day(&commits))
    }
}

/// Extract the last page number from a `Link` pagination header.
///
/// Returns 1 when the header has no `rel="last"` entry or its URL carries no
/// parseable `page` parameter.
fn last_page_number(link_header: &str) -> u32 {
    for link in link_header.split(',') {
        if !link.contains(r#"rel="last""#) {
            continue;
        }
        let Some(url) = link.split(';').next() else {
            continue;
        };
        let url = url.trim().trim_start_matches('<').trim_end_matches('>');
        let Some((_, query)) = url.split_once('?') else {
            continue;
        };
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("page=") {
                if let Ok(page) = value.parse() {
                    return page;
                }
            }
        }
    }
    1
}

/// Group raw commits into per-day activity with de-duplicated author names.
fn group_by_day(commits: &[CommitEntry]) -> Vec<DailyActivity> {
    let mut days: BTreeMap<NaiveDate, (i32, BTreeSet<String>)> = BTreeMap::new();

    for entry in commits {
        let date = entry.commit.author.date.date_naive();
        let (count, authors) = days.entry(date).or_default();
        *count += 1;
        authors.insert(entry.commit.author.name.clone());
    }

    days.into_iter()
        .map(|(date, (commits, authors))| DailyActivity {
            date,
            commits,
            authors: authors.into_iter().collect(),
        })
        .collect()
}

// Wire types for the subset of the GitHub responses we read.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    name: String,
    owner: RepoOwner,
    stargazers_count: i32,
    watchers_count: i32,
    forks_count: i32,
    open_issues_count: i32,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
    date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(name: &str, date: &str) -> CommitEntry {
        CommitEntry {
            commit: CommitDetail {
                author: CommitAuthor {
                    name: name.to_string(),
                    date: date.parse().unwrap(),
                },
            },
        }
    }

    #[test]
    fn test_last_page_number() {
        let header = r#"<https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=14>; rel="last""#;
        assert_eq!(last_page_number(header), 14);
    }

    #[test]
    fn test_last_page_number_with_extra_params() {
        let header = r#"<https://api.github.com/repos/o/r/commits?per_page=100&page=3>; rel="last""#;
        assert_eq!(last_page_number(header), 3);
    }

    #[test]
    fn test_last_page_number_defaults_to_one() {
        assert_eq!(last_page_number(""), 1);
        assert_eq!(
            last_page_number(r#"<https://api.github.com/x?page=5>; rel="prev""#),
            1
        );
        assert_eq!(last_page_number(r#"<https://no-query>; rel="last""#), 1);
    }

    #[test]
    fn test_group_by_day_counts_and_dedupes() {
        let commits = vec![
            commit("alice", "2024-01-01T09:00:00Z"),
            commit("bob", "2024-01-01T10:30:00Z"),
            commit("alice", "2024-01-01T23:59:59Z"),
            commit("carol", "2024-01-03T00:00:00Z"),
        ];

        let days = group_by_day(&commits);
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[0].commits, 3);
        assert_eq!(days[0].authors, vec!["alice".to_string(), "bob".to_string()]);

        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(days[1].commits, 1);
        assert_eq!(days[1].authors, vec!["carol".to_string()]);
    }

    #[test]
    fn test_group_by_day_empty() {
        assert!(group_by_day(&[]).is_empty());
    }

    #[test]
    fn test_commit_entry_deserialization() {
        let raw = r#"{
            "sha": "abc123",
            "commit": {
                "author": { "name": "Linus", "email": "l@example.com", "date": "2024-05-01T12:00:00Z" },
                "message": "fix things"
            }
        }"#;
        let entry: CommitEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.commit.author.name, "Linus");
        assert_eq!(
            entry.commit.author.date.date_naive(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_search_response_deserialization() {
        let raw = r#"{
            "total_count": 1,
            "items": [{
                "name": "linux",
                "owner": { "login": "torvalds" },
                "stargazers_count": 170000,
                "watchers_count": 170000,
                "forks_count": 53000,
                "open_issues_count": 300,
                "language": "C"
            }]
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].owner.login, "torvalds");
        assert_eq!(body.items[0].language.as_deref(), Some("C"));
    }
}

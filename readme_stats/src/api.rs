use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use strum_macros::EnumString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Profile of user {0} is unavailable")]
    ProfileUnavailable(String),
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct UserProfile {
    pub login: String,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub language: Option<String>,
    /// Size as reported by the provider, used as the language weight.
    pub size: u64,
    pub fork: bool,
    pub private: bool,
}

/// `author` is `None` when the commit is not linked to an account.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct CommitRecord {
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct PullRequestRecord {
    pub author: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRecord {
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Constructor)]
pub struct LanguageShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, strum_macros::Display)]
pub enum RankLevel {
    #[strum(serialize = "Junior Developer")]
    Junior,
    #[strum(serialize = "Rising Developer")]
    Rising,
    #[strum(serialize = "Active Developer")]
    Active,
    #[strum(serialize = "Senior Developer")]
    Senior,
    #[strum(serialize = "Expert Developer")]
    Expert,
}

impl Serialize for RankLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Constructor)]
pub struct UserRank {
    pub level: RankLevel,
}

/// Result of a single stats run. Fields are only readable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Constructor)]
pub struct StatsSnapshot {
    user_rank: UserRank,
    total_stargazers: u64,
    total_commits_last_year: u64,
    total_pull_requests_made: u64,
    pull_requests_merge_percentage: f64,
    total_repo_contributions: u64,
    languages_sorted: Vec<LanguageShare>,
}

impl StatsSnapshot {
    pub fn user_rank(&self) -> &UserRank {
        &self.user_rank
    }

    /// Follower count of the user.
    pub fn total_stargazers(&self) -> u64 {
        self.total_stargazers
    }

    pub fn total_commits_last_year(&self) -> u64 {
        self.total_commits_last_year
    }

    pub fn total_pull_requests_made(&self) -> u64 {
        self.total_pull_requests_made
    }

    pub fn pull_requests_merge_percentage(&self) -> f64 {
        self.pull_requests_merge_percentage
    }

    /// Public repository count of the user.
    pub fn total_repo_contributions(&self) -> u64 {
        self.total_repo_contributions
    }

    pub fn languages_sorted(&self) -> &[LanguageShare] {
        &self.languages_sorted
    }
}

impl Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let top_languages = self
            .languages_sorted
            .iter()
            .take(5)
            .map(|language| language.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "User Rating: {}", self.user_rank.level)?;
        writeln!(f, "Total Stars Earned: {}", self.total_stargazers)?;
        writeln!(f, "Total Commits (last year): {}", self.total_commits_last_year)?;
        writeln!(f, "Total PRs: {}", self.total_pull_requests_made)?;
        writeln!(f, "Merged PR %: {}", self.pull_requests_merge_percentage)?;
        writeln!(f, "Total Contributions: {}", self.total_repo_contributions)?;
        write!(f, "Top Languages: {}", top_languages)
    }
}

/// Read-only access to the GitHub REST API.
///
/// Implementations never fail: a request that cannot be completed yields `None` or an empty list,
/// which callers treat as "no data".
#[async_trait]
pub trait Client: Send + Sync {
    const FIRST_PAGE_NUMBER: u32 = 1;
    const MAX_PAGE_SIZE: u32 = 100;

    async fn user_profile(&self, username: &str) -> Option<UserProfile>;

    async fn user_repos(&self, username: &str, page: u32, per_page: u32) -> Vec<Repository>;

    async fn repo_commits(&self, repo: &Repository, since: DateTime<Utc>, per_page: u32) -> Vec<CommitRecord>;

    async fn repo_pulls(&self, repo: &Repository, per_page: u32) -> Vec<PullRequestRecord>;
}

#[test]
fn rank_level_names_test() {
    use std::str::FromStr;
    assert_eq!(RankLevel::Expert.to_string(), "Expert Developer");
    assert_eq!(RankLevel::from_str("Rising Developer").unwrap(), RankLevel::Rising);
    assert!(RankLevel::Junior < RankLevel::Rising);
    assert!(RankLevel::Senior < RankLevel::Expert);
}

#[test]
fn snapshot_display_test() {
    let snapshot = StatsSnapshot::new(
        UserRank::new(RankLevel::Senior),
        3,
        120,
        4,
        50.0,
        8,
        vec![LanguageShare::new("Rust".to_string(), 60.0), LanguageShare::new("Go".to_string(), 40.0)],
    );
    let text = snapshot.to_string();
    assert!(text.contains("User Rating: Senior Developer"));
    assert!(text.contains("Total Stars Earned: 3"));
    assert!(text.contains("Total Commits (last year): 120"));
    assert!(text.contains("Total PRs: 4"));
    assert!(text.contains("Merged PR %: 50"));
    assert!(text.contains("Total Contributions: 8"));
    assert!(text.ends_with("Top Languages: Rust, Go"));
}

#[test]
fn error_messages_test() {
    assert_eq!(
        Error::ProfileUnavailable("octocat".to_string()).to_string(),
        "Profile of user octocat is unavailable"
    );
    let other: Error = anyhow::anyhow!("broken header").into();
    assert_eq!(other.to_string(), "broken header");
}

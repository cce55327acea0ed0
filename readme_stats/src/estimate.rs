//! Commit and pull request estimates.
//!
//! Two strategies are available. [`EstimationStrategy::Quick`] derives both numbers from the public repository
//! count alone and costs no extra request. [`EstimationStrategy::Sampled`] queries the commits and pull requests
//! of the first few repositories, bounded by [`SamplingBounds`].

use crate::api::{Client, Repository};
use chrono::{DateTime, Duration, Utc};
use derive_more::Constructor;
use log::debug;
use strum_macros::{Display, EnumString};

pub const DEFAULT_COMMIT_SAMPLE: usize = 20;
pub const DEFAULT_PULL_REQUEST_SAMPLE: usize = 10;

const QUICK_COMMITS_PER_REPO: u64 = 15;
const QUICK_PULL_REQUESTS_PER_REPO: u64 = 2;
const QUICK_MERGE_PERCENTAGE: f64 = 75.0;
const COMMIT_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EstimationStrategy {
    #[default]
    Quick,
    Sampled,
}

/// How many leading repositories are queried for each per-repository metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct SamplingBounds {
    pub commit_repos: usize,
    pub pull_request_repos: usize,
}

impl Default for SamplingBounds {
    fn default() -> Self {
        SamplingBounds::new(DEFAULT_COMMIT_SAMPLE, DEFAULT_PULL_REQUEST_SAMPLE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct PullRequestStats {
    pub total: u64,
    pub merge_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct Estimates {
    pub commits_last_year: u64,
    pub pull_requests: PullRequestStats,
}

pub fn commit_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(COMMIT_WINDOW_DAYS)
}

/// Fixed per-repository ratios.
pub fn quick_estimates(public_repos: u64) -> Estimates {
    let pull_requests = public_repos.saturating_mul(QUICK_PULL_REQUESTS_PER_REPO);
    let merge_percentage = if pull_requests > 0 { QUICK_MERGE_PERCENTAGE } else { 0.0 };
    Estimates::new(
        public_repos.saturating_mul(QUICK_COMMITS_PER_REPO),
        PullRequestStats::new(pull_requests, merge_percentage),
    )
}

/// Commits authored by `username` since `since`, summed over the first `bound` repositories.
///
/// Commits without a linked account are not attributed to anyone.
pub async fn estimate_commits<CLIENT: Client>(
    client: &CLIENT,
    username: &str,
    repos: &[Repository],
    bound: usize,
    since: DateTime<Utc>,
) -> u64 {
    let mut total = 0u64;
    for repo in repos.iter().take(bound) {
        let authored = client
            .repo_commits(repo, since, CLIENT::MAX_PAGE_SIZE)
            .await
            .iter()
            .filter(|commit| commit.author.as_deref() == Some(username))
            .count() as u64;
        debug!("{} commits by {} in {}", authored, username, repo.name);
        total = total.saturating_add(authored);
    }
    total
}

/// Pull requests opened by `username` over the first `bound` repositories, and the merged share of them.
pub async fn aggregate_pull_requests<CLIENT: Client>(
    client: &CLIENT,
    username: &str,
    repos: &[Repository],
    bound: usize,
) -> PullRequestStats {
    let mut total = 0u64;
    let mut merged = 0u64;
    for repo in repos.iter().take(bound) {
        let pulls = client.repo_pulls(repo, CLIENT::MAX_PAGE_SIZE).await;
        for pull in pulls.iter().filter(|pull| pull.author.as_deref() == Some(username)) {
            total += 1;
            if pull.is_merged() {
                merged += 1;
            }
        }
    }
    PullRequestStats::new(total, merge_percentage(merged, total))
}

/// Share of merged pull requests in [0, 100], 0 when there are none.
pub fn merge_percentage(merged: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let merged = std::cmp::min(merged, total);
    merged as f64 / total as f64 * 100.0
}

/// Tests

#[cfg(test)]
use crate::fake::{commit, pull, repo, FakeClient};

#[test]
fn merge_percentage_no_pull_requests_test() {
    assert_eq!(merge_percentage(0, 0), 0.0);
}

#[test]
fn merge_percentage_range_test() {
    for total in 0..30u64 {
        for merged in 0..=total {
            let percentage = merge_percentage(merged, total);
            assert!((0.0..=100.0).contains(&percentage), "{}/{} -> {}", merged, total, percentage);
        }
    }
    assert_eq!(merge_percentage(3, 3), 100.0);
    assert_eq!(merge_percentage(1, 4), 25.0);
    assert!((merge_percentage(1, 3) - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn quick_estimates_test() {
    let estimates = quick_estimates(10);
    assert_eq!(estimates.commits_last_year, 150);
    assert_eq!(estimates.pull_requests, PullRequestStats::new(20, 75.0));

    let estimates = quick_estimates(0);
    assert_eq!(estimates, Estimates::new(0, PullRequestStats::new(0, 0.0)));
}

#[test]
fn strategy_from_str_test() {
    use std::str::FromStr;
    assert_eq!(EstimationStrategy::from_str("quick").unwrap(), EstimationStrategy::Quick);
    assert_eq!(EstimationStrategy::from_str("sampled").unwrap(), EstimationStrategy::Sampled);
    assert!(EstimationStrategy::from_str("exact").is_err());
    assert_eq!(EstimationStrategy::Sampled.to_string(), "sampled");
}

#[test]
fn commit_window_test() {
    let now = Utc::now();
    assert_eq!(now - commit_window_start(now), Duration::days(365));
}

#[cfg(test)]
#[tokio::test]
async fn estimate_commits_counts_only_authored_test() {
    let client = FakeClient::default()
        .commits("a", vec![commit(Some("octocat")), commit(Some("someone")), commit(None)])
        .commits("b", vec![commit(Some("octocat")), commit(Some("octocat"))]);
    let repos = vec![repo("a", None, 0), repo("b", None, 0)];
    let commits = estimate_commits(&client, "octocat", &repos, 20, Utc::now()).await;
    assert_eq!(commits, 3);
}

#[cfg(test)]
#[tokio::test]
async fn estimate_commits_respects_bound_test() {
    let client = FakeClient::with_repos(25).commits("repo_22", vec![commit(Some("octocat"))]);
    let repos = crate::paginator::user_repos(&client, "octocat").await;
    let commits = estimate_commits(&client, "octocat", &repos, DEFAULT_COMMIT_SAMPLE, Utc::now()).await;
    assert_eq!(commits, 0, "repositories past the bound are not queried");
    assert_eq!(client.commit_queries().len(), 20);
    assert_eq!(client.commit_queries().last().map(String::as_str), Some("repo_19"));
}

#[cfg(test)]
#[tokio::test]
async fn estimate_commits_empty_repos_test() {
    let client = FakeClient::default();
    assert_eq!(estimate_commits(&client, "octocat", &[], 20, Utc::now()).await, 0);
    assert!(client.commit_queries().is_empty());
}

#[cfg(test)]
#[tokio::test]
async fn aggregate_pull_requests_test() {
    let client = FakeClient::default()
        .pulls("a", vec![pull("octocat", true), pull("octocat", false), pull("someone", true)])
        .pulls("b", vec![pull("octocat", true), pull("octocat", true)]);
    let repos = vec![repo("a", None, 0), repo("b", None, 0)];
    let stats = aggregate_pull_requests(&client, "octocat", &repos, 10).await;
    assert_eq!(stats.total, 4);
    assert_eq!(stats.merge_percentage, 75.0);
}

#[cfg(test)]
#[tokio::test]
async fn aggregate_pull_requests_none_found_test() {
    let client = FakeClient::with_repos(3);
    let repos = crate::paginator::user_repos(&client, "octocat").await;
    let stats = aggregate_pull_requests(&client, "octocat", &repos, 10).await;
    assert_eq!(stats, PullRequestStats::new(0, 0.0));
}

#[cfg(test)]
#[tokio::test]
async fn aggregate_pull_requests_respects_bound_test() {
    let client = FakeClient::with_repos(15);
    let repos = crate::paginator::user_repos(&client, "octocat").await;
    aggregate_pull_requests(&client, "octocat", &repos, DEFAULT_PULL_REQUEST_SAMPLE).await;
    let expected: Vec<_> = (0..10).map(|i| format!("repo_{}", i)).collect();
    assert_eq!(client.pull_queries(), expected);
}

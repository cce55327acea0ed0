use crate::api::{Client, Error, Result, StatsSnapshot, UserRank};
use crate::estimate::{
    aggregate_pull_requests, commit_window_start, estimate_commits, quick_estimates, Estimates, EstimationStrategy,
    SamplingBounds,
};
use crate::languages::language_distribution;
use crate::paginator;
use crate::rank::rank_level;
use chrono::Utc;
use log::{info, warn};

/// Assembles a [`StatsSnapshot`] for one user from a [`Client`].
///
/// Requests are issued one after another; nothing runs concurrently.
pub struct StatsCalculator<CLIENT: Client> {
    client: CLIENT,
    username: String,
    bounds: SamplingBounds,
    strategy: EstimationStrategy,
}

impl<CLIENT: Client> StatsCalculator<CLIENT> {
    pub fn new(client: CLIENT, username: impl Into<String>, bounds: SamplingBounds, strategy: EstimationStrategy) -> Self {
        StatsCalculator {
            client,
            username: username.into(),
            bounds,
            strategy,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fails with [`Error::ProfileUnavailable`] when the user profile cannot be fetched. Every other missing piece
    /// of data degrades to zero or empty.
    pub async fn calculate(&self) -> Result<StatsSnapshot> {
        info!("Fetching profile of {}", self.username);
        let profile = match self.client.user_profile(&self.username).await {
            Some(profile) => profile,
            None => {
                warn!("Failed to fetch profile of {}", self.username);
                return Err(Error::ProfileUnavailable(self.username.clone()));
            }
        };
        info!(
            "Profile of {}: {} followers, {} public repositories",
            profile.login, profile.followers, profile.public_repos
        );

        let repos = paginator::user_repos(&self.client, &self.username).await;
        info!("Found {} repositories", repos.len());

        let estimates = match self.strategy {
            EstimationStrategy::Quick => quick_estimates(profile.public_repos),
            EstimationStrategy::Sampled => {
                let since = commit_window_start(Utc::now());
                let commits =
                    estimate_commits(&self.client, &self.username, &repos, self.bounds.commit_repos, since).await;
                let pull_requests =
                    aggregate_pull_requests(&self.client, &self.username, &repos, self.bounds.pull_request_repos).await;
                Estimates::new(commits, pull_requests)
            }
        };
        info!(
            "Estimated ({}) {} commits and {} pull requests",
            self.strategy, estimates.commits_last_year, estimates.pull_requests.total
        );

        let languages = language_distribution(&repos);
        let level = rank_level(estimates.commits_last_year, profile.followers, profile.public_repos);

        Ok(StatsSnapshot::new(
            UserRank::new(level),
            profile.followers,
            estimates.commits_last_year,
            estimates.pull_requests.total,
            estimates.pull_requests.merge_percentage,
            profile.public_repos,
            languages,
        ))
    }
}

/// Tests

#[cfg(test)]
use crate::{
    api::{LanguageShare, RankLevel},
    fake::{commit, pull, repo, FakeClient},
};

#[cfg(test)]
#[tokio::test]
async fn missing_profile_test() {
    let calculator = StatsCalculator::new(
        FakeClient::with_repos(3),
        "octocat",
        SamplingBounds::default(),
        EstimationStrategy::Quick,
    );
    let result = calculator.calculate().await;
    assert!(matches!(result, Err(Error::ProfileUnavailable(user)) if user == "octocat"));
}

#[cfg(test)]
#[tokio::test]
async fn quick_strategy_test() {
    let client = FakeClient::default()
        .profile(10, 5)
        .repos(vec![repo("a", Some("Python"), 300), repo("b", Some("JavaScript"), 100)])
        .commits("a", vec![commit(Some("octocat"))]);
    let calculator = StatsCalculator::new(client, "octocat", SamplingBounds::default(), EstimationStrategy::Quick);
    let snapshot = calculator.calculate().await.unwrap();

    assert_eq!(snapshot.total_stargazers(), 10);
    assert_eq!(snapshot.total_commits_last_year(), 75);
    assert_eq!(snapshot.total_pull_requests_made(), 10);
    assert_eq!(snapshot.pull_requests_merge_percentage(), 75.0);
    assert_eq!(snapshot.total_repo_contributions(), 5);
    // 75 + 100 + 25
    assert_eq!(snapshot.user_rank().level, RankLevel::Rising);
    assert_eq!(
        snapshot.languages_sorted(),
        &[
            LanguageShare::new("Python".to_string(), 75.0),
            LanguageShare::new("JavaScript".to_string(), 25.0)
        ]
    );
    assert!(calculator.client.commit_queries().is_empty());
    assert!(calculator.client.pull_queries().is_empty());
}

#[cfg(test)]
#[tokio::test]
async fn sampled_strategy_test() {
    let mut commits = vec![commit(Some("octocat")); 600];
    commits.push(commit(Some("someone")));
    let client = FakeClient::default()
        .profile(10, 5)
        .repos(vec![repo("a", Some("Rust"), 10), repo("b", None, 10)])
        .commits("a", commits)
        .pulls("b", vec![pull("octocat", true), pull("octocat", false)]);
    let calculator = StatsCalculator::new(client, "octocat", SamplingBounds::default(), EstimationStrategy::Sampled);
    let snapshot = calculator.calculate().await.unwrap();

    assert_eq!(snapshot.total_commits_last_year(), 600);
    assert_eq!(snapshot.total_pull_requests_made(), 2);
    assert_eq!(snapshot.pull_requests_merge_percentage(), 50.0);
    assert_eq!(snapshot.user_rank().level, RankLevel::Senior);
    assert_eq!(snapshot.languages_sorted(), &[LanguageShare::new("Rust".to_string(), 100.0)]);
}

#[cfg(test)]
#[tokio::test]
async fn sampled_strategy_without_repositories_test() {
    let client = FakeClient::default().profile(2, 0).failing_repo_pages();
    let calculator = StatsCalculator::new(client, "octocat", SamplingBounds::new(1, 1), EstimationStrategy::Sampled);
    let snapshot = calculator.calculate().await.unwrap();

    assert_eq!(snapshot.total_commits_last_year(), 0);
    assert_eq!(snapshot.total_pull_requests_made(), 0);
    assert_eq!(snapshot.pull_requests_merge_percentage(), 0.0);
    assert!(snapshot.languages_sorted().is_empty());
    assert_eq!(snapshot.user_rank().level, RankLevel::Junior);
}

#[cfg(test)]
#[tokio::test]
async fn custom_bounds_test() {
    let client = FakeClient::with_repos(8).profile(0, 8);
    let calculator = StatsCalculator::new(client, "octocat", SamplingBounds::new(3, 2), EstimationStrategy::Sampled);
    calculator.calculate().await.unwrap();
    assert_eq!(calculator.client.commit_queries(), vec!["repo_0", "repo_1", "repo_2"]);
    assert_eq!(calculator.client.pull_queries(), vec!["repo_0", "repo_1"]);
}

use crate::api::{Client, LanguageShare, RankLevel, StatsSnapshot, UserRank};
use crate::calculator::StatsCalculator;
use derive_more::Constructor;
use log::{info, warn};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SnapshotOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct SourcedSnapshot {
    pub origin: SnapshotOrigin,
    pub snapshot: StatsSnapshot,
}

/// Where the snapshot comes from. `Live` degrades to the fallback snapshot when it fails.
pub enum StatsSource<CLIENT: Client> {
    Live(StatsCalculator<CLIENT>),
    Fallback,
}

impl<CLIENT: Client> StatsSource<CLIENT> {
    pub async fn snapshot(&self) -> SourcedSnapshot {
        match self {
            StatsSource::Live(calculator) => match calculator.calculate().await {
                Ok(snapshot) => {
                    info!("Using live stats of {}", calculator.username());
                    SourcedSnapshot::new(SnapshotOrigin::Live, snapshot)
                }
                Err(err) => {
                    warn!("Failed to calculate live stats: {}. Using fallback stats.", err);
                    SourcedSnapshot::new(SnapshotOrigin::Fallback, fallback_snapshot())
                }
            },
            StatsSource::Fallback => {
                warn!("Using fallback stats");
                SourcedSnapshot::new(SnapshotOrigin::Fallback, fallback_snapshot())
            }
        }
    }
}

/// Fixed, non-live stats.
pub fn fallback_snapshot() -> StatsSnapshot {
    let languages = [("Python", 35.0), ("JavaScript", 25.0), ("HTML", 20.0), ("CSS", 15.0), ("TypeScript", 5.0)]
        .into_iter()
        .map(|(name, percentage)| LanguageShare::new(name.to_string(), percentage))
        .collect();
    StatsSnapshot::new(UserRank::new(RankLevel::Active), 11, 156, 23, 85.0, 10, languages)
}

/// Tests

#[cfg(test)]
use crate::{
    estimate::{EstimationStrategy, SamplingBounds},
    fake::FakeClient,
};

#[test]
fn fallback_snapshot_test() {
    let snapshot = fallback_snapshot();
    assert_eq!(snapshot.user_rank().level, RankLevel::Active);
    assert_eq!(snapshot.total_stargazers(), 11);
    assert_eq!(snapshot.total_commits_last_year(), 156);
    assert_eq!(snapshot.total_pull_requests_made(), 23);
    assert_eq!(snapshot.pull_requests_merge_percentage(), 85.0);
    assert_eq!(snapshot.total_repo_contributions(), 10);
    let names: Vec<_> = snapshot.languages_sorted().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Python", "JavaScript", "HTML", "CSS", "TypeScript"]);
}

#[cfg(test)]
#[tokio::test]
async fn fallback_source_test() {
    let source: StatsSource<FakeClient> = StatsSource::Fallback;
    let sourced = source.snapshot().await;
    assert_eq!(sourced.origin, SnapshotOrigin::Fallback);
    assert_eq!(sourced.snapshot, fallback_snapshot());
}

#[cfg(test)]
#[tokio::test]
async fn live_source_without_profile_falls_back_test() {
    let calculator = StatsCalculator::new(
        FakeClient::default(),
        "octocat",
        SamplingBounds::default(),
        EstimationStrategy::Quick,
    );
    let sourced = StatsSource::Live(calculator).snapshot().await;
    assert_eq!(sourced.origin, SnapshotOrigin::Fallback);
    assert_eq!(sourced.snapshot.total_stargazers(), 11);
    assert_eq!(sourced.snapshot.user_rank().level, RankLevel::Active);
}

#[cfg(test)]
#[tokio::test]
async fn live_source_test() {
    let calculator = StatsCalculator::new(
        FakeClient::with_repos(1).profile(3, 1),
        "octocat",
        SamplingBounds::default(),
        EstimationStrategy::Quick,
    );
    let sourced = StatsSource::Live(calculator).snapshot().await;
    assert_eq!(sourced.origin, SnapshotOrigin::Live);
    assert_eq!(sourced.snapshot.total_stargazers(), 3);
}

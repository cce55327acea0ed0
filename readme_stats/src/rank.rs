use crate::api::RankLevel;

const FOLLOWER_WEIGHT: u64 = 10;
const REPO_WEIGHT: u64 = 5;

/// Exclusive lower score bounds, highest first.
const THRESHOLDS: [(u64, RankLevel); 4] = [
    (1000, RankLevel::Expert),
    (500, RankLevel::Senior),
    (200, RankLevel::Active),
    (50, RankLevel::Rising),
];

pub fn score(commits: u64, followers: u64, repos: u64) -> u64 {
    commits
        .saturating_add(followers.saturating_mul(FOLLOWER_WEIGHT))
        .saturating_add(repos.saturating_mul(REPO_WEIGHT))
}

pub fn rank_level(commits: u64, followers: u64, repos: u64) -> RankLevel {
    let score = score(commits, followers, repos);
    THRESHOLDS
        .iter()
        .find(|(threshold, _)| score > *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(RankLevel::Junior)
}

/// Tests

#[test]
fn senior_test() {
    assert_eq!(score(600, 10, 5), 725);
    assert_eq!(rank_level(600, 10, 5), RankLevel::Senior);
}

#[test]
fn boundaries_test() {
    assert_eq!(rank_level(1000, 0, 0), RankLevel::Senior);
    assert_eq!(rank_level(1001, 0, 0), RankLevel::Expert);
    assert_eq!(rank_level(500, 0, 0), RankLevel::Active);
    assert_eq!(rank_level(501, 0, 0), RankLevel::Senior);
    assert_eq!(rank_level(200, 0, 0), RankLevel::Rising);
    assert_eq!(rank_level(201, 0, 0), RankLevel::Active);
    assert_eq!(rank_level(50, 0, 0), RankLevel::Junior);
    assert_eq!(rank_level(51, 0, 0), RankLevel::Rising);
    assert_eq!(rank_level(0, 0, 0), RankLevel::Junior);
}

#[test]
fn saturates_test() {
    assert_eq!(score(u64::MAX, u64::MAX, u64::MAX), u64::MAX);
    assert_eq!(rank_level(u64::MAX, 1, 1), RankLevel::Expert);
}

#[test]
fn monotonic_test() {
    let values = [0u64, 1, 5, 10, 20, 40, 50, 51, 100, 150, 200, 201, 500, 1000, 1001];
    for &commits in &values {
        for &followers in &values {
            for &repos in &values {
                let level = rank_level(commits, followers, repos);
                assert!(rank_level(commits + 1, followers, repos) >= level);
                assert!(rank_level(commits, followers + 1, repos) >= level);
                assert!(rank_level(commits, followers, repos + 1) >= level);
            }
        }
    }
}

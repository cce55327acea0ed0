use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
}

impl From<User> for readme_stats::api::UserProfile {
    fn from(user: User) -> Self {
        readme_stats::api::UserProfile::new(user.login, user.followers, user.following, user.public_repos)
    }
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub owner: Account,
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
}

impl From<Repo> for readme_stats::api::Repository {
    fn from(repo: Repo) -> Self {
        readme_stats::api::Repository::new(repo.name, repo.owner.login, repo.language, repo.size, repo.fork, repo.private)
    }
}

#[derive(Deserialize, Debug)]
pub struct Account {
    pub login: String,
}

#[derive(Deserialize, Debug)]
pub struct Commit {
    /// GitHub account linked to the commit author, `null` for unknown emails.
    pub author: Option<Account>,
    pub commit: CommitDetails,
}

#[derive(Deserialize, Debug)]
pub struct CommitDetails {
    pub author: Option<GitSignature>,
}

#[derive(Deserialize, Debug)]
pub struct GitSignature {
    pub date: Option<DateTime<Utc>>,
}

impl From<Commit> for readme_stats::api::CommitRecord {
    fn from(commit: Commit) -> Self {
        readme_stats::api::CommitRecord::new(
            commit.author.map(|account| account.login),
            commit.commit.author.and_then(|signature| signature.date),
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct PullRequest {
    pub user: Option<Account>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for readme_stats::api::PullRequestRecord {
    fn from(pull: PullRequest) -> Self {
        readme_stats::api::PullRequestRecord::new(pull.user.map(|account| account.login), pull.merged_at)
    }
}

//! In-memory `Client` for engine tests.

use crate::api::{Client, CommitRecord, PullRequestRecord, Repository, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeClient {
    profile: Option<UserProfile>,
    repos: Vec<Repository>,
    commits: HashMap<String, Vec<CommitRecord>>,
    pulls: HashMap<String, Vec<PullRequestRecord>>,
    fail_repo_pages: bool,
    repo_page_requests: AtomicUsize,
    commit_queries: Mutex<Vec<String>>,
    pull_queries: Mutex<Vec<String>>,
}

pub(crate) fn repo(name: &str, language: Option<&str>, size: u64) -> Repository {
    Repository::new(name.to_string(), "octocat".to_string(), language.map(str::to_string), size, false, false)
}

pub(crate) fn commit(author: Option<&str>) -> CommitRecord {
    CommitRecord::new(author.map(str::to_string), Some(Utc::now()))
}

pub(crate) fn pull(author: &str, merged: bool) -> PullRequestRecord {
    PullRequestRecord::new(Some(author.to_string()), merged.then(Utc::now))
}

impl FakeClient {
    pub fn with_repos(count: usize) -> Self {
        let repos = (0..count).map(|i| repo(&format!("repo_{}", i), None, 0)).collect();
        Self::default().repos(repos)
    }

    pub fn profile(mut self, followers: u64, public_repos: u64) -> Self {
        self.profile = Some(UserProfile::new("octocat".to_string(), followers, 0, public_repos));
        self
    }

    pub fn repos(mut self, repos: Vec<Repository>) -> Self {
        self.repos = repos;
        self
    }

    pub fn commits(mut self, repo: &str, commits: Vec<CommitRecord>) -> Self {
        self.commits.insert(repo.to_string(), commits);
        self
    }

    pub fn pulls(mut self, repo: &str, pulls: Vec<PullRequestRecord>) -> Self {
        self.pulls.insert(repo.to_string(), pulls);
        self
    }

    pub fn failing_repo_pages(mut self) -> Self {
        self.fail_repo_pages = true;
        self
    }

    pub fn repo_page_requests(&self) -> usize {
        self.repo_page_requests.load(Ordering::SeqCst)
    }

    pub fn commit_queries(&self) -> Vec<String> {
        self.commit_queries.lock().unwrap().clone()
    }

    pub fn pull_queries(&self) -> Vec<String> {
        self.pull_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for FakeClient {
    async fn user_profile(&self, _username: &str) -> Option<UserProfile> {
        self.profile.clone()
    }

    async fn user_repos(&self, _username: &str, page: u32, per_page: u32) -> Vec<Repository> {
        self.repo_page_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_repo_pages {
            return Vec::new();
        }
        let start = ((page - 1) * per_page) as usize;
        let end = std::cmp::min(start + per_page as usize, self.repos.len());
        self.repos.get(start..end).map(<[Repository]>::to_vec).unwrap_or_default()
    }

    async fn repo_commits(&self, repo: &Repository, _since: DateTime<Utc>, _per_page: u32) -> Vec<CommitRecord> {
        self.commit_queries.lock().unwrap().push(repo.name.clone());
        self.commits.get(&repo.name).cloned().unwrap_or_default()
    }

    async fn repo_pulls(&self, repo: &Repository, _per_page: u32) -> Vec<PullRequestRecord> {
        self.pull_queries.lock().unwrap().push(repo.name.clone());
        self.pulls.get(&repo.name).cloned().unwrap_or_default()
    }
}

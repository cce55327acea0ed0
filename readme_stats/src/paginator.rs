use crate::api::{Client, Repository};
use derive_more::Constructor;
use log::debug;
use std::ops::AddAssign;

#[derive(Debug, PartialEq, Constructor)]
pub(crate) struct Page {
    pub page_no: u32,
    pub page_size: u32,
}

/// Walks listing pages until one comes back short or empty.
#[derive(Constructor)]
pub(crate) struct Paginator {
    page_no: u32,
    page_size: u32,
    exhausted: bool,
}

impl Paginator {
    pub fn next_page(&mut self) -> Option<Page> {
        if self.exhausted {
            return None;
        }
        Some(Page::new(self.page_no, self.page_size))
    }

    /// Records how many items the last requested page returned.
    pub fn received(&mut self, item_count: usize) {
        if item_count < self.page_size as usize {
            self.exhausted = true;
        } else {
            self.page_no.add_assign(1);
        }
    }
}

/// Fetches every repository of `username`, in arrival order.
///
/// An empty result means "no repositories", whether the user has none or the first request failed.
pub async fn user_repos<CLIENT: Client>(client: &CLIENT, username: &str) -> Vec<Repository> {
    let mut paginator = Paginator::new(CLIENT::FIRST_PAGE_NUMBER, CLIENT::MAX_PAGE_SIZE, false);
    let mut repos = Vec::new();
    while let Some(page) = paginator.next_page() {
        let page_repos = client.user_repos(username, page.page_no, page.page_size).await;
        debug!("Page {} returned {} repositories", page.page_no, page_repos.len());
        paginator.received(page_repos.len());
        repos.extend(page_repos);
    }
    repos
}

/// Tests

#[cfg(test)]
use crate::fake::FakeClient;

#[test]
fn paginator_stops_on_short_page_test() {
    let mut paginator = Paginator::new(1, 100, false);
    assert_eq!(paginator.next_page(), Some(Page::new(1, 100)));
    paginator.received(100);
    assert_eq!(paginator.next_page(), Some(Page::new(2, 100)));
    paginator.received(42);
    assert_eq!(paginator.next_page(), None);
}

#[test]
fn paginator_stops_on_empty_page_test() {
    let mut paginator = Paginator::new(1, 100, false);
    paginator.received(0);
    assert_eq!(paginator.next_page(), None);
}

#[cfg(test)]
#[tokio::test]
async fn user_repos_request_count_test() {
    for (repo_count, expected_requests) in [(0, 1), (1, 1), (99, 1), (100, 2), (101, 2), (250, 3), (300, 4)] {
        let client = FakeClient::with_repos(repo_count);
        let repos = user_repos(&client, "octocat").await;
        assert_eq!(repos.len(), repo_count, "repo count for {}", repo_count);
        assert_eq!(client.repo_page_requests(), expected_requests, "requests for {}", repo_count);
        let names: Vec<_> = repos.iter().map(|repo| repo.name.clone()).collect();
        let expected: Vec<_> = (0..repo_count).map(|i| format!("repo_{}", i)).collect();
        assert_eq!(names, expected, "order for {}", repo_count);
    }
}

#[cfg(test)]
#[tokio::test]
async fn user_repos_failed_first_page_test() {
    let client = FakeClient::with_repos(150).failing_repo_pages();
    assert!(user_repos(&client, "octocat").await.is_empty());
    assert_eq!(client.repo_page_requests(), 1);
}

mod builder;
mod payload;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use readme_stats::api::{CommitRecord, PullRequestRecord, Repository, UserProfile};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL, DEFAULT_TIMEOUT};

pub struct GithubClient {
    client: Client,
    github_url: String,
}

impl GithubClient {
    /// GETs `endpoint` and decodes the JSON body.
    ///
    /// Returns `None` on network errors, timeouts, non-2xx statuses and undecodable bodies.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Option<T> {
        let request_url = format!("{}/{}", self.github_url, endpoint);
        let response = match self.client.get(&request_url).query(query).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Request to {} failed: {}", request_url, err);
                return None;
            }
        };
        let status = response.status();
        info!("API request: {} - status: {}", response.url(), status);
        if !status.is_success() {
            warn!("Request to {} returned {}", request_url, status);
            if let Ok(body) = response.text().await {
                debug!("Response body: {}", body);
            }
            return None;
        }
        response
            .json::<T>()
            .await
            .map_err(|err| warn!("Failed to decode response of {}: {}", request_url, err))
            .ok()
    }

    async fn get_list<P, T>(&self, endpoint: &str, query: &[(&str, String)]) -> Vec<T>
    where
        P: DeserializeOwned,
        T: From<P>,
    {
        self.get::<Vec<P>>(endpoint, query)
            .await
            .map(|items| items.into_iter().map(T::from).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl readme_stats::api::Client for GithubClient {
    async fn user_profile(&self, username: &str) -> Option<UserProfile> {
        self.get::<payload::User>(&format!("users/{}", username), &[])
            .await
            .map(UserProfile::from)
    }

    async fn user_repos(&self, username: &str, page: u32, per_page: u32) -> Vec<Repository> {
        let query = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("type", "all".to_string()),
        ];
        self.get_list::<payload::Repo, _>(&format!("users/{}/repos", username), &query)
            .await
    }

    async fn repo_commits(&self, repo: &Repository, since: DateTime<Utc>, per_page: u32) -> Vec<CommitRecord> {
        let query = [
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("per_page", per_page.to_string()),
        ];
        self.get_list::<payload::Commit, _>(&format!("repos/{}/{}/commits", repo.owner, repo.name), &query)
            .await
    }

    async fn repo_pulls(&self, repo: &Repository, per_page: u32) -> Vec<PullRequestRecord> {
        let query = [("state", "all".to_string()), ("per_page", per_page.to_string())];
        self.get_list::<payload::PullRequest, _>(&format!("repos/{}/{}/pulls", repo.owner, repo.name), &query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{GithubClient, GithubClientBuilder};
    use chrono::{TimeZone, Utc};
    use readme_stats::api::{Client, Repository};
    use secrecy::SecretString;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GithubClient {
        let _ = env_logger::builder().is_test(true).try_init();
        GithubClientBuilder::default()
            .with_github_url(server.uri())
            .try_with_token(SecretString::new("test-token".to_string()))
            .unwrap()
            .build()
            .unwrap()
    }

    fn repository(name: &str) -> Repository {
        Repository::new(name.to_string(), "octocat".to_string(), None, 0, false, false)
    }

    #[tokio::test]
    async fn user_profile_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{ "login": "octocat", "followers": 12, "following": 3, "public_repos": 8, "bio": null }"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let profile = client(&server).user_profile("octocat").await.unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.followers, 12);
        assert_eq!(profile.following, 3);
        assert_eq!(profile.public_repos, 8);
    }

    #[tokio::test]
    async fn user_profile_not_found_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/nobody"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(r#"{ "message": "Not Found" }"#, "application/json"))
            .mount(&server)
            .await;

        assert!(client(&server).user_profile("nobody").await.is_none());
    }

    #[tokio::test]
    async fn malformed_body_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{ not json", "application/json"))
            .mount(&server)
            .await;

        assert!(client(&server).user_profile("octocat").await.is_none());
    }

    #[tokio::test]
    async fn server_error_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(client(&server).user_repos("octocat", 1, 100).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_server_test() {
        let client = GithubClientBuilder::default()
            .with_github_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        assert!(client.user_profile("octocat").await.is_none());
    }

    #[tokio::test]
    async fn timeout_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(
                        r#"{ "login": "octocat", "followers": 1, "following": 1, "public_repos": 1 }"#,
                        "application/json",
                    )
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("[]", "application/json")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .with_timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        let started = Instant::now();
        assert!(client.user_profile("octocat").await.is_none());
        assert!(client.user_repos("octocat", 1, 100).await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn user_repos_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "100"))
            .and(query_param("type", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    { "name": "hello", "owner": { "login": "octocat" }, "language": "Rust", "size": 120, "fork": false, "private": false },
                    { "name": "world", "owner": { "login": "octo-org" }, "language": null, "size": 7, "fork": true, "private": true }
                ]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let repos = client(&server).user_repos("octocat", 2, 100).await;
        assert_eq!(
            repos,
            vec![
                Repository::new("hello".to_string(), "octocat".to_string(), Some("Rust".to_string()), 120, false, false),
                Repository::new("world".to_string(), "octo-org".to_string(), None, 7, true, true),
            ]
        );
    }

    #[tokio::test]
    async fn repo_commits_test() {
        let server = MockServer::start().await;
        let since = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/commits"))
            .and(query_param("since", "2025-10-19T12:00:00Z"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    { "sha": "a1", "author": { "login": "octocat" }, "commit": { "author": { "date": "2026-01-02T03:04:05Z" } } },
                    { "sha": "b2", "author": null, "commit": { "author": { "date": "2026-02-02T03:04:05Z" } } }
                ]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let commits = client(&server).repo_commits(&repository("hello"), since, 100).await;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].author.as_deref(), Some("octocat"));
        assert_eq!(commits[0].timestamp, Some(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()));
        assert_eq!(commits[1].author, None);
    }

    #[tokio::test]
    async fn repo_pulls_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/pulls"))
            .and(query_param("state", "all"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    { "number": 2, "user": { "login": "octocat" }, "merged_at": "2026-03-01T10:00:00Z" },
                    { "number": 1, "user": { "login": "someone" }, "merged_at": null }
                ]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let pulls = client(&server).repo_pulls(&repository("hello"), 100).await;
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].author.as_deref(), Some("octocat"));
        assert!(pulls[0].is_merged());
        assert!(!pulls[1].is_merged());
    }
}

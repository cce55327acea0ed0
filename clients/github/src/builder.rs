use crate::GithubClient;
use readme_stats::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("readme-stats"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let bearer = format!("Bearer {}", token.expose_secret());
        let mut builder = self.try_with_header(header::AUTHORIZATION, bearer)?;
        if let Some(value) = builder.headers.get_mut(header::AUTHORIZATION) {
            value.set_sensitive(true);
        }
        Ok(builder)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.timeout = timeout;
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        Url::parse(&self.github_url).map_err(|err| anyhow::anyhow!("Invalid GitHub URL {}: {}", self.github_url, err))?;
        let client = self
            .client_builder
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()?;
        Ok(GithubClient {
            client,
            github_url: self.github_url,
        })
    }
}

#[test]
fn invalid_url_test() {
    let result = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(result.is_err());
}

#[test]
fn invalid_token_test() {
    let token = secrecy::SecretString::new("line\nbreak".to_string());
    assert!(GithubClientBuilder::default().try_with_token(token).is_err());
}

#[test]
fn sensitive_token_test() -> anyhow::Result<()> {
    let token = secrecy::SecretString::new("ghp_secret".to_string());
    let builder = GithubClientBuilder::default().try_with_token(token)?;
    let value = builder.headers.get(header::AUTHORIZATION).unwrap();
    assert!(value.is_sensitive());
    assert_eq!(value.to_str()?, "Bearer ghp_secret");
    assert!(!format!("{:?}", value).contains("ghp_secret"));
    Ok(())
}

#[test]
fn trailing_slash_test() -> anyhow::Result<()> {
    let client = GithubClientBuilder::default().with_github_url("http://localhost:8080/").build()?;
    assert_eq!(client.github_url, "http://localhost:8080");
    Ok(())
}

#[test]
fn user_agent_test() -> anyhow::Result<()> {
    let builder = GithubClientBuilder::default();
    assert_eq!(builder.headers.get(header::USER_AGENT).unwrap(), "readme-stats");
    let builder = builder.try_with_user_agent("dudupys-readme")?;
    assert_eq!(builder.headers.get(header::USER_AGENT).unwrap(), "dudupys-readme");
    assert_eq!(
        builder.headers.get(header::ACCEPT).unwrap(),
        "application/vnd.github.v3+json"
    );
    Ok(())
}

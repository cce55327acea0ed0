mod args;

pub use args::Args;

use github_client::{GithubClient, GithubClientBuilder};
use log::warn;
use readme_stats::api::Result;
use readme_stats::{SamplingBounds, SourcedSnapshot, StatsCalculator, StatsSource};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Live source when a usable token is configured, fallback source otherwise.
///
/// An empty token counts as missing. A token or URL the client cannot be configured with also selects the fallback.
pub fn stats_source(args: Args) -> Result<StatsSource<GithubClient>> {
    let token = match args.github_token.filter(|token| !token.expose_secret().trim().is_empty()) {
        Some(token) => token,
        None => {
            warn!("No GitHub token configured");
            return Ok(StatsSource::Fallback);
        }
    };
    let client = match live_client(&args.api_url, args.timeout, token) {
        Ok(client) => client,
        Err(err) => {
            warn!("Failed to configure GitHub client: {}. Using fallback stats.", err);
            return Ok(StatsSource::Fallback);
        }
    };
    let bounds = SamplingBounds::new(args.commit_sample, args.pr_sample);
    let calculator = StatsCalculator::new(client, args.username, bounds, args.strategy);
    Ok(StatsSource::Live(calculator))
}

fn live_client(api_url: &str, timeout: u64, token: SecretString) -> Result<GithubClient> {
    GithubClientBuilder::default()
        .with_github_url(api_url)
        .with_timeout(Duration::from_secs(timeout))
        .try_with_token(token)?
        .build()
}

pub async fn github_stats(args: Args) -> Result<SourcedSnapshot> {
    Ok(stats_source(args)?.snapshot().await)
}

use clap::Parser;
use github_client::{DEFAULT_GITHUB_URL, DEFAULT_TIMEOUT};
use readme_stats::EstimationStrategy;
use secrecy::SecretString;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// GitHub user whose stats are calculated
    #[clap(short, long, env = "GITHUB_USERNAME", default_value = "dudupys")]
    pub username: String,

    /// API access token. Fallback stats are used without it
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_URL)]
    pub api_url: String,

    /// Commit and pull request estimation: `quick` or `sampled`
    #[clap(short, long, env = "STATS_STRATEGY", default_value = "quick")]
    pub strategy: EstimationStrategy,

    /// Repositories queried for commits with `sampled` strategy
    #[clap(long, env = "COMMIT_SAMPLE", default_value_t = 20, parse(try_from_str=sample_in_range))]
    pub commit_sample: usize,

    /// Repositories queried for pull requests with `sampled` strategy
    #[clap(long, env = "PR_SAMPLE", default_value_t = 10, parse(try_from_str=sample_in_range))]
    pub pr_sample: usize,

    /// Request timeout in seconds
    #[clap(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs(), parse(try_from_str=timeout_in_range))]
    pub timeout: u64,

    /// Print stats as JSON
    #[clap(long)]
    pub json: bool,
}

fn sample_in_range(value: &str) -> clap::Result<usize, String> {
    number_in_range(value, 1, usize::MAX, "sample".to_string())
}

fn timeout_in_range(value: &str) -> clap::Result<u64, String> {
    number_in_range(value, 1, 3600, "timeout".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[test]
fn defaults_test() {
    let args = Args::try_parse_from(["readme_stats"]).unwrap();
    assert_eq!(args.username, "dudupys");
    assert_eq!(args.api_url, DEFAULT_GITHUB_URL);
    assert_eq!(args.api_url, "https://api.github.com");
    assert_eq!(args.strategy, EstimationStrategy::Quick);
    assert_eq!(args.commit_sample, 20);
    assert_eq!(args.pr_sample, 10);
    assert_eq!(args.timeout, DEFAULT_TIMEOUT.as_secs());
    assert_eq!(args.timeout, 30);
    assert!(!args.json);
}

#[test]
fn explicit_values_test() {
    let args = Args::try_parse_from([
        "readme_stats",
        "--username",
        "octocat",
        "--strategy",
        "sampled",
        "--commit-sample",
        "5",
        "--pr-sample",
        "3",
        "--timeout",
        "10",
        "--json",
    ])
    .unwrap();
    assert_eq!(args.username, "octocat");
    assert_eq!(args.strategy, EstimationStrategy::Sampled);
    assert_eq!(args.commit_sample, 5);
    assert_eq!(args.pr_sample, 3);
    assert_eq!(args.timeout, 10);
    assert!(args.json);
}

#[test]
fn out_of_range_test() {
    assert!(Args::try_parse_from(["readme_stats", "--commit-sample", "0"]).is_err());
    assert!(Args::try_parse_from(["readme_stats", "--timeout", "0"]).is_err());
    assert!(Args::try_parse_from(["readme_stats", "--strategy", "exact"]).is_err());
}

//! GitHub profile stats
//!
//! # Overview
//!
//! Library turns raw GitHub account data into a display-ready [`api::StatsSnapshot`]: follower and repository counts,
//! an estimate of commits made in the last year, pull requests made and the merged share of them, the most used
//! languages and a rank label derived from all of it.
//!
//! Repositories of the user are listed page by page (100 per page) until a short page arrives.
//! Languages are weighted by repository size over all repositories.
//! Commits and pull requests are either estimated from the public repository count alone
//! ([`EstimationStrategy::Quick`]) or counted in the first 20 (commits) and 10 (pull requests) repositories
//! ([`EstimationStrategy::Sampled`]).
//! The rank is `commits + 10 * followers + 5 * repositories` compared against fixed thresholds.
//!
//! Missing data never fails the calculation, it counts as zero. The only hard failure is an unavailable user
//! profile, in which case [`StatsSource`] substitutes a fixed fallback snapshot.

pub mod api;
#[cfg(feature = "calculator")]
mod calculator;
#[cfg(feature = "calculator")]
pub mod estimate;
#[cfg(feature = "calculator")]
pub mod languages;
#[cfg(feature = "calculator")]
mod paginator;
#[cfg(feature = "calculator")]
pub mod rank;
#[cfg(feature = "calculator")]
mod source;

#[cfg(all(test, feature = "calculator"))]
mod fake;

#[cfg(feature = "calculator")]
pub use calculator::StatsCalculator;
#[cfg(feature = "calculator")]
pub use estimate::{EstimationStrategy, SamplingBounds};
#[cfg(feature = "calculator")]
pub use source::{fallback_snapshot, SnapshotOrigin, SourcedSnapshot, StatsSource};

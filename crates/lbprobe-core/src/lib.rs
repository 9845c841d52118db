//! Core of the leaderboard API smoke tester.
//!
//! Holds configuration, the HTTP client for the leaderboard service, the
//! authenticator, the six ordered checks and the suite runner. Nothing in
//! this crate prints directly; all human output flows through [`Reporter`].

/// Login against the service under test.
pub mod auth;
/// The six ordered leaderboard checks.
pub mod checks;
/// HTTP client wrapping the leaderboard endpoints.
pub mod client;
/// Configuration loading and validation.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Report sinks and line levels.
pub mod report;
/// Suite orchestration and final summary.
pub mod runner;
/// Wire types for requests and responses.
pub mod types;

pub use auth::authenticate;
pub use checks::Check;
pub use client::{ApiClient, Reply};
pub use config::{Config, Credentials, LeaderboardQuery, SortOrder, TargetConfig};
pub use error::{Error, Result};
pub use report::{Level, MemoryReporter, Reporter};
pub use runner::{RunOutcome, Runner, TestResult};
pub use types::{EntryPayload, Session, SessionToken};

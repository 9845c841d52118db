use crate::auth::authenticate;
use crate::checks::Check;
use crate::client::ApiClient;
use crate::config::Config;
use crate::report::{Level, Reporter};
use crate::Result;

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResult {
    /// Which check ran.
    pub check: Check,
    /// Whether it passed.
    pub passed: bool,
}

impl TestResult {
    /// Summary name of the check.
    pub fn name(&self) -> &'static str {
        self.check.name()
    }
}

/// How a suite run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Login failed; no check ran.
    LoginFailed,
    /// Every check ran; results are in run order.
    Completed(Vec<TestResult>),
}

impl RunOutcome {
    /// Results in run order; empty when login failed.
    pub fn results(&self) -> &[TestResult] {
        match self {
            Self::LoginFailed => &[],
            Self::Completed(results) => results.as_slice(),
        }
    }

    /// Number of checks that passed.
    pub fn passed(&self) -> usize {
        self.results().iter().filter(|result| result.passed).count()
    }

    /// True only when login succeeded and every check passed.
    pub fn all_passed(&self) -> bool {
        matches!(self, Self::Completed(results) if results.iter().all(|result| result.passed))
    }

    /// Process exit status: 0 when everything passed, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

/// Drives login, the six checks and the summary.
#[derive(Debug, Clone)]
pub struct Runner {
    client: ApiClient,
    config: Config,
}

impl Runner {
    /// Builds a runner for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(config.target.clone(), config.leaderboard.clone())?;
        Ok(Self { client, config })
    }

    /// The client used for every request.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Runs the suite, one request at a time.
    ///
    /// Login failure ends the run before any leaderboard request is made.
    /// Otherwise every check runs regardless of earlier failures.
    pub async fn run(&self, reporter: &mut dyn Reporter) -> RunOutcome {
        reporter.header("Leaderboard API Test Suite");
        reporter.info(&format!("Testing against: {}", self.config.target.base_url));
        reporter.info(&format!("Test user: {}", self.config.credentials.email));

        let Some(session) = authenticate(&self.client, &self.config.credentials, reporter).await
        else {
            reporter.error("Cannot proceed without authentication token");
            reporter.info("Please check:");
            reporter.info("  1. The server under test is running");
            reporter.info("  2. Test user credentials are correct");
            reporter.info("  3. Login endpoint is accessible");
            tracing::warn!("login failed, aborting run");
            return RunOutcome::LoginFailed;
        };

        let mut results = Vec::with_capacity(Check::ALL.len());
        for check in Check::ALL {
            let passed = check.run(&self.client, &session.token, reporter).await;
            results.push(TestResult { check, passed });
        }

        let outcome = RunOutcome::Completed(results);
        summarize(&outcome, reporter);
        outcome
    }
}

/// Writes the summary section for a completed run.
pub fn summarize(outcome: &RunOutcome, reporter: &mut dyn Reporter) {
    let results = outcome.results();
    reporter.header("Test Summary");
    for result in results {
        reporter.outcome(result.name(), result.passed);
    }

    reporter.line(
        Level::Emphasis,
        &format!(
            "Results: {}/{} tests passed",
            outcome.passed(),
            results.len()
        ),
    );

    if outcome.all_passed() {
        reporter.success("All tests passed!");
    } else {
        reporter.error("Some tests failed. Please review the output above.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;

    fn completed(flags: &[bool]) -> RunOutcome {
        RunOutcome::Completed(
            Check::ALL
                .iter()
                .zip(flags)
                .map(|(check, passed)| TestResult {
                    check: *check,
                    passed: *passed,
                })
                .collect(),
        )
    }

    #[test]
    fn test_exit_status_zero_only_when_all_pass() {
        assert_eq!(completed(&[true; 6]).exit_status(), 0);
        assert_eq!(
            completed(&[true, true, false, true, true, true]).exit_status(),
            1
        );
        assert_eq!(RunOutcome::LoginFailed.exit_status(), 1);
    }

    #[test]
    fn test_login_failed_has_no_results() {
        let outcome = RunOutcome::LoginFailed;
        assert!(outcome.results().is_empty());
        assert_eq!(outcome.passed(), 0);
        assert!(!outcome.all_passed());
    }

    #[test]
    fn test_summary_lists_every_check() {
        let outcome = completed(&[true, true, false, true, false, true]);
        let mut reporter = MemoryReporter::new();
        summarize(&outcome, &mut reporter);

        assert_eq!(reporter.texts(Level::Pass).len(), 4);
        assert_eq!(
            reporter.texts(Level::Fail),
            vec!["Write without Auth (Should Fail)", "Update Entry"]
        );
        assert_eq!(
            reporter.texts(Level::Emphasis),
            vec!["Results: 4/6 tests passed"]
        );
        assert!(reporter.contains(Level::Error, "Some tests failed"));
    }

    #[test]
    fn test_summary_all_passed() {
        let mut reporter = MemoryReporter::new();
        summarize(&completed(&[true; 6]), &mut reporter);
        assert!(reporter.contains(Level::Success, "All tests passed!"));
        assert!(reporter.contains(Level::Emphasis, "Results: 6/6 tests passed"));
    }

    #[test]
    fn test_runner_rejects_invalid_config() {
        let mut config = Config::default();
        config.target.base_url = String::new();
        assert!(Runner::new(config).is_err());
    }
}

//! The six leaderboard checks
//!
//! Each check reports what it saw and returns whether the service behaved as
//! expected. Errors never escape a check: they are reported and count as a
//! failure, so the suite always moves on to the next one.

use reqwest::StatusCode;
use serde_json::Value;

use crate::client::{ApiClient, Reply};
use crate::report::Reporter;
use crate::types::{EntryPayload, SessionToken, listing_entries};
use crate::Result;

/// Payload sent without credentials; the server must refuse it.
pub const UNAUTHENTICATED_PAYLOAD: EntryPayload = EntryPayload {
    successful_submissions: 5,
    overall_score: 100.0,
    optimization_score: 80.0,
    accuracy_score: 0.95,
};

/// First authenticated write.
pub const WRITE_PAYLOAD: EntryPayload = EntryPayload {
    successful_submissions: 10,
    overall_score: 123.45,
    optimization_score: 100.0,
    accuracy_score: 0.98,
};

/// Second authenticated write, replacing the first for the same user.
pub const UPDATE_PAYLOAD: EntryPayload = EntryPayload {
    successful_submissions: 15,
    overall_score: 150.75,
    optimization_score: 120.0,
    accuracy_score: 0.99,
};

/// One step of the suite, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Unauthenticated `GET`.
    PublicRead,
    /// `GET` with the bearer token.
    AuthenticatedRead,
    /// `POST` without a token, which must be rejected with 401.
    UnauthenticatedWrite,
    /// `POST` with the bearer token.
    AuthenticatedWrite,
    /// Second `POST` for the same user.
    Update,
    /// `GET` after the writes.
    VerifyAfterWrite,
}

impl Check {
    /// Every check in run order.
    pub const ALL: [Self; 6] = [
        Self::PublicRead,
        Self::AuthenticatedRead,
        Self::UnauthenticatedWrite,
        Self::AuthenticatedWrite,
        Self::Update,
        Self::VerifyAfterWrite,
    ];

    /// Name used in the summary.
    pub fn name(self) -> &'static str {
        match self {
            Self::PublicRead => "Public Read",
            Self::AuthenticatedRead => "Read with Auth",
            Self::UnauthenticatedWrite => "Write without Auth (Should Fail)",
            Self::AuthenticatedWrite => "Write with Auth",
            Self::Update => "Update Entry",
            Self::VerifyAfterWrite => "Verify After Write",
        }
    }

    /// Section title printed before the check runs.
    pub fn title(self) -> &'static str {
        match self {
            Self::PublicRead => "Public Read (No Authentication)",
            Self::AuthenticatedRead => "Read with Authentication",
            Self::UnauthenticatedWrite => "Write without Authentication (Should Fail)",
            Self::AuthenticatedWrite => "Write with Authentication",
            Self::Update => "Update Existing Entry",
            Self::VerifyAfterWrite => "Verify Data After Write",
        }
    }

    /// One-based position in the suite.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|check| *check == self)
            .map_or(0, |index| index + 1)
    }

    /// Runs the check under its section header.
    pub async fn run(
        self,
        client: &ApiClient,
        token: &SessionToken,
        reporter: &mut dyn Reporter,
    ) -> bool {
        reporter.header(&format!("Test {}: {}", self.number(), self.title()));
        let passed = match self {
            Self::PublicRead => read_public(client, reporter).await,
            Self::AuthenticatedRead => read_with_auth(client, token, reporter).await,
            Self::UnauthenticatedWrite => write_without_auth(client, reporter).await,
            Self::AuthenticatedWrite => write_with_auth(client, token, reporter).await,
            Self::Update => write_update(client, token, reporter).await,
            Self::VerifyAfterWrite => read_after_write(client, token, reporter).await,
        };
        tracing::debug!(check = self.name(), passed, "check finished");
        passed
    }
}

/// Unauthenticated read; passes on 200.
pub async fn read_public(client: &ApiClient, reporter: &mut dyn Reporter) -> bool {
    let result = try_read_public(client, reporter).await;
    settle(result, "Read", reporter)
}

async fn try_read_public(client: &ApiClient, reporter: &mut dyn Reporter) -> Result<bool> {
    let reply = client.list_entries(None).await?;
    if reply.status != StatusCode::OK {
        report_failure("Read failed", &reply, reporter);
        return Ok(false);
    }

    let body = reply.json()?;
    let count = listing_rows(&body, reporter).len();
    reporter.success(&format!("Read successful! Found {count} entries"));
    reporter.info(&format!("Response: {}", serde_json::to_string_pretty(&body)?));
    Ok(true)
}

/// Authenticated read; passes on 200.
pub async fn read_with_auth(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> bool {
    let result = try_read_with_auth(client, token, reporter).await;
    settle(result, "Authenticated read", reporter)
}

async fn try_read_with_auth(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> Result<bool> {
    let reply = client.list_entries(Some(token)).await?;
    if reply.status != StatusCode::OK {
        report_failure("Authenticated read failed", &reply, reporter);
        return Ok(false);
    }

    let body = reply.json()?;
    let count = listing_rows(&body, reporter).len();
    reporter.success(&format!("Authenticated read successful! Found {count} entries"));
    Ok(true)
}

/// Write without a token; passes only on exactly 401.
pub async fn write_without_auth(client: &ApiClient, reporter: &mut dyn Reporter) -> bool {
    let result = try_write_without_auth(client, reporter).await;
    settle(result, "Unauthenticated write test", reporter)
}

async fn try_write_without_auth(client: &ApiClient, reporter: &mut dyn Reporter) -> Result<bool> {
    let reply = client.submit_entry(None, &UNAUTHENTICATED_PAYLOAD).await?;
    if reply.status == StatusCode::UNAUTHORIZED {
        reporter.success("Correctly rejected unauthenticated write request");
        return Ok(true);
    }

    report_failure("Unexpected response", &reply, reporter);
    Ok(false)
}

/// Authenticated write; passes on 200 and echoes the stored record.
pub async fn write_with_auth(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> bool {
    let result = try_write(client, token, &WRITE_PAYLOAD, "Write", "Response", reporter).await;
    settle(result, "Write", reporter)
}

/// Second authenticated write for the same user; passes on 200.
///
/// Only the status is checked. Whether the earlier values were replaced is
/// left to the server.
pub async fn write_update(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> bool {
    let result = try_write(
        client,
        token,
        &UPDATE_PAYLOAD,
        "Update",
        "Updated scores",
        reporter,
    )
    .await;
    settle(result, "Update", reporter)
}

async fn try_write(
    client: &ApiClient,
    token: &SessionToken,
    payload: &EntryPayload,
    action: &str,
    echo_label: &str,
    reporter: &mut dyn Reporter,
) -> Result<bool> {
    let reply = client.submit_entry(Some(token), payload).await?;
    if reply.status != StatusCode::OK {
        report_failure(&format!("{action} failed"), &reply, reporter);
        return Ok(false);
    }

    let body = reply.json()?;
    reporter.success(&format!("{action} successful!"));
    reporter.info(&format!(
        "{echo_label}: {}",
        serde_json::to_string_pretty(&body)?
    ));
    Ok(true)
}

/// Authenticated read after the writes; passes on 200.
///
/// Reports the row count and the first row. It does not look for the
/// caller's own record.
pub async fn read_after_write(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> bool {
    let result = try_read_after_write(client, token, reporter).await;
    settle(result, "Read after write", reporter)
}

async fn try_read_after_write(
    client: &ApiClient,
    token: &SessionToken,
    reporter: &mut dyn Reporter,
) -> Result<bool> {
    let reply = client.list_entries(Some(token)).await?;
    if reply.status != StatusCode::OK {
        reporter.error(&format!("Read after write failed: {}", reply.code()));
        return Ok(false);
    }

    let body = reply.json()?;
    let entries = listing_rows(&body, reporter);
    reporter.success(&format!(
        "Read after write successful! Found {} total entries",
        entries.len()
    ));
    if let Some(first) = entries.first() {
        reporter.info(&format!(
            "Sample entry: {}",
            serde_json::to_string_pretty(first)?
        ));
    }
    Ok(true)
}

/// Rows of a 200 listing, warning when the body has no `data` array.
fn listing_rows<'body>(body: &'body Value, reporter: &mut dyn Reporter) -> &'body [Value] {
    if body.get("data").and_then(Value::as_array).is_none() {
        reporter.warning("Listing response has no data array; counting 0 entries");
    }
    listing_entries(body)
}

fn report_failure(label: &str, reply: &Reply, reporter: &mut dyn Reporter) {
    reporter.error(&format!("{label}: {}", reply.code()));
    reporter.error(&format!("Response: {}", reply.body));
}

/// Turns an error raised inside a check into a reported failure.
fn settle(result: Result<bool>, label: &str, reporter: &mut dyn Reporter) -> bool {
    result.unwrap_or_else(|err| {
        tracing::debug!(error = ?err, "{label} raised");
        reporter.error(&format!("{label} error: {err}"));
        false
    })
}

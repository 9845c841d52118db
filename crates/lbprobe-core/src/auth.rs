use reqwest::StatusCode;

use crate::client::ApiClient;
use crate::config::Credentials;
use crate::report::Reporter;
use crate::types::{LoginResponse, Session};
use crate::{Error, Result};

/// Logs in once and reports the outcome.
///
/// Returns `None` after reporting a diagnostic on any failure: a non-200
/// status, an unreachable server, an undecodable body or a missing token.
/// Callers treat `None` as fatal for the run.
pub async fn authenticate(
    client: &ApiClient,
    credentials: &Credentials,
    reporter: &mut dyn Reporter,
) -> Option<Session> {
    reporter.info(&format!("Logging in as {}...", credentials.email));

    match login(client, credentials).await {
        Ok(session) => {
            reporter.success(&format!(
                "Login successful! User ID: {}",
                session.user_id.as_deref().unwrap_or("unknown")
            ));
            if let Some(email) = &session.user_email {
                reporter.info(&format!("Logged in as {email}"));
            }
            if let Some(expires_in) = session.expires_in {
                reporter.info(&format!("Token expires in {expires_in}s"));
            }
            Some(session)
        }
        Err(Error::UnexpectedStatus { status, body }) => {
            reporter.error(&format!("Login failed: {status}"));
            reporter.error(&format!("Response: {body}"));
            None
        }
        Err(Error::MissingToken) => {
            reporter.error("Login response missing access_token");
            None
        }
        Err(err) if err.is_connect() => {
            tracing::debug!(error = %err, "login connection failed");
            reporter.error(&format!("Could not connect to {}", client.base_url()));
            reporter.error("Make sure the server under test is running");
            None
        }
        Err(err) => {
            reporter.error(&format!("Login error: {err}"));
            None
        }
    }
}

/// Performs the login exchange without reporting.
///
/// # Errors
///
/// Returns [`Error::UnexpectedStatus`] for any non-200 reply,
/// [`Error::MissingToken`] when the body has no usable token, and transport
/// or JSON errors as they occur.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<Session> {
    let reply = client.login(credentials).await?;
    if reply.status != StatusCode::OK {
        return Err(Error::UnexpectedStatus {
            status: reply.code(),
            body: reply.body,
        });
    }

    let response: LoginResponse = serde_json::from_str(&reply.body)?;
    Session::from_login(response).ok_or(Error::MissingToken)
}

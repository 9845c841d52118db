use core::fmt::{Debug, Formatter, Result as FmtResult};

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bearer credential returned by the login endpoint. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token, rejecting empty or whitespace-only values.
    pub fn new<T: Into<String>>(raw: T) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for SessionToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Authenticated identity held for the rest of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Token attached to every authenticated call.
    pub token: SessionToken,
    /// Server-side user identifier, when the server reported one.
    pub user_id: Option<String>,
    /// Email echoed back by the server.
    pub user_email: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: Option<u64>,
}

impl Session {
    /// Builds a session from a decoded login body.
    ///
    /// Returns `None` when the body carries no usable `access_token`.
    pub fn from_login(response: LoginResponse) -> Option<Self> {
        let token = SessionToken::new(response.access_token?)?;
        let user = response.user.unwrap_or_default();
        Some(Self {
            token,
            user_id: user.id.map(|id| match id {
                Value::String(text) => text,
                other => other.to_string(),
            }),
            user_email: user.email,
            expires_in: response.expires_in,
        })
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'cred> {
    /// Account email.
    pub email: &'cred str,
    /// Account password.
    pub password: &'cred str,
}

/// Decoded `200` body of the login endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for later calls.
    pub access_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub expires_in: Option<u64>,
    /// Identity the token belongs to.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<LoginUser>,
}

/// User block of the login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    /// Identifier; usually a UUID string.
    pub id: Option<Value>,
    /// Account email.
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
}

/// Decodes an informational field, mapping an unexpected shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Body of `POST /api/leaderboard`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    /// Number of accepted submissions.
    pub successful_submissions: u32,
    /// Aggregate score.
    pub overall_score: f64,
    /// Optimization sub-score.
    pub optimization_score: f64,
    /// Accuracy as a fraction in `0.0..=1.0`.
    pub accuracy_score: f64,
}

/// Rows of a leaderboard listing body (`{"data": [...]}`). A missing or
/// non-array `data` field counts as no rows.
pub fn listing_entries(body: &Value) -> &[Value] {
    body.get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json, to_value};

    #[test]
    fn test_session_token_rejects_empty() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("   ").is_none());
        let token = SessionToken::new("tok123").expect("token should be accepted");
        assert_eq!(token.as_str(), "tok123");
        assert_eq!(token.bearer(), "Bearer tok123");
    }

    #[test]
    fn test_session_token_debug_hides_value() {
        let token = SessionToken::new("secret-value").expect("token should be accepted");
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[test]
    fn test_session_from_full_login_body() {
        let body: LoginResponse = from_value(json!({
            "success": true,
            "access_token": "tok123",
            "expires_in": 3600,
            "user": {"id": "3f1c", "email": "test@example.com"}
        }))
        .expect("body should decode");

        let session = Session::from_login(body).expect("session expected");
        assert_eq!(session.token.as_str(), "tok123");
        assert_eq!(session.user_id.as_deref(), Some("3f1c"));
        assert_eq!(session.user_email.as_deref(), Some("test@example.com"));
        assert_eq!(session.expires_in, Some(3600));
    }

    #[test]
    fn test_session_accepts_numeric_user_id() {
        let body: LoginResponse = from_value(json!({
            "access_token": "tok123",
            "user": {"id": 42}
        }))
        .expect("body should decode");

        let session = Session::from_login(body).expect("session expected");
        assert_eq!(session.user_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_odd_informational_fields_are_ignored() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"access_token":"tok123","expires_in":3599.5,"user":{"id":"u1","email":7}}"#,
        )
        .expect("body should decode");

        let session = Session::from_login(body).expect("session expected");
        assert_eq!(session.token.as_str(), "tok123");
        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(session.user_email, None);
        assert_eq!(session.expires_in, None);

        let body: LoginResponse =
            from_value(json!({"access_token": "tok123", "user": "u1"})).expect("body should decode");
        assert!(Session::from_login(body).is_some_and(|session| session.user_id.is_none()));
    }

    #[test]
    fn test_session_requires_token() {
        let missing: LoginResponse =
            from_value(json!({"user": {"id": "3f1c"}})).expect("body should decode");
        assert!(Session::from_login(missing).is_none());

        let empty: LoginResponse =
            from_value(json!({"access_token": ""})).expect("body should decode");
        assert!(Session::from_login(empty).is_none());
    }

    #[test]
    fn test_entry_payload_field_names() {
        let payload = EntryPayload {
            successful_submissions: 10,
            overall_score: 123.45,
            optimization_score: 100.0,
            accuracy_score: 0.98,
        };
        assert_eq!(
            to_value(payload).expect("payload should encode"),
            json!({
                "successful_submissions": 10,
                "overall_score": 123.45,
                "optimization_score": 100.0,
                "accuracy_score": 0.98
            })
        );
    }

    #[test]
    fn test_listing_entries() {
        assert_eq!(listing_entries(&json!({"data": [{"a": 1}, {"b": 2}]})).len(), 2);
        assert!(listing_entries(&json!({"data": []})).is_empty());
        assert!(listing_entries(&json!({"rows": [1]})).is_empty());
        assert!(listing_entries(&json!([1, 2, 3])).is_empty());
    }
}

use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::{Credentials, LeaderboardQuery, TargetConfig};
use crate::types::{EntryPayload, LoginRequest, SessionToken};
use crate::Result;

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/api/auth/login";
/// Leaderboard resource path.
pub const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// Status and raw body of a completed HTTP exchange.
///
/// Any status is a valid reply; deciding which ones are acceptable is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Body as text.
    pub body: String,
}

impl Reply {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Client for the leaderboard service.
///
/// Every call is awaited to completion and returned as a [`Reply`]; only
/// transport failures surface as errors.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Shared HTTP client.
    http: Client,
    /// Service location.
    target: TargetConfig,
    /// Parameters appended to every listing.
    listing: LeaderboardQuery,
}

impl ApiClient {
    /// Creates a client for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(target: TargetConfig, listing: LeaderboardQuery) -> Result<Self> {
        target.url()?;
        let http = Client::builder()
            .user_agent(concat!("lbprobe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            target,
            listing,
        })
    }

    /// Service base URL as configured.
    pub fn base_url(&self) -> &str {
        &self.target.base_url
    }

    /// `POST /api/auth/login` with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be
    /// read.
    pub async fn login(&self, credentials: &Credentials) -> Result<Reply> {
        let url = self.target.endpoint(LOGIN_PATH);
        let request = self.http.post(&url).json(&LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        });
        self.send(Method::POST, &url, request).await
    }

    /// `GET /api/leaderboard`, with a bearer header when `token` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be
    /// read.
    pub async fn list_entries(&self, token: Option<&SessionToken>) -> Result<Reply> {
        let url = self.target.endpoint(LEADERBOARD_PATH);
        let mut request = self.http.get(&url);
        let pairs = self.listing.pairs();
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        self.send(Method::GET, &url, authorize(request, token)).await
    }

    /// `POST /api/leaderboard`, with a bearer header when `token` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be
    /// read.
    pub async fn submit_entry(
        &self,
        token: Option<&SessionToken>,
        payload: &EntryPayload,
    ) -> Result<Reply> {
        let url = self.target.endpoint(LEADERBOARD_PATH);
        let request = self.http.post(&url).json(payload);
        self.send(Method::POST, &url, authorize(request, token)).await
    }

    async fn send(&self, method: Method, url: &str, request: RequestBuilder) -> Result<Reply> {
        let start = Instant::now();
        tracing::debug!(%method, url, "sending request");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            %method,
            url,
            status = status.as_u16(),
            elapsed = ?start.elapsed(),
            "received response"
        );
        tracing::trace!(body = %body, "response body");

        Ok(Reply { status, body })
    }
}

fn authorize(request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.as_str()),
        None => request,
    }
}

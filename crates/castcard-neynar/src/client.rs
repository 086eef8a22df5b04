//! HTTP client for the Neynar v2 REST API.
//!
//! Wraps `reqwest` with Neynar-specific authentication, status handling and
//! typed response deserialization. Each call is a single best-effort request:
//! failures are returned to the caller, never retried here.

use std::time::Duration;

use async_trait::async_trait;
use castcard_core::{Cast, UserProfile};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::NeynarError;
use crate::graph::SocialGraph;
use crate::types::{BulkUsersResponse, CastsResponse, UserResponse};

const DEFAULT_BASE_URL: &str = "https://api.neynar.com/";
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the Neynar v2 API.
///
/// Use [`NeynarClient::new`] for production or [`NeynarClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct NeynarClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NeynarClient {
    /// Creates a new client pointed at the production Neynar API.
    ///
    /// # Errors
    ///
    /// Returns [`NeynarError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, NeynarError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`NeynarError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`NeynarError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, NeynarError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NeynarError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Looks up a user's public profile by username.
    ///
    /// A leading `@` is accepted and stripped.
    ///
    /// # Errors
    ///
    /// - [`NeynarError::NotFound`] if no account has that username.
    /// - [`NeynarError::Http`] / [`NeynarError::UnexpectedStatus`] on network
    ///   failure or other non-2xx responses.
    /// - [`NeynarError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserProfile, NeynarError> {
        let username = username.trim().trim_start_matches('@');
        let url = self.build_url("v2/farcaster/user/by_username", &[("username", username)])?;
        let envelope: UserResponse = self
            .request_json(&url, &format!("user '{username}'"))
            .await?;
        Ok(envelope.user.into())
    }

    /// Fetches up to `limit` of the user's most recent casts.
    ///
    /// # Errors
    ///
    /// Same classes as [`NeynarClient::get_user_by_username`].
    pub async fn get_recent_casts(&self, fid: u64, limit: u32) -> Result<Vec<Cast>, NeynarError> {
        let fid_param = fid.to_string();
        let limit_param = limit.to_string();
        let url = self.build_url(
            "v2/farcaster/feed/user/casts",
            &[
                ("fid", fid_param.as_str()),
                ("limit", limit_param.as_str()),
                ("include_replies", "false"),
            ],
        )?;
        let envelope: CastsResponse = self
            .request_json(&url, &format!("casts for fid {fid}"))
            .await?;
        Ok(envelope.casts.into_iter().map(Cast::from).collect())
    }

    /// Looks up several profiles in one request.
    ///
    /// An empty `fids` slice returns an empty list without touching the
    /// network.
    ///
    /// # Errors
    ///
    /// Same classes as [`NeynarClient::get_user_by_username`].
    pub async fn get_users_by_fid(&self, fids: &[u64]) -> Result<Vec<UserProfile>, NeynarError> {
        if fids.is_empty() {
            return Ok(Vec::new());
        }
        let fids_param = fids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.build_url("v2/farcaster/user/bulk", &[("fids", fids_param.as_str())])?;
        let envelope: BulkUsersResponse = self
            .request_json(&url, &format!("users {fids_param}"))
            .await?;
        Ok(envelope.users.into_iter().map(UserProfile::from).collect())
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, NeynarError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| NeynarError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends an authenticated GET and decodes a 2xx JSON body into `T`.
    ///
    /// `subject` names the requested resource in `NotFound` errors.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        subject: &str,
    ) -> Result<T, NeynarError> {
        tracing::debug!(url = %redacted_path(url), "neynar request");

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NeynarError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            return Err(NeynarError::UnexpectedStatus {
                status: status.as_u16(),
                url: redacted_path(url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NeynarError::Deserialize {
            context: subject.to_string(),
            source: e,
        })
    }
}

/// Path and query of `url` for logs and error messages.
fn redacted_path(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    }
}

#[async_trait]
impl SocialGraph for NeynarClient {
    async fn profile_by_username(&self, username: &str) -> Result<UserProfile, NeynarError> {
        self.get_user_by_username(username).await
    }

    async fn recent_casts(&self, fid: u64, limit: u32) -> Result<Vec<Cast>, NeynarError> {
        self.get_recent_casts(fid, limit).await
    }

    async fn profiles_by_fid(&self, fids: &[u64]) -> Result<Vec<UserProfile>, NeynarError> {
        self.get_users_by_fid(fids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> NeynarClient {
        NeynarClient::with_base_url("test-key", 5, "castcard-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_path_and_encodes_query() {
        let client = test_client("https://api.neynar.com");
        let url = client
            .build_url("v2/farcaster/user/by_username", &[("username", "a b&c")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.neynar.com/v2/farcaster/user/by_username?username=a+b%26c"
        );
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("http://127.0.0.1:9000/proxy/");
        let url = client
            .build_url("v2/farcaster/feed/user/casts", &[("fid", "3")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/proxy/v2/farcaster/feed/user/casts?fid=3"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = NeynarClient::with_base_url("k", 5, "ua", "not a url");
        assert!(matches!(result, Err(NeynarError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn redacted_path_drops_scheme_and_host() {
        let url = Url::parse("https://api.neynar.com/v2/x?fid=1").expect("url");
        assert_eq!(redacted_path(&url), "/v2/x?fid=1");
    }
}

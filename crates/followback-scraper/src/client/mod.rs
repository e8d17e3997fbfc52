//! Shared HTTP client for every upstream.

pub mod headers;
pub mod session;

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{redact_url, SourceError};
use crate::retry::retry_with_backoff;

pub use headers::{browser_headers, mobile_headers, xhr_headers};
pub use session::{bootstrap_session, Session};

/// Default wait reported for a 429 without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client shared by all adapters.
///
/// Classifies 429, 404 and other non-2xx responses as typed errors and
/// retries transport failures and 5xx responses with exponential backoff up
/// to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct InstagramClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl InstagramClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(headers::BROWSER_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// GETs `url` and deserializes a JSON body.
    ///
    /// # Errors
    ///
    /// Any status error, [`SourceError::UnexpectedContentType`] when the
    /// response declares a non-JSON type, or [`SourceError::Deserialize`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<T, SourceError> {
        let response = self
            .send(url, |c| c.get(url).headers(headers.clone()))
            .await?;
        read_json(response, url).await
    }

    /// GETs `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// Any status or transport error.
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<String, SourceError> {
        let response = self
            .send(url, |c| c.get(url).headers(headers.clone()))
            .await?;
        Ok(response.text().await?)
    }

    /// GETs `url` and returns the body together with every `Set-Cookie` value.
    ///
    /// # Errors
    ///
    /// Any status or transport error.
    pub async fn get_with_cookies(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<(String, Vec<String>), SourceError> {
        let response = self
            .send(url, |c| c.get(url).headers(headers.clone()))
            .await?;
        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        let body = response.text().await?;
        Ok((body, cookies))
    }

    /// POSTs a url-encoded form and deserializes a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_json`].
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
        form: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let response = self
            .send(url, |c| c.post(url).headers(headers.clone()).form(form))
            .await?;
        read_json(response, url).await
    }

    /// POSTs a JSON body and deserializes a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_json`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<T, SourceError> {
        let response = self
            .send(url, |c| c.post(url).headers(headers.clone()).json(body))
            .await?;
        read_json(response, url).await
    }

    async fn send<F>(&self, url: &str, build: F) -> Result<Response, SourceError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let request = build(&self.client);
            async move {
                let response = request.send().await?;
                check_status(response, url)
            }
        })
        .await
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = redact_url(url);

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(SourceError::RateLimited {
            url,
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound { url });
    }

    Err(SourceError::UnexpectedStatus {
        status: status.as_u16(),
        url,
    })
}

/// Rejects non-JSON content types (Instagram answers blocked clients with an
/// HTML login page and a 200), then deserializes.
async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, SourceError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if let Some(content_type) = content_type {
        if !content_type.contains("json") {
            return Err(SourceError::UnexpectedContentType {
                content_type,
                url: redact_url(url),
            });
        }
    }

    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| SourceError::Deserialize {
        context: format!("response from {}", redact_url(url)),
        source: e,
    })
}

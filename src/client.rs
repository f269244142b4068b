use std::fmt;
use std::time::Duration;

use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;

use crate::{
    emails::EmailsApi,
    error::classify,
    retry::{backoff_delay, is_retryable_status, non_retryable},
    sms::SmsApi,
    voice::VoiceApi,
    EkdSendError, Result,
};

pub const DEFAULT_BASE_URL: &str = "https://es.ekddigital.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: usize = 3;

const USER_AGENT: &str = concat!("ekdsend-rust/", env!("CARGO_PKG_VERSION"));

/// Requests that carry no body, for [`EkdSend::request`].
pub(crate) const NO_BODY: Option<&()> = None;

/// Client for the EKDSend API.
///
/// Cheap to clone; clones share the underlying connection pool. Safe to use
/// from multiple tasks concurrently.
#[derive(Clone)]
pub struct EkdSend {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_retries: usize,
    debug: bool,
}

impl fmt::Debug for EkdSend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EkdSend")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .finish()
    }
}

impl EkdSend {
    /// Creates a client with default settings.
    ///
    /// Equivalent to `EkdSend::builder(api_key).build()`.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Starts building a client with custom settings.
    pub fn builder(api_key: impl Into<String>) -> EkdSendBuilder {
        EkdSendBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            debug: false,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `EKDSEND_API_KEY` — API key (required)
    /// - `EKDSEND_BASE_URL` — override for the API base URL (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EKDSEND_API_KEY")
            .map_err(|_| EkdSendError::Config("missing EKDSEND_API_KEY environment variable".to_owned()))?;
        let mut builder = Self::builder(api_key);
        if let Ok(base_url) = std::env::var("EKDSEND_BASE_URL") {
            if !base_url.trim().is_empty() {
                builder = builder.base_url(base_url);
            }
        }
        builder.build()
    }

    /// Email operations.
    pub fn emails(&self) -> EmailsApi<'_> {
        EmailsApi { client: self }
    }

    /// SMS operations.
    pub fn sms(&self) -> SmsApi<'_> {
        SmsApi { client: self }
    }

    /// Voice call operations.
    pub fn calls(&self) -> VoiceApi<'_> {
        VoiceApi { client: self }
    }

    /// Sends a request to the API and decodes the JSON response.
    ///
    /// This is the escape hatch behind every façade method; it is public so
    /// endpoints not yet covered by a façade can still be reached. `path` is
    /// appended verbatim to the configured base URL and may carry a query
    /// string. Returns `Ok(None)` when the response has no body.
    ///
    /// Retries transparently on connection failures, 429 and 5xx responses,
    /// with exponential backoff, up to the configured retry limit.
    /// Authentication and validation failures are surfaced immediately.
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(EkdSendError::Serialization)?;
        let raw = self.send_with_retry(&method, path, payload.as_deref()).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| EkdSendError::Decode(format!("invalid response JSON: {err}")))
    }

    /// One logical call: attempts `0..=max_retries`, each a full send/receive
    /// cycle, with a backoff sleep between retryable failures. Returns the raw
    /// body of the first 2xx response.
    async fn send_with_retry(
        &self,
        method: &Method,
        path: &str,
        payload: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 0..=self.max_retries {
            if self.debug {
                tracing::debug!(%method, path, attempt, "sending request");
                if let Some(payload) = payload {
                    tracing::debug!(body = payload, "request body");
                }
            }

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ACCEPT, "application/json")
                .header(header::USER_AGENT, USER_AGENT)
                .timeout(self.timeout);
            if let Some(payload) = payload {
                request = request.body(payload.to_owned());
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt < self.max_retries {
                        sleep(backoff_delay(attempt)).await;
                        continue;
                    }
                    return Err(EkdSendError::Connection(err));
                }
            };

            let status = response.status();
            let request_id = response
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    if attempt < self.max_retries {
                        sleep(backoff_delay(attempt)).await;
                        continue;
                    }
                    return Err(EkdSendError::Connection(err));
                }
            };

            if self.debug {
                tracing::debug!(status = status.as_u16(), %body, "received response");
            }

            if status.is_success() {
                return Ok(body);
            }

            let error = classify(status.as_u16(), &body, request_id);
            if non_retryable(&error) {
                return Err(error);
            }
            if is_retryable_status(status) && attempt < self.max_retries {
                sleep(backoff_delay(attempt)).await;
                continue;
            }
            return Err(error);
        }

        // Unreachable as long as every retry arm consumes an attempt.
        Err(EkdSendError::Api {
            status: 0,
            message: "request failed after retries".to_owned(),
            code: "UNKNOWN_ERROR".to_owned(),
            request_id: None,
        })
    }
}

/// Expected-body helper for façade methods whose endpoints always respond
/// with a JSON object.
pub(crate) fn required<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| EkdSendError::Decode("unexpected empty response body".to_owned()))
}

/// Configures an [`EkdSend`] client before construction.
#[derive(Clone)]
pub struct EkdSendBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_retries: usize,
    debug: bool,
}

impl EkdSendBuilder {
    /// Overrides the API base URL. A trailing slash is trimmed.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Per-attempt request timeout. Default 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum retries after the initial attempt. Default 3; 0 disables
    /// retries entirely.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Emits request/response diagnostics at `tracing` debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> Result<EkdSend> {
        if self.api_key.is_empty() {
            return Err(EkdSendError::Config("API key is required".to_owned()));
        }
        if !self.api_key.starts_with("ek_live_") && !self.api_key.starts_with("ek_test_") {
            return Err(EkdSendError::Config(
                "invalid API key format: must start with 'ek_live_' or 'ek_test_'".to_owned(),
            ));
        }
        Ok(EkdSend {
            http: reqwest::Client::new(),
            api_key: self.api_key,
            base_url: self.base_url,
            timeout: self.timeout,
            max_retries: self.max_retries,
            debug: self.debug,
        })
    }
}

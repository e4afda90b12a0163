#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! Pushy is Pushy v1 API wrapper in Rust 2021 edition.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use pushy::{Client, NotificationOptions, PushOptions};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), pushy::PushError> {
//! let client = Client::new("api-key", Duration::from_secs(30));
//! let tokens = vec!["a6345d0278adc55d3474f5".to_string()];
//! client.push_to_devices(&tokens, &json!({"message": "hello"}), None, None)?;
//!
//! let options = PushOptions::default()
//!     .time_to_live(3600)
//!     .notification(NotificationOptions::default().title("hello").badge(1));
//! client.push_to_topic("news", &json!({"message": "hello"}), Some(&options), None)?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;
use thiserror::Error;
use ureq::{Agent, AgentBuilder};
use url::Url;

pub use options::{NotificationOptions, PushOptions};
pub use request::Response;

use request::PushRequest;

mod options;
mod request;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Push error.
#[derive(Error, Debug)]
pub enum PushError {
    /// Request body could not be serialized, nothing was sent.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Error from [`ureq`] crate e.g. connection refused or timed out.
    #[error("ureq error: {0}")]
    UReq(#[from] Box<ureq::Error>),
    /// Deadline of the call passed before anything was sent.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Non-2xx status without an API error in the body.
    #[error("HTTP status {0}: {1}")]
    Status(u16, String),
    /// Response body could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Response body is not a Pushy response.
    #[error("deserialization error: {0}")]
    Deserialize(#[source] serde_json::Error),
    /// Pushy API reported an error. <https://pushy.me/docs/api/send-notifications>
    #[error("API error: {0}")]
    Api(String),
    /// Error from [`url`] crate, endpoint is malformed.
    #[error("endpoint URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Error codes of [`PushError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum ErrorCode {
    /// Pushy API reported an error.
    #[strum(serialize = "ERROR_API")]
    Api,
    /// Request body could not be serialized.
    #[strum(serialize = "ERROR_MARSHALLING_OBJECT")]
    MarshallingObject,
    /// Request failed on the wire.
    #[strum(serialize = "ERROR_REQUEST")]
    Request,
    /// Response could not be read or decoded.
    #[strum(serialize = "ERROR_DECODING_RESPONSE")]
    DecodingResponse,
    /// Endpoint is malformed.
    #[strum(serialize = "ERROR_INVALID_URL")]
    InvalidUrl,
}

impl PushError {
    /// Code of this error.
    ///
    /// ```
    /// # use pushy::{ErrorCode, PushError};
    /// let e = PushError::Api("test error".to_string());
    /// assert_eq!(ErrorCode::Api, e.code());
    /// assert_eq!("ERROR_API", e.code().to_string());
    /// ```
    pub fn code(&self) -> ErrorCode {
        match self {
            PushError::Serialize(_) => ErrorCode::MarshallingObject,
            PushError::UReq(_) | PushError::Status(..) | PushError::DeadlineExceeded => {
                ErrorCode::Request
            }
            PushError::Io(_) | PushError::Deserialize(_) => ErrorCode::DecodingResponse,
            PushError::Api(_) => ErrorCode::Api,
            PushError::Url(_) => ErrorCode::InvalidUrl,
        }
    }

    /// Whether the exchange with Pushy failed before a Pushy response was decoded.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PushError::UReq(_)
                | PushError::Status(..)
                | PushError::DeadlineExceeded
                | PushError::Io(_)
                | PushError::Deserialize(_)
        )
    }
}

#[cfg(test)]
fn server_url() -> String {
    mockito::server_url()
}

#[cfg(not(test))]
fn server_url() -> String {
    "https://api.pushy.me/".to_string()
}

/// Pushy API client. Holds no per-call state, share it between threads freely.
pub struct Client {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    agent: Agent,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a [`Client`] bound to Pushy API.
    ///
    /// Every call gives up after `timeout`, or earlier at its own deadline.
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use pushy::Client;
    /// Client::new("api-key", Duration::from_secs(5));
    /// ```
    pub fn new<T: Into<String>>(api_key: T, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: server_url(),
            timeout,
            agent: AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Creates a [`ClientBuilder`].
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use pushy::Client;
    /// let client = Client::builder("api-key")
    ///     .endpoint("http://127.0.0.1:8080/")
    ///     .timeout(Duration::from_secs(1))
    ///     .build();
    /// assert!(client.is_ok());
    /// ```
    pub fn builder<T: Into<String>>(api_key: T) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Pushes `data` to devices. <https://pushy.me/docs/api/send-notifications>
    ///
    /// Succeeds or fails as a whole, even though Pushy accepts many tokens at once.
    /// Gives up at `deadline` if it comes before the client timeout.
    pub fn push_to_devices<D>(
        &self,
        tokens: &[String],
        data: &D,
        options: Option<&PushOptions>,
        deadline: Option<Instant>,
    ) -> Result<Response, PushError>
    where
        D: Serialize + ?Sized,
    {
        debug!("push to {} device(s)", tokens.len());
        self.push(PushRequest::devices(tokens, data).with_options(options), deadline)
    }

    /// Pushes `data` to subscribers of a topic. <https://pushy.me/docs/api/send-notifications>
    ///
    /// `news` and `/topics/news` name the same topic.
    /// Gives up at `deadline` if it comes before the client timeout.
    pub fn push_to_topic<D>(
        &self,
        topic: &str,
        data: &D,
        options: Option<&PushOptions>,
        deadline: Option<Instant>,
    ) -> Result<Response, PushError>
    where
        D: Serialize + ?Sized,
    {
        let request = PushRequest::topic(topic, data).with_options(options);
        debug!("push to topic {}", request.to.as_deref().unwrap_or_default());
        self.push(request, deadline)
    }

    /// Time left for a call, bounded by the client timeout.
    fn call_timeout(&self, deadline: Option<Instant>) -> Duration {
        match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()).min(self.timeout),
            None => self.timeout,
        }
    }

    fn push<D>(
        &self,
        request: PushRequest<'_, D>,
        deadline: Option<Instant>,
    ) -> Result<Response, PushError>
    where
        D: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(&request).map_err(PushError::Serialize)?;
        let url = push_url(&self.endpoint)?;

        let timeout = self.call_timeout(deadline);
        if timeout.is_zero() {
            return Err(PushError::DeadlineExceeded);
        }

        let result = self
            .agent
            .post(url.as_str())
            .timeout(timeout)
            .query("api_key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_bytes(&body);

        let response = match result {
            Ok(r) => r,
            // Pushy answers errors with 4xx and a JSON body
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string()?;
                return match serde_json::from_str::<Response>(&body) {
                    Ok(Response {
                        error: Some(message),
                        ..
                    }) => Err(PushError::Api(message)),
                    _ => Err(PushError::Status(status, body)),
                };
            }
            Err(e) => return Err(PushError::UReq(Box::new(e))),
        };

        let body = response.into_string()?;
        let res: Response = serde_json::from_str(&body).map_err(PushError::Deserialize)?;
        match res.error {
            Some(message) => Err(PushError::Api(message)),
            None => Ok(res),
        }
    }
}

/// Builder of [`Client`].
pub struct ClientBuilder {
    api_key: String,
    endpoint: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Base URL `push` is resolved against, Pushy API by default.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Gives up calls after `timeout`, 30 seconds by default.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Builds [`Client`]. Fails if endpoint is not an absolute URL.
    pub fn build(&self) -> Result<Client, PushError> {
        let endpoint = self.endpoint.clone().unwrap_or_else(server_url);
        push_url(&endpoint)?;
        Ok(Client {
            api_key: self.api_key.clone(),
            endpoint,
            timeout: self.timeout,
            agent: AgentBuilder::new().timeout(self.timeout).build(),
        })
    }
}

fn push_url(endpoint: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(endpoint)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("push")
}

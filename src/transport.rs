//! HTTP plumbing between the resource façades and the Lexicon server.
//!
//! The façades only ever see [`Transport::request`], which answers with the
//! decoded JSON body or `None`. Everything that can go wrong on the wire
//! (connection refused, 4xx/5xx, an empty or non-JSON body) collapses into
//! `None` with a logged warning, unless the transport was built with
//! `raise_on_error`, in which case HTTP failures come back as
//! [`LexiconError::Http`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config,
    error::{LexiconError, Result},
};

/// One API call, relative to the `/v1` root.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub json: Option<Value>,
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            json: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter. Repeating a key sends it repeatedly.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// JSON body. Allowed on `GET` too; the list and search endpoints read
    /// their arguments from the body.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The path as sent: always absolute and under `/v1`.
    pub fn versioned_path(&self) -> String {
        let mut path = self.path.clone();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.starts_with("/v1/") {
            path.insert_str(0, "/v1");
        }
        path
    }
}

/// Async transport used by every resource façade.
///
/// `Ok(None)` is the uniform failure value; `Err` is reserved for transports
/// configured to raise.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: Request) -> Result<Option<Value>>;
}

/// Reqwest-backed transport talking to `http://{host}:{port}/v1`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    host: String,
    port: u16,
    default_timeout: Duration,
    raise_on_error: bool,
}

impl HttpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            host: host.into(),
            port,
            default_timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            raise_on_error: false,
        })
    }

    /// Host, port, timeout and error policy from the environment.
    pub fn from_config() -> Result<Self> {
        Ok(Self::new(config::lexicon_host(), config::lexicon_port())?
            .with_default_timeout(config::default_timeout())
            .with_raise_on_error(config::raise_on_error()))
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_raise_on_error(mut self, raise_on_error: bool) -> Self {
        self.raise_on_error = raise_on_error;
        self
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn build_url(&self, request: &Request) -> String {
        format!("{}{}", self.base_url(), request.versioned_path())
    }

    fn fail(&self, err: reqwest::Error, context: &str) -> Result<Option<Value>> {
        if self.raise_on_error {
            return Err(LexiconError::Http(err));
        }
        warn!("{context}: {err}");
        Ok(None)
    }
}

/// The server's own explanation, from `message`, `error` or `detail`.
fn server_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"].iter().find_map(|key| {
        parsed.get(*key).and_then(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> Result<Option<Value>> {
        let url = self.build_url(&request);
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(request.timeout.unwrap_or(self.default_timeout));
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return self.fail(err, &format!("{} {url} failed", request.method)),
        };

        let status_error = response.error_for_status_ref().err();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return self.fail(err, &format!("Reading response from {url} failed")),
        };

        if let Some(err) = status_error {
            if self.raise_on_error {
                return Err(LexiconError::Http(err));
            }
            match server_message(&body) {
                Some(message) => warn!("{} {url} failed: {err} ({message})", request.method),
                None => warn!("{} {url} failed: {err}", request.method),
            }
            return Ok(None);
        }

        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(Some(value)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!("Response from {url} is not JSON: {err}");
                Ok(None)
            }
        }
    }
}

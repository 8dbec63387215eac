//! Request/response data and the transport behind a session

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::{Client, ClientBuilder, StatusCode, redirect};

use crate::config::KachelmannConfig;
use crate::error::KachelmannError;

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Form fields, sent url-encoded in the body
    pub form: Vec<(String, String)>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    /// A GET request that follows redirects
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            form: Vec::new(),
            follow_redirects: true,
        }
    }

    /// A form-encoded POST request that follows redirects
    pub fn post_form<K, V>(url: impl Into<String>, form: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            form: form
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            follow_redirects: true,
        }
    }

    /// Append query parameters
    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Hand redirect responses back to the caller instead of following them
    #[must_use]
    pub const fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a form field
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// An empty response with the given status
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Add a header; invalid values are ignored
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The `Location` header, if present and valid UTF-8
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Performs HTTP round-trips for a session
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the raw response
    ///
    /// # Errors
    ///
    /// Returns a transport error if no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, KachelmannError>;
}

/// Builds a transport carrying a fixed set of default headers
#[cfg_attr(test, automock)]
pub trait Connector: Send + Sync {
    /// Create a transport that sends `headers` with every request
    ///
    /// # Errors
    ///
    /// Returns `SessionInit` if the transport cannot be initialized.
    fn connect(&self, headers: &HeaderMap) -> Result<Arc<dyn HttpTransport>, KachelmannError>;
}

/// Connector producing reqwest-backed transports
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    timeout: Duration,
    connect_timeout: Duration,
}

impl ReqwestConnector {
    /// Create a connector using the timeouts of `config`
    #[must_use]
    pub const fn new(config: &KachelmannConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }

    fn builder(&self, headers: &HeaderMap) -> ClientBuilder {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .default_headers(headers.clone())
    }
}

impl Connector for ReqwestConnector {
    fn connect(&self, headers: &HeaderMap) -> Result<Arc<dyn HttpTransport>, KachelmannError> {
        let follow = self
            .builder(headers)
            .build()
            .map_err(|e| KachelmannError::SessionInit(e.to_string()))?;
        let no_follow = self
            .builder(headers)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| KachelmannError::SessionInit(e.to_string()))?;

        Ok(Arc::new(ReqwestTransport {
            follow,
            no_follow,
            timeout_secs: self.timeout.as_secs(),
        }))
    }
}

/// Two clients sharing headers and timeouts, differing in redirect policy
#[derive(Debug)]
struct ReqwestTransport {
    follow: Client,
    no_follow: Client,
    timeout_secs: u64,
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, KachelmannError> {
        let client = if request.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| KachelmannError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| KachelmannError::from_reqwest(&e, self.timeout_secs))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

//! HTTP client utilities for the gemstore backend.
//!
//! Provides a small builder API over an async [`Transport`] with automatic
//! JSON handling and backend error-message extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use gem_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("https://api.example.com");
//!
//! let product: Product = client
//!     .get("/products/123")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;
pub use transport::{ReqwestTransport, Transport, DEFAULT_TIMEOUT};

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys())
            .finish_non_exhaustive()
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a client using the reqwest transport.
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::default())
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            base_url: None,
            default_headers: BTreeMap::new(),
            transport: Arc::new(transport),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Authenticate every request with a bearer token.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        self.with_default_header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url).accept("application/json");
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder: Ok(builder),
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    // Errors from fallible builder steps are carried to `send`.
    builder: Result<RequestBuilder, FetchError>,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.map(|b| b.header(key, value));
        self
    }

    /// Append query parameters.
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.builder = self.builder.and_then(|b| b.query(params));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.and_then(|b| b.json(value));
        self
    }

    /// Send the request and return the raw response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder?;
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }

    /// Send, fail on non-2xx, and decode the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, Transport};
}

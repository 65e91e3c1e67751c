//! Transports that actually move bytes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::{FetchError, Method, RequestBuilder, Response};

/// Something that can send a request and hand back the raw response.
///
/// Status codes are not interpreted here; that is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Native transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::from_client(reqwest::Client::new())
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::RequestError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::RequestError(e.to_string())
            }
        })?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::Transport;
    use crate::{FetchError, RequestBuilder, Response};

    #[derive(Default)]
    struct Inner {
        replies: VecDeque<Result<Response, FetchError>>,
        requests: Vec<RequestBuilder>,
    }

    /// Transport that replays queued replies and records what was sent.
    ///
    /// Clones share state, so a test can keep one handle while the client
    /// owns another.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<Inner>>,
    }

    impl MockTransport {
        /// Empty transport; sending without a queued reply is a request error.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a JSON reply.
        pub fn reply_json(&self, status: u16, body: serde_json::Value) -> &Self {
            self.push(Ok(Response::json_body(status, &body)))
        }

        /// Queue a transport failure.
        pub fn fail(&self, error: FetchError) -> &Self {
            self.push(Err(error))
        }

        fn push(&self, reply: Result<Response, FetchError>) -> &Self {
            if let Ok(mut inner) = self.inner.lock() {
                inner.replies.push_back(reply);
            }
            self
        }

        /// Every request sent so far, oldest first.
        pub fn requests(&self) -> Vec<RequestBuilder> {
            self.inner
                .lock()
                .map(|inner| inner.requests.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            let mut inner = self
                .inner
                .lock()
                .map_err(|_| FetchError::RequestError("mock lock poisoned".to_string()))?;
            inner.requests.push(request);
            inner
                .replies
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::RequestError("no reply queued".to_string())))
        }
    }
}

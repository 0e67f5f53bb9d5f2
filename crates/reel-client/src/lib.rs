//! reel-client — talks to the movie search backend.
//!
//! [`SearchClient`] POSTs a [`SearchRequest`] as JSON to the hint or search
//! endpoint over plain HTTP/1.1 and decodes the [`SearchResponse`]. The
//! [`dispatch::Dispatcher`] wraps any [`SearchBackend`] in a fire-and-forget
//! interface for the TUI: requests are spawned on a tokio runtime and their
//! results come back over a channel in whatever order they complete.

pub mod dispatch;
pub mod error;

pub use dispatch::{Dispatcher, Landed, RequestId};
pub use error::ClientError;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use reel_core::config::{QueryConfig, ServerConfig};
use reel_core::{build_query, Endpoint, SearchRequest, SearchResponse, DEFAULT_OFFSET};
use std::future::Future;
use std::time::Duration;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Anything that can answer a [`SearchRequest`]. Implemented by
/// [`SearchClient`]; tests plug in canned backends.
pub trait SearchBackend: Send + Sync + 'static {
    fn execute(
        &self,
        endpoint: Endpoint,
        request: SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send;
}

/// Build the request body for `text` with the limit configured for
/// `endpoint`.
pub fn request_for(query: &QueryConfig, endpoint: Endpoint, text: &str) -> SearchRequest {
    SearchRequest {
        kind: query.kind,
        query: build_query(text, query.limit_for(endpoint), DEFAULT_OFFSET),
    }
}

// ---------------------------------------------------------------------------
// SearchClient
// ---------------------------------------------------------------------------

pub struct SearchClient {
    http: Client<HttpConnector, Full<Bytes>>,
    query: QueryConfig,
    hint_uri: Uri,
    search_uri: Uri,
    timeout: Duration,
}

impl SearchClient {
    /// Resolve both endpoint URLs up front so a bad `base_url` fails at
    /// startup rather than on the first keystroke.
    pub fn new(server: &ServerConfig, query: &QueryConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::builder(TokioExecutor::new()).build_http(),
            query: query.clone(),
            hint_uri: parse_http_uri(&server.url_for(Endpoint::Hint))?,
            search_uri: parse_http_uri(&server.url_for(Endpoint::Search))?,
            timeout: Duration::from_millis(server.timeout_ms),
        })
    }

    pub fn uri(&self, endpoint: Endpoint) -> &Uri {
        match endpoint {
            Endpoint::Hint => &self.hint_uri,
            Endpoint::Search => &self.search_uri,
        }
    }

    /// Look up hints for `text`; the backend only reads the terms.
    pub async fn hint(&self, text: &str) -> Result<SearchResponse, ClientError> {
        self.send(Endpoint::Hint, &request_for(&self.query, Endpoint::Hint, text))
            .await
    }

    /// Full search for `text` including metadata filters.
    pub async fn search(&self, text: &str) -> Result<SearchResponse, ClientError> {
        self.send(
            Endpoint::Search,
            &request_for(&self.query, Endpoint::Search, text),
        )
        .await
    }

    /// POST `request` to `endpoint`. A non-zero response code is logged and
    /// the response returned as-is so its payload can still be shown.
    pub async fn send(
        &self,
        endpoint: Endpoint,
        request: &SearchRequest,
    ) -> Result<SearchResponse, ClientError> {
        let body = serde_json::to_vec(request).map_err(ClientError::Encode)?;
        tracing::debug!(
            %endpoint,
            terms = request.query.term.len(),
            filters = request.query.metadata.len(),
            limit = request.query.limit,
            "sending request"
        );

        let response = tokio::time::timeout(self.timeout, self.exchange(endpoint, body))
            .await
            .map_err(|_| ClientError::Timeout {
                endpoint,
                after: self.timeout,
            })??;

        if !response.is_success() {
            tracing::warn!(
                %endpoint,
                code = response.code,
                errmsg = response.errmsg.as_deref().unwrap_or(""),
                "backend returned non-zero code"
            );
        }
        tracing::debug!(%endpoint, movies = response.payload.len(), "response received");
        Ok(response)
    }

    async fn exchange(
        &self,
        endpoint: Endpoint,
        body: Vec<u8>,
    ) -> Result<SearchResponse, ClientError> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(endpoint).clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let resp = self.http.request(req).await?;
        let status = resp.status();
        let bytes = resp.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            return Err(ClientError::Status { endpoint, status });
        }

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { endpoint, source })
    }
}

impl SearchBackend for SearchClient {
    fn execute(
        &self,
        endpoint: Endpoint,
        request: SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send {
        async move { self.send(endpoint, &request).await }
    }
}

fn parse_http_uri(url: &str) -> Result<Uri, ClientError> {
    let uri = url.parse::<Uri>().map_err(|e| ClientError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match uri.scheme_str() {
        Some("http") if uri.authority().is_some() => Ok(uri),
        Some("http") => Err(ClientError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        }),
        _ => Err(ClientError::InvalidUrl {
            url: url.to_string(),
            reason: "only http:// URLs are supported".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

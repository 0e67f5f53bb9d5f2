use reel_core::Endpoint;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between building a request and decoding the
/// backend's reply. A non-zero response `code` is not an error.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP request: {0}")]
    Request(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("{endpoint} endpoint answered HTTP {status}")]
    Status {
        endpoint: Endpoint,
        status: hyper::StatusCode,
    },

    #[error("{endpoint} endpoint sent an undecodable body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} request timed out after {after:?}")]
    Timeout { endpoint: Endpoint, after: Duration },
}

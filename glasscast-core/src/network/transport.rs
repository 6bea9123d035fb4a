use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url, header::HeaderMap};

use super::{HttpMethod, NetworkError};

/// A request with URL, headers and body fully resolved.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

/// Status and body as received; classification happens in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Executes one prepared request. Implementations classify their own
/// failures into `NetworkUnavailable`, `Timeout` or `TransportFailure`.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, NetworkError>;
}

/// Production transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, NetworkError> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let res = builder.send().await.map_err(classify_reqwest_error)?;
        let status = res.status().as_u16();
        let body = res.bytes().await.map_err(classify_reqwest_error)?;

        Ok(RawResponse { status, body: body.to_vec() })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> NetworkError {
    tracing::debug!(error = %err, "transport error");

    if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_connect() {
        NetworkError::NetworkUnavailable
    } else {
        NetworkError::TransportFailure(Box::new(err))
    }
}

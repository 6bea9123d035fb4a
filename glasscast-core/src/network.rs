//! Generic typed HTTP request pipeline.
//!
//! A call goes through URL construction, header merge, body encoding, the
//! [`Transport`], status classification and decoding, in that order and
//! exactly once. Nothing is retried or cached.

pub mod config;
pub mod error;
pub mod request;
pub mod service;
pub mod transport;

pub use config::{DEFAULT_TIMEOUT, EndpointConfig, WEATHER_API_BASE_URL};
pub use error::{BoxError, NetworkError};
pub use request::{ApiRequest, HttpMethod};
pub use service::NetworkService;
pub use transport::{PreparedRequest, RawResponse, ReqwestTransport, Transport};

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use super::{NetworkError, PreparedRequest, RawResponse, Transport};

    #[derive(Debug)]
    enum Mode {
        Replay(VecDeque<Result<RawResponse, NetworkError>>),
        Echo,
    }

    /// In-memory transport that records every request it receives.
    #[derive(Debug)]
    pub struct MockTransport {
        mode: Mutex<Mode>,
        requests: Mutex<Vec<PreparedRequest>>,
    }

    impl MockTransport {
        fn with_mode(mode: Mode) -> Arc<Self> {
            Arc::new(Self { mode: Mutex::new(mode), requests: Mutex::new(Vec::new()) })
        }

        pub fn replying(responses: impl IntoIterator<Item = RawResponse>) -> Arc<Self> {
            Self::with_mode(Mode::Replay(responses.into_iter().map(Ok).collect()))
        }

        pub fn failing(err: NetworkError) -> Arc<Self> {
            Self::with_mode(Mode::Replay(VecDeque::from([Err(err)])))
        }

        /// Answers 200 with the request body.
        pub fn echo() -> Arc<Self> {
            Self::with_mode(Mode::Echo)
        }

        pub fn requests(&self) -> Vec<PreparedRequest> {
            self.requests.lock().expect("requests mutex poisoned").clone()
        }

        pub fn hits(&self) -> usize {
            self.requests.lock().expect("requests mutex poisoned").len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: PreparedRequest) -> Result<RawResponse, NetworkError> {
            let body = request.body.clone().unwrap_or_default();
            self.requests.lock().expect("requests mutex poisoned").push(request);

            match &mut *self.mode.lock().expect("mode mutex poisoned") {
                Mode::Echo => Ok(RawResponse::new(200, body)),
                Mode::Replay(queue) => queue
                    .pop_front()
                    .unwrap_or_else(|| Ok(RawResponse::new(500, "no mock response queued"))),
            }
        }
    }

    pub fn json_response(status: u16, body: serde_json::Value) -> RawResponse {
        RawResponse::new(status, body.to_string())
    }
}

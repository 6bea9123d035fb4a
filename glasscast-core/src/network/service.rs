use std::sync::Arc;

use reqwest::{
    Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    ApiRequest, EndpointConfig, NetworkError, PreparedRequest, RawResponse, ReqwestTransport,
    Transport,
};

/// Keys checked, in order, for a human-readable message in an error body.
const MESSAGE_KEYS: [&str; 3] = ["msg", "message", "error_description"];

/// Query parameters and JSON fields masked in debug traces.
const SECRET_QUERY_KEYS: [&str; 2] = ["key", "apikey"];
const SECRET_BODY_KEYS: [&str; 3] = ["password", "access_token", "refresh_token"];
const REDACTED: &str = "<redacted>";

/// Typed request pipeline bound to one backend.
///
/// Holds only the immutable [`EndpointConfig`] and a shared [`Transport`], so
/// clones are cheap and concurrent calls need no coordination.
#[derive(Debug, Clone)]
pub struct NetworkService {
    config: Arc<EndpointConfig>,
    transport: Arc<dyn Transport>,
}

impl NetworkService {
    pub fn new(config: EndpointConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: EndpointConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config: Arc::new(config), transport }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Runs one round trip and decodes the 2xx body as `T`.
    ///
    /// An empty 2xx body decodes as JSON `null`; use `()` or
    /// `serde::de::IgnoredAny` when no payload is expected.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, NetworkError> {
        let prepared = self.prepare(request)?;

        tracing::debug!(
            method = %prepared.method,
            url = %redacted_url(&prepared.url),
            "sending request"
        );
        if let Some(body) = &prepared.body {
            tracing::debug!(body = %redacted_body(body), "request body");
        }

        let response = self.transport.send(prepared).await?;

        tracing::debug!(status = response.status, "received response");
        tracing::debug!(body = %redacted_body(&response.body), "response body");

        decode_response(response)
    }

    /// Resolves URL, headers and body without touching the transport.
    pub fn prepare(&self, request: ApiRequest) -> Result<PreparedRequest, NetworkError> {
        let url = build_url(self.config.base_url(), &request.path, &request.query)?;
        let headers = merge_headers(self.config.headers(), &request.headers)?;
        let body = request.body.transpose().map_err(NetworkError::SerializationFailed)?;

        Ok(PreparedRequest {
            method: request.method,
            url,
            headers,
            body,
            timeout: self.config.timeout(),
        })
    }
}

fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Url, NetworkError> {
    let mut url = Url::parse(&format!("{base_url}{path}")).map_err(|err| {
        tracing::debug!(error = %err, base_url, path, "cannot build request url");
        NetworkError::MalformedRequest
    })?;

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
}

/// JSON defaults, then backend headers, then call headers; later writers win.
fn merge_headers(
    config_headers: &[(String, String)],
    call_headers: &[(String, String)],
) -> Result<HeaderMap, NetworkError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in config_headers.iter().chain(call_headers) {
        let name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| NetworkError::MalformedRequest)?;
        let value = HeaderValue::from_str(value).map_err(|_| NetworkError::MalformedRequest)?;
        headers.insert(name, value);
    }

    Ok(headers)
}

fn decode_response<T: DeserializeOwned>(response: RawResponse) -> Result<T, NetworkError> {
    let RawResponse { status, body } = response;

    if !(100..=599).contains(&status) {
        return Err(NetworkError::InvalidResponse);
    }

    if !(200..=299).contains(&status) {
        return Err(classify_failure(status, &body));
    }

    let payload: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &body };
    serde_json::from_slice(payload).map_err(NetworkError::DecodingFailed)
}

fn classify_failure(status: u16, body: &[u8]) -> NetworkError {
    match (status, extract_message(body)) {
        (_, Some(message)) => NetworkError::ApiMessage(message),
        (401 | 403, None) => NetworkError::Unauthorized,
        (_, None) => {
            let body = String::from_utf8(body.to_vec()).ok().filter(|text| !text.is_empty());
            NetworkError::ServerError { status, body }
        }
    }
}

fn redacted_url(url: &Url) -> String {
    let is_secret = |key: &str| SECRET_QUERY_KEYS.iter().any(|s| key.eq_ignore_ascii_case(s));
    if !url.query_pairs().any(|(key, _)| is_secret(&key)) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if is_secret(&key) { REDACTED.into() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();

    let mut url = url.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

fn redacted_body(body: &[u8]) -> String {
    let Ok(Value::Object(mut object)) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).into_owned();
    };

    for key in SECRET_BODY_KEYS {
        if let Some(value) = object.get_mut(key) {
            *value = Value::String(REDACTED.to_string());
        }
    }
    Value::Object(object).to_string()
}

fn extract_message(body: &[u8]) -> Option<String> {
    let object: serde_json::Map<String, Value> = serde_json::from_slice(body).ok()?;

    MESSAGE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::error::Error;

/// JSON transport to the backend. Object-safe so the session can hold
/// an `Arc<dyn ApiTransport>` and tests can substitute a scripted fake.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error>;

    async fn post(&self, path: &str, body: Value) -> Result<Value, Error>;

    /// Attach a bearer token to subsequent requests. No-op by default so
    /// fakes that never check auth don't have to implement it.
    async fn authorize(&self, _token: &str) {}
}

/// Production transport backed by `reqwest`.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl HttpClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bearer: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value, Error> {
        let request = match self.bearer.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Network(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl ApiTransport for HttpClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        self.dispatch(self.http.get(self.url(path)).query(query))
            .await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, Error> {
        self.dispatch(self.http.post(self.url(path)).json(&body))
            .await
    }

    async fn authorize(&self, token: &str) {
        *self.bearer.write().await = Some(token.to_string());
    }
}

/// Error-payload convention of the backend: `{ "error": ... }` or
/// `{ "message": ... }`, passed through verbatim when present.
fn remote_error(status: reqwest::StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|payload| {
            payload
                .get("error")
                .or_else(|| payload.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });
    match message {
        Some(message) => Error::Remote(message),
        None => Error::Remote(format!("HTTP {status}")),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::Network(format!("invalid {what} payload: {e}")))
}

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("elegirclinica/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} answered {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Short text suitable for a user-facing notice.
    pub fn detail(&self) -> String {
        match self {
            Self::Status {
                status, message, ..
            } => format!("{status}: {message}"),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            proxy: None,
            follow_redirects: true,
        }
    }
}

/// Thin JSON-over-HTTP client for the backend collections.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );

        let redirect_policy = if options.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(redirect_policy)
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)));

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild { source: e })?;
        Ok(Self { http })
    }

    /// GETs `url` (with `query` pairs URL-encoded and appended) and parses the
    /// body as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(|e| transport(url, e))?;
        let response = check_status(url, &Method::GET, response).await?;
        let body = response.text().await.map_err(|e| transport(url, e))?;
        serde_json::from_str(&body).map_err(|e| ClientError::Parse {
            url: url.to_string(),
            source: e,
        })
    }

    /// Sends `body` as `application/json`. The response body is not read.
    pub async fn send_json(&self, method: Method, url: &str, body: &Value) -> Result<(), ClientError> {
        let response = self
            .http
            .request(method.clone(), url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(url, e))?;
        check_status(url, &method, response).await?;
        Ok(())
    }

    pub async fn delete(&self, url: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;
        check_status(url, &Method::DELETE, response).await?;
        Ok(())
    }
}

fn transport(url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn check_status(
    url: &str,
    method: &Method,
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    debug!(%method, url, status = status.as_u16(), "response");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    Err(ClientError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Extracts the server's error text: the `message` field of a JSON payload,
/// else the trimmed body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(Value::String(text)) = map.get(key) {
                return Some(text.clone());
            }
        }
    }
    Some(trimmed.chars().take(MAX_ERROR_BODY).collect())
}

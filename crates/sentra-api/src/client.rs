// Gateway HTTP client
//
// Wraps `reqwest::Client` with gateway URL construction and uniform
// response handling. Endpoint groups (devices, points, rules, monitor,
// system) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTP client for the Sentra gateway's REST API.
///
/// All request helpers apply the same contract: any non-2xx status is an
/// [`Error::Status`] with the code retained; successful bodies are decoded
/// as JSON (or discarded for write endpoints whose echo we never use).
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new client for the gateway at `base_url`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::decode_json(resp).await
    }

    /// Send a POST request with a JSON body; the response body is discarded.
    pub(crate) async fn post<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;
        Self::ensure_success(resp).await.map(drop)
    }

    /// Send a PUT request with a JSON body; the response body is discarded.
    pub(crate) async fn put<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self.http.put(url).json(body).send().await?;
        Self::ensure_success(resp).await.map(drop)
    }

    /// Send a POST request without a body; the response body is discarded.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).send().await?;
        Self::ensure_success(resp).await.map(drop)
    }

    /// Send a POST request without a body and decode the JSON response.
    pub(crate) async fn post_empty_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).send().await?;
        Self::decode_json(resp).await
    }

    /// Send a DELETE request; the response body is discarded.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.http.delete(url).send().await?;
        Self::ensure_success(resp).await.map(drop)
    }

    /// Send a multipart POST (used for the config import upload).
    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<(), Error> {
        debug!("POST (multipart) {}", url);
        let resp = self.http.post(url).multipart(form).send().await?;
        Self::ensure_success(resp).await.map(drop)
    }

    /// Send a GET request and return the raw bytes (binary downloads).
    pub(crate) async fn get_bytes(&self, url: Url) -> Result<bytes::Bytes, Error> {
        debug!("GET (binary) {}", url);
        let resp = self.http.get(url).send().await?;
        let resp = Self::ensure_success(resp).await?;
        Ok(resp.bytes().await?)
    }

    /// Reject non-2xx responses, keeping a body preview for display.
    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            body: preview(&body).to_owned(),
        })
    }

    /// Decode a successful response body as JSON.
    async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::ensure_success(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Clip an error-body preview to ~200 bytes without splitting a multibyte
/// character — the gateway's bodies are Chinese-localized.
fn preview(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

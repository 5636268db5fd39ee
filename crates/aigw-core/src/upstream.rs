//! Shared upstream HTTP client.
//!
//! Responses always surface as a byte stream fed by a reader task, so the
//! gateway treats streaming and buffered upstream bodies uniformly and the
//! observer can tee either. Idle reads are bounded; the overall request is
//! bounded only by the client's lifetime.

use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use aigw_routing::Headers;

#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    pub connect_timeout: Duration,
    pub stream_idle_timeout: Duration,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            stream_idle_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid request method: {0}")]
    Method(String),
    #[error("upstream request failed: {0}")]
    Transport(#[from] wreq::Error),
}

pub struct UpstreamRequest {
    pub method: http::Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<wreq::Body>,
}

pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: mpsc::Receiver<Bytes>,
}

impl UpstreamResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        aigw_routing::header_get(&self.headers, name)
    }
}

pub struct UpstreamClient {
    client: wreq::Client,
    stream_idle_timeout: Duration,
}

impl UpstreamClient {
    /// No redirects, no cookies, no automatic decompression; Accept-Encoding
    /// passes through and the client re-frames the request body.
    pub fn new(config: UpstreamClientConfig) -> Result<Self, wreq::Error> {
        let client = wreq::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.stream_idle_timeout)
            .redirect(wreq::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            stream_idle_timeout: config.stream_idle_timeout,
        })
    }

    pub async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let method = wreq::Method::from_bytes(req.method.as_str().as_bytes())
            .map_err(|_| UpstreamError::Method(req.method.to_string()))?;
        let mut builder = self.client.request(method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in resp.headers() {
            if let Ok(value) = value.to_str() {
                headers.push((name.as_str().to_string(), value.to_string()));
            }
        }

        let idle = self.stream_idle_timeout;
        let (tx, rx) = mpsc::channel::<Bytes>(16);
        tokio::spawn(async move {
            let mut stream = resp.bytes_stream();
            loop {
                let next = match tokio::time::timeout(idle, stream.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        debug!("upstream read idle timeout");
                        break;
                    }
                };
                let Some(item) = next else {
                    break;
                };
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        debug!(error = %err, "upstream read failed mid-stream");
                        break;
                    }
                };
                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
        });

        Ok(UpstreamResponse {
            status,
            headers,
            body: rx,
        })
    }
}

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header, request::Parts};
use axum::response::Response;
use futures_util::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use aigw_routing::{ParsedPath, StrategyRegistry, header_get};
use aigw_usage::{TrackerSet, observe};

use crate::error::ProxyError;
use crate::forward::{build_upstream_headers, is_hop_by_hop_or_framing};
use crate::upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};

pub struct GatewayState {
    pub registry: Arc<StrategyRegistry>,
    pub client: Arc<UpstreamClient>,
    pub trackers: Arc<TrackerSet>,
}

/// Fallback handler for `/{provider}/{rest...}`: parse, route, forward, and
/// observe. The single synchronous failure boundary for the client; usage
/// observation past this point is best-effort.
pub async fn proxy_handler(State(state): State<Arc<GatewayState>>, req: Request) -> Response {
    let request_id = Uuid::now_v7().to_string();
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let parsed = ParsedPath::parse(parts.uri.path(), parts.uri.query().unwrap_or(""));

    let target = match state.registry.route(&parsed) {
        Ok(target) => target,
        Err(err) => {
            info!(
                event = "route_rejected",
                request_id = %request_id,
                method = %parts.method,
                path = %parsed.original,
                error = %err,
            );
            return ProxyError::not_found(err.to_string()).into_response();
        }
    };

    info!(
        event = "request_received",
        request_id = %request_id,
        provider = %target.provider,
        method = %parts.method,
        path = %parsed.original,
    );

    let upstream_headers = build_upstream_headers(&parts.headers, &target.extra_headers);
    let request = UpstreamRequest {
        method: parts.method.clone(),
        url: target.target_uri(),
        headers: upstream_headers,
        body: request_body(&parts, body),
    };

    let UpstreamResponse {
        status,
        headers: response_headers,
        body: response_body,
    } = match state.client.send(request).await {
        Ok(response) => response,
        Err(err) => {
            warn!(
                event = "upstream_failed",
                request_id = %request_id,
                provider = %target.provider,
                error = %err,
            );
            return ProxyError::bad_gateway().into_response();
        }
    };

    let response_body = match state.trackers.match_for(&parsed) {
        Some(tracker) => observe(
            response_body,
            header_get(&response_headers, "content-type"),
            header_get(&response_headers, "content-encoding"),
            tracker,
            request_id.clone(),
            target.provider.clone(),
        ),
        None => response_body,
    };

    info!(
        event = "request_forwarded",
        request_id = %request_id,
        provider = %target.provider,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
    );

    build_response(status, &response_headers, &request_id, response_body)
}

/// A body is forwarded only when the inbound request actually carries one;
/// bodyless methods must not grow a chunked transfer encoding upstream.
fn request_body(parts: &Parts, body: Body) -> Option<wreq::Body> {
    let declared = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let has_body = match declared {
        Some(length) => length > 0,
        None => {
            parts.headers.contains_key(header::TRANSFER_ENCODING)
                || !(parts.method == Method::GET
                    || parts.method == Method::HEAD
                    || parts.method == Method::DELETE
                    || parts.method == Method::OPTIONS
                    || parts.method == Method::TRACE)
        }
    };
    has_body.then(|| wreq::Body::wrap_stream(body.into_data_stream()))
}

fn build_response(
    status: u16,
    upstream_headers: &aigw_routing::Headers,
    request_id: &str,
    body: tokio::sync::mpsc::Receiver<bytes::Bytes>,
) -> Response {
    let mut builder =
        Response::builder().status(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY));
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in upstream_headers {
            // Hyper sets framing itself.
            if is_hop_by_hop_or_framing(name) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert("x-aigw-request-id", value);
        }
    }

    let stream = ReceiverStream::new(body).map(Ok::<_, Infallible>);
    builder
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| ProxyError::internal().into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(method: Method, headers: &[(&str, &str)]) -> Parts {
        let mut builder = axum::http::Request::builder().method(method).uri("/openai/v1/models");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bodyless_methods_forward_no_body() {
        assert!(request_body(&parts(Method::GET, &[]), Body::empty()).is_none());
        assert!(request_body(&parts(Method::DELETE, &[]), Body::empty()).is_none());
    }

    #[test]
    fn post_forwards_a_body() {
        assert!(request_body(&parts(Method::POST, &[]), Body::empty()).is_some());
        assert!(
            request_body(
                &parts(Method::GET, &[("content-length", "42")]),
                Body::empty()
            )
            .is_some()
        );
        assert!(
            request_body(
                &parts(Method::POST, &[("content-length", "0")]),
                Body::empty()
            )
            .is_none()
        );
    }

    #[test]
    fn response_keeps_upstream_headers_and_stamps_request_id() {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        let headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("transfer-encoding".to_string(), "chunked".to_string()),
        ];
        let resp = build_response(200, &headers, "req-1", rx);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");
        assert!(resp.headers().get("transfer-encoding").is_none());
        assert_eq!(resp.headers().get("x-aigw-request-id").unwrap(), "req-1");
    }
}

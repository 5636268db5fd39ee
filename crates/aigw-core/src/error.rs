use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

/// A gateway-produced error response. Plain text; upstream error bodies are
/// passed through elsewhere untouched.
#[derive(Debug)]
pub struct ProxyError {
    pub status: StatusCode,
    pub body: String,
}

impl ProxyError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: message.into(),
        }
    }

    pub fn bad_gateway() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: "Bad Gateway".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "Internal server error during request forwarding".to_string(),
        }
    }

    pub fn into_response(self) -> Response {
        let mut resp = Response::new(Body::from(self.body));
        *resp.status_mut() = self.status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_bodies_are_plain_text() {
        let resp = ProxyError::bad_gateway().into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}

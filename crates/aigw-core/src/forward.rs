//! Outbound request header transformation.

use axum::http::HeaderMap;

use aigw_routing::{Headers, header_add_if_absent};

/// Proxy/edge headers never forwarded upstream, compared case-insensitively.
const STRIPPED_HEADERS: &[&str] = &[
    "x-forwarded-for",
    "x-forwarded-host",
    "x-forwarded-proto",
    "x-real-ip",
    "cf-connecting-ip",
    "cf-connecting-ipv6",
    "cf-pseudo-ipv4",
    "true-client-ip",
    "cf-ray",
    "cf-ipcountry",
];

fn is_stripped(name: &str) -> bool {
    STRIPPED_HEADERS.iter().any(|header| name.eq_ignore_ascii_case(header))
}

/// Hop-by-hop and framing headers; the upstream client re-frames the request
/// and derives Host from the target URI.
pub(crate) fn is_hop_by_hop_or_framing(name: &str) -> bool {
    name.eq_ignore_ascii_case("host")
        || name.eq_ignore_ascii_case("content-length")
        || name.eq_ignore_ascii_case("transfer-encoding")
        || name.eq_ignore_ascii_case("connection")
        || name.eq_ignore_ascii_case("keep-alive")
        || name.eq_ignore_ascii_case("proxy-authenticate")
        || name.eq_ignore_ascii_case("proxy-authorization")
        || name.eq_ignore_ascii_case("te")
        || name.eq_ignore_ascii_case("trailer")
        || name.eq_ignore_ascii_case("upgrade")
}

/// Inbound headers minus the sanitization lists, plus strategy-supplied
/// headers (which never override a header the client already sent).
pub fn build_upstream_headers(inbound: &HeaderMap, extra: &Headers) -> Headers {
    let mut out = Headers::new();
    for (name, value) in inbound {
        let name = name.as_str();
        if is_stripped(name) || is_hop_by_hop_or_framing(name) {
            continue;
        }
        if let Ok(value) = value.to_str() {
            out.push((name.to_string(), value.to_string()));
        }
    }
    for (name, value) in extra {
        header_add_if_absent(&mut out, name, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use aigw_routing::header_get;
    use axum::http::HeaderValue;

    use super::*;

    fn inbound(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                name.parse::<axum::http::HeaderName>().unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn proxy_headers_are_stripped_case_insensitively() {
        let map = inbound(&[
            ("Authorization", "Bearer X"),
            ("X-Forwarded-For", "1.2.3.4"),
            ("X-FORWARDED-HOST", "evil.example"),
            ("CF-Connecting-IP", "1.2.3.4"),
            ("True-Client-IP", "1.2.3.4"),
            ("cf-ray", "abc"),
        ]);
        let out = build_upstream_headers(&map, &Headers::new());
        assert_eq!(header_get(&out, "authorization"), Some("Bearer X"));
        for name in super::STRIPPED_HEADERS {
            assert_eq!(header_get(&out, name), None, "{name} should be stripped");
        }
    }

    #[test]
    fn host_and_framing_headers_are_dropped() {
        let map = inbound(&[
            ("Host", "gateway.local"),
            ("Content-Length", "12"),
            ("Connection", "keep-alive"),
            ("Content-Type", "application/json"),
        ]);
        let out = build_upstream_headers(&map, &Headers::new());
        assert_eq!(header_get(&out, "host"), None);
        assert_eq!(header_get(&out, "content-length"), None);
        assert_eq!(header_get(&out, "connection"), None);
        assert_eq!(header_get(&out, "content-type"), Some("application/json"));
    }

    #[test]
    fn strategy_headers_do_not_override_client_headers() {
        let map = inbound(&[("X-Custom", "client")]);
        let extra = vec![
            ("X-Custom".to_string(), "strategy".to_string()),
            ("X-Added".to_string(), "strategy".to_string()),
        ];
        let out = build_upstream_headers(&map, &extra);
        assert_eq!(header_get(&out, "x-custom"), Some("client"));
        assert_eq!(header_get(&out, "x-added"), Some("strategy"));
    }

    #[test]
    fn accept_encoding_passes_through() {
        let map = inbound(&[("Accept-Encoding", "gzip, br")]);
        let out = build_upstream_headers(&map, &Headers::new());
        assert_eq!(header_get(&out, "accept-encoding"), Some("gzip, br"));
    }
}

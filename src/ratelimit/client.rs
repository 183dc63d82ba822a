//! Client Identification
//!
//! Derives the token a request is counted under.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use tracing::debug;

/// Header set by proxies; the first entry is the originating client.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Header set by nginx-style proxies.
pub const REAL_IP: &str = "x-real-ip";

/// Returns the client token for a request with these headers.
///
/// Order: first `x-forwarded-for` entry, then `x-real-ip`, then
/// `"{user-agent}:{unix minute}"`. The last one is a coarse bucket for
/// requests without address information and is trivially spoofable.
pub fn client_token(headers: &HeaderMap) -> String {
    client_token_at(headers, Utc::now().timestamp().div_euclid(60))
}

/// Same as [`client_token`] with the minute bucket supplied by the caller.
pub fn client_token_at(headers: &HeaderMap, unix_minute: i64) -> String {
    let forwarded = header_str(headers, FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    if let Some(ip) = header_str(headers, REAL_IP).map(str::trim).filter(|v| !v.is_empty()) {
        return ip.to_string();
    }

    let agent = header_str(headers, header::USER_AGENT.as_str()).unwrap_or("unknown");
    debug!(agent, "no address headers, using agent bucket");
    format!("{agent}:{unix_minute}")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// == Client Token Extractor ==
/// Axum extractor yielding the request's client token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientToken(client_token(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let h = headers(&[
            (FORWARDED_FOR, " 203.0.113.7 , 10.0.0.1"),
            (REAL_IP, "10.0.0.2"),
        ]);
        assert_eq!(client_token_at(&h, 0), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_when_no_forwarded_for() {
        let h = headers(&[(REAL_IP, "198.51.100.4"), ("user-agent", "curl/8")]);
        assert_eq!(client_token_at(&h, 0), "198.51.100.4");
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        let h = headers(&[(FORWARDED_FOR, " "), (REAL_IP, "198.51.100.4")]);
        assert_eq!(client_token_at(&h, 0), "198.51.100.4");
    }

    #[test]
    fn test_agent_minute_fallback() {
        let h = headers(&[("user-agent", "Mozilla/5.0")]);
        assert_eq!(client_token_at(&h, 29_000_000), "Mozilla/5.0:29000000");
        assert_ne!(client_token_at(&h, 1), client_token_at(&h, 2));
    }

    #[test]
    fn test_fallback_without_agent() {
        assert_eq!(client_token_at(&HeaderMap::new(), 7), "unknown:7");
    }

    #[tokio::test]
    async fn test_extractor_reads_headers() {
        let request = axum::http::Request::builder()
            .header(FORWARDED_FOR, "1.2.3.4")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ClientToken(token) = ClientToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(token, "1.2.3.4");
    }
}

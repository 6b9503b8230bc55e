//! IP-based access control for the write endpoint
//!
//! Caller identity is the client IP, resolved from proxy headers with a
//! fixed precedence and checked against a startup-time allowlist. The proxy
//! headers are trusted unconditionally, which is only sound behind a
//! trusted reverse proxy.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolve the effective client address.
///
/// Precedence: first comma-separated entry of `x-forwarded-for`, then
/// `x-real-ip`, then the raw socket peer.
pub fn resolve_client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            let ip = ip_str.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    peer.ip().to_string()
}

/// Exact string membership in the allowlist. Representation differences
/// (IPv6-mapped forms, leading zeros) read as deny.
pub fn is_allowed(ip: &str, allowlist: &[String]) -> bool {
    allowlist.iter().any(|allowed| allowed == ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:54321".parse().unwrap()
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("9.9.9.9, 1.2.3.4"));
        assert_eq!(resolve_client_ip(&headers, peer()), "9.9.9.9");
    }

    #[test]
    fn test_forwarded_for_beats_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("9.9.9.9"));
        headers.insert("x-real-ip", HeaderValue::from_static("8.8.8.8"));
        assert_eq!(resolve_client_ip(&headers, peer()), "9.9.9.9");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static(" 8.8.8.8 "));
        assert_eq!(resolve_client_ip(&headers, peer()), "8.8.8.8");
    }

    #[test]
    fn test_socket_peer_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_client_ip(&headers, peer()), "10.0.0.1");
    }

    #[test]
    fn test_empty_forwarded_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(resolve_client_ip(&headers, peer()), "10.0.0.1");
    }

    #[test]
    fn test_allowlist_membership() {
        let allowlist = vec!["1.2.3.4".to_string()];
        assert!(is_allowed("1.2.3.4", &allowlist));
        assert!(!is_allowed("1.2.3.5", &allowlist));
        assert!(!is_allowed("01.2.3.4", &allowlist));
        assert!(!is_allowed("", &allowlist));
    }
}

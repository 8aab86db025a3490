//! IP 地址处理工具
//!
//! 客户端地址取值顺序：X-Forwarded-For 第一个 → X-Real-IP → 连接地址

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_or_local(&IpAddr::V4(v4));
            }
            // - fc00::/7 (ULA)
            // - fe80::/10 (Link-local)
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// 解析 `ip`、`ip:port` 或 `[v6]:port`，IPv4-mapped IPv6 还原为 IPv4
pub fn parse_client_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    let ip = raw
        .parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|s| s.ip()))?;

    Some(match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    })
}

/// 从 HttpRequest 提取客户端 IP
///
/// Only values that parse as an address are returned; header junk yields `None`.
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip_from_headers(req.headers())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .and_then(|raw| parse_client_ip(&raw))
        .map(|ip| ip.to_string())
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            // 其次 X-Real-IP
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_is_private_or_local_ipv4() {
        assert!(is_private_or_local(&"10.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"172.16.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"192.168.1.1".parse().unwrap()));
        assert!(is_private_or_local(&"127.0.0.1".parse().unwrap()));
        assert!(!is_private_or_local(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_or_local(&"1.1.1.1".parse().unwrap()));
    }

    #[test]
    fn test_is_private_or_local_ipv6() {
        assert!(is_private_or_local(&"::1".parse().unwrap()));
        assert!(is_private_or_local(&"fd00::1".parse().unwrap()));
        assert!(is_private_or_local(&"fe80::1".parse().unwrap()));
        assert!(is_private_or_local(&"::ffff:192.168.0.7".parse().unwrap()));
        assert!(!is_private_or_local(
            &"2001:4860:4860::8888".parse().unwrap()
        ));
    }

    #[test]
    fn test_parse_client_ip() {
        assert_eq!(parse_client_ip("8.8.8.8"), Some("8.8.8.8".parse().unwrap()));
        assert_eq!(
            parse_client_ip("8.8.8.8:4431"),
            Some("8.8.8.8".parse().unwrap())
        );
        assert_eq!(
            parse_client_ip("::ffff:1.2.3.4"),
            Some("1.2.3.4".parse().unwrap())
        );
        assert_eq!(
            parse_client_ip("[2001:db8::1]:443"),
            Some("2001:db8::1".parse().unwrap())
        );
        assert_eq!(parse_client_ip("unknown"), None);
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.2"))
            .insert_header(("X-Real-IP", "198.51.100.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req).as_deref(), Some("198.51.100.1"));
    }

    #[test]
    fn test_peer_address_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:51000".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req).as_deref(), Some("192.0.2.10"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_ip(&req), None);
    }

    #[test]
    fn test_unparseable_header_is_dropped() {
        let junk = "x".repeat(300);
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", junk.as_str()))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), None);

        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "unknown"))
            .peer_addr("192.0.2.10:51000".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), None);
    }
}

#![doc = include_str!("../README.md")]

use http::{HeaderMap, HeaderValue};
use ipnetwork::IpNetwork;
use std::net::{IpAddr, SocketAddr};
use std::str::from_utf8;

pub const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Returns `true` if `ip` belongs to one of the `trusted_proxies` networks.
pub fn is_trusted_proxy(ip: &IpAddr, trusted_proxies: &[IpNetwork]) -> bool {
    trusted_proxies
        .iter()
        .any(|network| network.contains(*ip))
}

/// Returns the right-most valid address from all `X-Forwarded-For` headers
/// that is not inside one of the `trusted_proxies` networks.
///
/// Multiple headers are treated as a single list in the order they were
/// received, as if they had been joined with commas. Entries that can't be
/// parsed as an IP address (or an `ip:port` pair) are skipped.
pub fn process_xff_headers(headers: &HeaderMap, trusted_proxies: &[IpNetwork]) -> Option<IpAddr> {
    headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .flat_map(parse_xff_header)
        .filter_map(Result::ok)
        .filter(|ip| !is_trusted_proxy(ip, trusted_proxies))
        .next_back()
}

/// Parses the content of an `X-Forwarded-For` header into a
/// `Vec<Result<IpAddr, &[u8]>>`.
fn parse_xff_header(header: &HeaderValue) -> Vec<Result<IpAddr, &[u8]>> {
    let bytes = header.as_bytes();
    if bytes.is_empty() {
        return vec![];
    }

    bytes.split(|&byte| byte == b',').map(parse_ip_addr).collect()
}

fn parse_ip_addr(bytes: &[u8]) -> Result<IpAddr, &[u8]> {
    let value = from_utf8(bytes).map_err(|_| bytes)?.trim();

    value
        .parse::<IpAddr>()
        .or_else(|_| value.parse::<SocketAddr>().map(|addr| addr.ip()))
        .map_err(|_| bytes)
}

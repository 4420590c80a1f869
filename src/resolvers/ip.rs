use super::IpResolver;
use anyhow::anyhow;
use axum::extract::ConnectInfo;
use geofence_real_ip::process_xff_headers;
use http::request::Parts;
use ipnetwork::IpNetwork;
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

/// Uses the peer address of the TCP connection.
///
/// This requires the server to be started with
/// [`Router::into_make_service_with_connect_info`](axum::Router::into_make_service_with_connect_info).
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectInfoIpResolver;

impl IpResolver for ConnectInfoIpResolver {
    fn resolve_ip(&self, parts: &Parts) -> anyhow::Result<IpAddr> {
        let ConnectInfo(socket_addr) = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .ok_or_else(|| anyhow!("Missing connection info for request"))?;

        Ok(socket_addr.ip())
    }
}

/// Uses the `X-Forwarded-For` header, skipping addresses of trusted proxies,
/// and falls back to the peer address of the connection.
#[derive(Clone, Debug, Default)]
pub struct ForwardedIpResolver {
    trusted_proxies: Vec<IpNetwork>,
}

impl ForwardedIpResolver {
    pub fn new(trusted_proxies: Vec<IpNetwork>) -> Self {
        Self { trusted_proxies }
    }

    pub fn trusted_proxies(&self) -> &[IpNetwork] {
        &self.trusted_proxies
    }
}

impl IpResolver for ForwardedIpResolver {
    fn resolve_ip(&self, parts: &Parts) -> anyhow::Result<IpAddr> {
        match process_xff_headers(&parts.headers, &self.trusted_proxies) {
            Some(ip) => {
                debug!(target: "geofence", "Using X-Forwarded-For header as client IP: {ip}");
                Ok(ip)
            }
            None => {
                let ip = ConnectInfoIpResolver.resolve_ip(parts)?;
                debug!(target: "geofence", "Using socket address as client IP: {ip}");
                Ok(ip)
            }
        }
    }
}

use geofence_real_ip::{X_FORWARDED_FOR, process_xff_headers};
use http::{HeaderMap, HeaderValue};
use ipnetwork::IpNetwork;
use std::env;

/// Usage: `cargo run --example print -- "<x-forwarded-for>" [trusted-cidr...]`
fn main() {
    let mut args = env::args().skip(1);

    let Some(value) = args.next() else {
        eprintln!("Missing X-Forwarded-For value");
        return;
    };

    let trusted_proxies = args
        .map(|cidr| cidr.parse::<IpNetwork>())
        .collect::<Result<Vec<_>, _>>();

    let trusted_proxies = match trusted_proxies {
        Ok(trusted_proxies) => trusted_proxies,
        Err(error) => {
            eprintln!("Invalid trusted proxy network: {error}");
            return;
        }
    };

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&value) {
        Ok(value) => headers.insert(X_FORWARDED_FOR, value),
        Err(error) => {
            eprintln!("Invalid header value: {error}");
            return;
        }
    };

    match process_xff_headers(&headers, &trusted_proxies) {
        Some(ip) => println!("Client IP: {ip}"),
        None => println!("No client IP found"),
    }
}

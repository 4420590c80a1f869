//! The two lookup steps of the filter.
//!
//! Both traits are implemented for plain closures, so a custom resolver can
//! be as small as:
//!
//! ```
//! use geofence::resolvers::CountryResolver;
//! use std::net::IpAddr;
//!
//! let resolver = |_ip: IpAddr| -> anyhow::Result<Option<String>> { Ok(Some("HR".into())) };
//! assert_eq!(resolver.resolve_country([127, 0, 0, 1].into()).unwrap().as_deref(), Some("HR"));
//! ```

use http::request::Parts;
use std::net::IpAddr;

mod ip;
mod maxmind;

pub use self::ip::{ConnectInfoIpResolver, ForwardedIpResolver};
pub use self::maxmind::{DEFAULT_DATABASE_PATH, MaxMindCountryResolver};

/// Determines the IP address of the client that sent a request.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait IpResolver: Send + Sync {
    fn resolve_ip(&self, parts: &Parts) -> anyhow::Result<IpAddr>;
}

impl<F> IpResolver for F
where
    F: Fn(&Parts) -> anyhow::Result<IpAddr> + Send + Sync,
{
    fn resolve_ip(&self, parts: &Parts) -> anyhow::Result<IpAddr> {
        self(parts)
    }
}

/// Maps an IP address to an ISO 3166-1 alpha-2 country code.
///
/// `Ok(None)` means that no country is known for the address. Such requests
/// are treated as coming from a country outside of every configured set.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CountryResolver: Send + Sync {
    fn resolve_country(&self, ip: IpAddr) -> anyhow::Result<Option<String>>;
}

impl<F> CountryResolver for F
where
    F: Fn(IpAddr) -> anyhow::Result<Option<String>> + Send + Sync,
{
    fn resolve_country(&self, ip: IpAddr) -> anyhow::Result<Option<String>> {
        self(ip)
    }
}

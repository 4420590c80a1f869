use crate::config::FilterConfig;
use crate::errors::{AccessDenied, FilterError};
use http::request::Parts;
use std::sync::Arc;
use tracing::debug;

/// Outcome of evaluating a request against the filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// The request must not reach its handler. Contains the configured
    /// rejection message.
    Reject(String),
}

impl Decision {
    pub fn is_permit(&self) -> bool {
        matches!(self, Decision::Permit)
    }
}

/// Allows or denies requests based on the country of the client.
///
/// Cloning is cheap, the configuration is shared.
#[derive(Clone, Debug)]
pub struct GeoFilter {
    config: Arc<FilterConfig>,
}

impl GeoFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Resolves the client IP and its country, and applies the filter mode.
    ///
    /// Each resolver is called exactly once. Resolver errors are returned
    /// unchanged.
    pub fn evaluate(&self, parts: &Parts) -> anyhow::Result<Decision> {
        let config = &self.config;

        let ip = config.ip_resolver().resolve_ip(parts)?;
        let country = config.country_resolver().resolve_country(ip)?;
        debug!(target: "geofence", "Resolved client IP {ip} to country {country:?}");

        let is_member = country
            .as_deref()
            .is_some_and(|code| config.codes().contains(code));

        if config.mode().permits(is_member) {
            Ok(Decision::Permit)
        } else {
            Ok(Decision::Reject(config.message().to_string()))
        }
    }

    /// Like [GeoFilter::evaluate], but turns a rejection into an
    /// [AccessDenied] error.
    pub fn check(&self, parts: &Parts) -> Result<(), FilterError> {
        match self.evaluate(parts).map_err(FilterError::Resolver)? {
            Decision::Permit => Ok(()),
            Decision::Reject(message) => Err(AccessDenied::new(message).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::FilterMode;
    use crate::resolvers::{CountryResolver, IpResolver, MockCountryResolver, MockIpResolver};
    use crate::{Codes, DEFAULT_MESSAGE};
    use anyhow::anyhow;
    use claims::*;
    use http::Request;
    use mockall::predicate::eq;
    use std::net::IpAddr;

    /// Faculty of Electrical Engineering and Computing, University of Zagreb
    const HR_IP: [u8; 4] = [161, 53, 72, 120];

    fn request_parts() -> Parts {
        Request::get("/").body(()).unwrap().into_parts().0
    }

    /// Returns [HR_IP], exactly once.
    fn ip_resolver() -> Arc<dyn IpResolver> {
        let mut resolver = MockIpResolver::new();
        resolver
            .expect_resolve_ip()
            .times(1)
            .returning(|_| Ok(IpAddr::from(HR_IP)));
        Arc::new(resolver)
    }

    /// Expects [HR_IP] exactly once and returns `code` for it.
    fn country_resolver(code: Option<&'static str>) -> Arc<dyn CountryResolver> {
        let mut resolver = MockCountryResolver::new();
        resolver
            .expect_resolve_country()
            .with(eq(IpAddr::from(HR_IP)))
            .times(1)
            .returning(move |_| Ok(code.map(String::from)));
        Arc::new(resolver)
    }

    fn filter(codes: impl Into<Codes>, mode: FilterMode, country: Option<&'static str>) -> GeoFilter {
        let config = FilterConfig::builder(codes)
            .mode(mode)
            .ip_resolver(ip_resolver())
            .country_resolver(country_resolver(country))
            .build()
            .unwrap();

        GeoFilter::new(config)
    }

    fn evaluate(filter: &GeoFilter) -> Decision {
        assert_ok!(filter.evaluate(&request_parts()))
    }

    #[test]
    fn test_allow_mode() {
        let decision = evaluate(&filter(["HR"], FilterMode::Allow, Some("HR")));
        assert_eq!(decision, Decision::Permit);

        let decision = evaluate(&filter(["HR"], FilterMode::Allow, Some("SI")));
        assert_eq!(decision, Decision::Reject(DEFAULT_MESSAGE.into()));

        let decision = evaluate(&filter(["SI", "HR"], FilterMode::Allow, Some("HR")));
        assert_eq!(decision, Decision::Permit);
    }

    #[test]
    fn test_deny_mode() {
        let decision = evaluate(&filter(["SI", "HR"], FilterMode::Deny, Some("HR")));
        assert_eq!(decision, Decision::Reject(DEFAULT_MESSAGE.into()));

        let decision = evaluate(&filter("HR", FilterMode::Deny, Some("SI")));
        assert_eq!(decision, Decision::Permit);

        let decision = evaluate(&filter("SI", FilterMode::Deny, Some("SI")));
        assert!(!decision.is_permit());
    }

    #[test]
    fn test_resolved_code_is_normalized() {
        let decision = evaluate(&filter("HR", FilterMode::Allow, Some("hr")));
        assert_eq!(decision, Decision::Permit);

        let decision = evaluate(&filter("hr", FilterMode::Deny, Some("Hr")));
        assert!(!decision.is_permit());
    }

    #[test]
    fn test_unknown_country() {
        let decision = evaluate(&filter("HR", FilterMode::Allow, None));
        assert!(!decision.is_permit());

        let decision = evaluate(&filter("HR", FilterMode::Deny, None));
        assert!(decision.is_permit());
    }

    #[test]
    fn test_decision_matches_set_membership() {
        let all_codes = ["HR", "SI", "AT", "HU", "BA"];

        for mode in [FilterMode::Allow, FilterMode::Deny] {
            for len in 1..=all_codes.len() {
                let codes = &all_codes[..len];
                for resolved in all_codes {
                    let is_member = codes.contains(&resolved);
                    let expected = match mode {
                        FilterMode::Allow => is_member,
                        FilterMode::Deny => !is_member,
                    };

                    let decision = evaluate(&filter(codes, mode, Some(resolved)));
                    assert_eq!(
                        decision.is_permit(),
                        expected,
                        "mode={mode}, codes={codes:?}, resolved={resolved}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_custom_message() {
        let config = FilterConfig::builder("HR")
            .message("Only available in Croatia")
            .ip_resolver(ip_resolver())
            .country_resolver(country_resolver(Some("SI")))
            .build()
            .unwrap();

        let error = assert_err!(GeoFilter::new(config).check(&request_parts()));
        assert!(
            matches!(&error, FilterError::Denied(denied) if denied.message() == "Only available in Croatia")
        );
    }

    #[test]
    fn test_check() {
        let permitting = filter("HR", FilterMode::Allow, Some("HR"));
        assert_ok!(permitting.check(&request_parts()));

        let rejecting = filter("HR", FilterMode::Deny, Some("HR"));
        let error = assert_err!(rejecting.check(&request_parts()));
        assert_eq!(error.to_string(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_closures() {
        let config = FilterConfig::builder(["SI", "HR"])
            .ip_resolver(Arc::new(|_: &Parts| -> anyhow::Result<IpAddr> {
                Ok(IpAddr::from(HR_IP))
            }))
            .country_resolver(Arc::new(|ip: IpAddr| -> anyhow::Result<Option<String>> {
                let code = if ip == IpAddr::from(HR_IP) { "HR" } else { "NA" };
                Ok(Some(code.to_string()))
            }))
            .build()
            .unwrap();

        let decision = assert_ok!(GeoFilter::new(config).evaluate(&request_parts()));
        assert_eq!(decision, Decision::Permit);
    }

    #[test]
    fn test_ip_resolver_error_skips_country_lookup() {
        let mut ip_resolver = MockIpResolver::new();
        ip_resolver
            .expect_resolve_ip()
            .times(2)
            .returning(|_| Err(anyhow!("no client address")));

        let mut country_resolver = MockCountryResolver::new();
        country_resolver.expect_resolve_country().never();

        let config = FilterConfig::builder("HR")
            .ip_resolver(Arc::new(ip_resolver))
            .country_resolver(Arc::new(country_resolver))
            .build()
            .unwrap();
        let filter = GeoFilter::new(config);

        let error = assert_err!(filter.evaluate(&request_parts()));
        assert_eq!(error.to_string(), "no client address");

        let error = assert_err!(filter.check(&request_parts()));
        assert!(matches!(error, FilterError::Resolver(_)));
    }

    #[test]
    fn test_country_resolver_error() {
        let mut country_resolver = MockCountryResolver::new();
        country_resolver
            .expect_resolve_country()
            .times(1)
            .returning(|_| Err(anyhow!("lookup failed")));

        let config = FilterConfig::builder("HR")
            .ip_resolver(ip_resolver())
            .country_resolver(Arc::new(country_resolver))
            .build()
            .unwrap();

        let error = assert_err!(GeoFilter::new(config).check(&request_parts()));
        assert_eq!(error.to_string(), "lookup failed");
    }
}

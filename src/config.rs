use crate::codes::{Codes, CountryCodeSet, RawCodes};
use crate::errors::ConfigurationError;
use crate::mode::FilterMode;
use crate::resolvers::{
    ConnectInfoIpResolver, CountryResolver, DEFAULT_DATABASE_PATH, ForwardedIpResolver,
    IpResolver, MaxMindCountryResolver,
};
use bon::bon;
use geofence_env_vars::{flag, list, var, var_parsed};
use ipnetwork::IpNetwork;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_MESSAGE: &str = "This feature is not available in your country";

/// Validated, immutable configuration of a [GeoFilter](crate::GeoFilter).
#[derive(Clone)]
pub struct FilterConfig {
    mode: FilterMode,
    codes: CountryCodeSet,
    message: String,
    ip_resolver: Arc<dyn IpResolver>,
    country_resolver: Arc<dyn CountryResolver>,
}

#[bon]
impl FilterConfig {
    /// Validates the given settings and binds the resolvers.
    ///
    /// Country codes and mode are checked before any resolver is set up. If no
    /// `country_resolver` is given, the MaxMind database at `database_path`
    /// (default: [DEFAULT_DATABASE_PATH]) is opened; it is never touched when
    /// a custom country resolver is used.
    #[builder]
    pub fn new(
        #[builder(start_fn, into)] codes: Codes,
        #[builder(default)] mode: FilterMode,
        #[builder(into)] message: Option<String>,
        ip_resolver: Option<Arc<dyn IpResolver>>,
        country_resolver: Option<Arc<dyn CountryResolver>>,
        #[builder(into)] database_path: Option<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        let codes = CountryCodeSet::new(codes)?;

        let message = message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        let ip_resolver: Arc<dyn IpResolver> = match ip_resolver {
            Some(ip_resolver) => ip_resolver,
            None => Arc::new(ConnectInfoIpResolver),
        };

        let country_resolver: Arc<dyn CountryResolver> = match country_resolver {
            Some(country_resolver) => country_resolver,
            None => {
                let path = database_path.unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());
                Arc::new(MaxMindCountryResolver::open(path)?)
            }
        };

        Ok(Self {
            mode,
            codes,
            message,
            ip_resolver,
            country_resolver,
        })
    }
}

impl FilterConfig {
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn codes(&self) -> &CountryCodeSet {
        &self.codes
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ip_resolver(&self) -> &dyn IpResolver {
        self.ip_resolver.as_ref()
    }

    pub fn country_resolver(&self) -> &dyn CountryResolver {
        self.country_resolver.as_ref()
    }
}

// Can't derive debug because of the resolvers.
impl fmt::Debug for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterConfig")
            .field("mode", &self.mode)
            .field("codes", &self.codes)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Unvalidated configuration, as read from a TOML file or the environment.
///
/// ```toml
/// codes = ["HR", "SI"]
/// mode = "deny"
/// message = "Not available"
/// database_path = "/var/lib/GeoIP/GeoLite2-Country.mmdb"
/// use_forwarded_for = true
/// trusted_proxies = ["10.0.0.0/8"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFilterConfig {
    #[serde(default)]
    pub codes: Option<RawCodes>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Read the client IP from `X-Forwarded-For` instead of the peer address.
    #[serde(default)]
    pub use_forwarded_for: bool,
    /// Networks of reverse proxies whose entries in `X-Forwarded-For` are
    /// skipped. Only used together with `use_forwarded_for`.
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

impl RawFilterConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads the configuration from the following environment variables:
    ///
    /// - `GEOFENCE_CODES`: Comma separated list of country codes.
    /// - `GEOFENCE_MODE`: `allow` (default) or `deny`.
    /// - `GEOFENCE_MESSAGE`: Body of the `403 Forbidden` response.
    /// - `GEOFENCE_DATABASE_PATH`: Location of the MaxMind country database.
    /// - `GEOFENCE_USE_FORWARDED_FOR`: Set to `true` to read the client IP
    ///   from the `X-Forwarded-For` header.
    /// - `GEOFENCE_TRUSTED_PROXIES`: Comma separated list of CIDR blocks of
    ///   trusted reverse proxies, e.g. `10.0.0.0/8`.
    pub fn from_environment() -> Result<Self, ConfigurationError> {
        let codes = list("GEOFENCE_CODES")?;
        let mode = var("GEOFENCE_MODE")?;
        let message = var("GEOFENCE_MESSAGE")?;
        let database_path = var_parsed("GEOFENCE_DATABASE_PATH")?;
        let use_forwarded_for = flag("GEOFENCE_USE_FORWARDED_FOR")?;
        let trusted_proxies = list("GEOFENCE_TRUSTED_PROXIES")?;

        Ok(Self {
            codes: Some(RawCodes::Many(codes)),
            mode,
            message,
            database_path,
            use_forwarded_for,
            trusted_proxies,
        })
    }

    /// Validates the configuration and binds the default resolvers.
    pub fn into_config(self) -> Result<FilterConfig, ConfigurationError> {
        self.build(None)
    }

    /// Validates the configuration, using `country_resolver` instead of the
    /// MaxMind database.
    pub fn into_config_with(
        self,
        country_resolver: Arc<dyn CountryResolver>,
    ) -> Result<FilterConfig, ConfigurationError> {
        self.build(Some(country_resolver))
    }

    fn build(
        self,
        country_resolver: Option<Arc<dyn CountryResolver>>,
    ) -> Result<FilterConfig, ConfigurationError> {
        let codes = match self.codes {
            Some(codes) => Codes::try_from(codes)?,
            None => Codes::Many(vec![]),
        };

        // Checked before the mode, so an empty configuration reports the
        // missing codes first.
        CountryCodeSet::new(codes.clone())?;

        let mode = match self.mode {
            Some(mode) => mode.parse()?,
            None => FilterMode::default(),
        };

        let ip_resolver: Option<Arc<dyn IpResolver>> = if self.use_forwarded_for {
            let trusted_proxies = parse_trusted_proxies(&self.trusted_proxies)?;
            Some(Arc::new(ForwardedIpResolver::new(trusted_proxies)))
        } else {
            None
        };

        FilterConfig::builder(codes)
            .mode(mode)
            .maybe_message(self.message)
            .maybe_ip_resolver(ip_resolver)
            .maybe_country_resolver(country_resolver)
            .maybe_database_path(self.database_path)
            .build()
    }
}

fn parse_trusted_proxies(values: &[String]) -> Result<Vec<IpNetwork>, ConfigurationError> {
    values
        .iter()
        .map(|value| {
            value
                .parse::<IpNetwork>()
                .map_err(|source| ConfigurationError::InvalidProxy {
                    value: value.clone(),
                    source,
                })
        })
        .collect()
}

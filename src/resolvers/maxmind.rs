use super::CountryResolver;
use crate::errors::ConfigurationError;
use maxminddb::{Reader, geoip2};
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use tracing::info;

/// Location of the country database if none is configured, relative to the
/// working directory.
pub const DEFAULT_DATABASE_PATH: &str = "GeoLite2-Country.mmdb";

/// Looks up countries in a MaxMind GeoIP2 or GeoLite2 database.
///
/// Both the `Country` and the `City` database editions work, since they share
/// the `country` record.
pub struct MaxMindCountryResolver {
    reader: Reader<Vec<u8>>,
}

impl MaxMindCountryResolver {
    /// Reads the whole database at `path` into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();

        let reader = Reader::open_readfile(path).map_err(|error| ConfigurationError::Database {
            path: path.to_path_buf(),
            source: Box::new(error),
        })?;

        info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "Loaded GeoIP database"
        );

        Ok(Self { reader })
    }
}

impl fmt::Debug for MaxMindCountryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxMindCountryResolver")
            .field("database_type", &self.reader.metadata.database_type)
            .field("build_epoch", &self.reader.metadata.build_epoch)
            .finish_non_exhaustive()
    }
}

impl CountryResolver for MaxMindCountryResolver {
    fn resolve_country(&self, ip: IpAddr) -> anyhow::Result<Option<String>> {
        let record: Option<geoip2::Country<'_>> = self.reader.lookup(ip)?;

        let iso_code = record
            .and_then(|record| record.country)
            .and_then(|country| country.iso_code)
            .map(String::from);

        Ok(iso_code)
    }
}

#![doc = include_str!("../README.md")]

pub use self::codes::{Codes, CountryCodeSet, RawCodes};
pub use self::config::{DEFAULT_MESSAGE, FilterConfig, RawFilterConfig};
pub use self::errors::{AccessDenied, ConfigurationError, FilterError};
pub use self::filter::{Decision, GeoFilter};
pub use self::mode::FilterMode;

mod codes;
mod config;
pub mod errors;
mod filter;
pub mod middleware;
mod mode;
pub mod resolvers;
pub mod util;

use crate::errors::ConfigurationError;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::BTreeSet;
use std::fmt;

/// Country codes as supplied by the caller: either a single code or a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Codes {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Codes {
    fn from(code: &str) -> Self {
        Codes::One(code.to_string())
    }
}

impl From<String> for Codes {
    fn from(code: String) -> Self {
        Codes::One(code)
    }
}

impl From<Vec<String>> for Codes {
    fn from(codes: Vec<String>) -> Self {
        Codes::Many(codes)
    }
}

impl From<Vec<&str>> for Codes {
    fn from(codes: Vec<&str>) -> Self {
        Codes::Many(codes.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Codes {
    fn from(codes: &[&str]) -> Self {
        Codes::Many(codes.iter().copied().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Codes {
    fn from(codes: [&str; N]) -> Self {
        Codes::Many(codes.into_iter().map(String::from).collect())
    }
}

/// The `codes` value of a serialized configuration.
///
/// Anything that is neither a string nor a list of strings ends up as
/// `Invalid`, so the mistake can be reported as a configuration error instead
/// of a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawCodes {
    One(String),
    Many(Vec<String>),
    Invalid(IgnoredAny),
}

impl TryFrom<RawCodes> for Codes {
    type Error = ConfigurationError;

    fn try_from(raw: RawCodes) -> Result<Self, Self::Error> {
        match raw {
            RawCodes::One(code) => Ok(Codes::One(code)),
            RawCodes::Many(codes) => Ok(Codes::Many(codes)),
            RawCodes::Invalid(_) => Err(ConfigurationError::InvalidCodes),
        }
    }
}

/// A non-empty set of uppercase ISO 3166-1 alpha-2 country codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryCodeSet(BTreeSet<String>);

impl CountryCodeSet {
    pub fn new(codes: impl Into<Codes>) -> Result<Self, ConfigurationError> {
        let codes = match codes.into() {
            Codes::One(code) => vec![code],
            Codes::Many(codes) => codes,
        };

        if codes.is_empty() {
            return Err(ConfigurationError::EmptyCodes);
        }

        codes
            .into_iter()
            .map(|code| normalize(&code).ok_or(ConfigurationError::InvalidCountryCode(code)))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Checks if the set contains `code`, ignoring ASCII case.
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(&code.to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`, the set can't be constructed without codes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CountryCodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(code)?;
        }
        Ok(())
    }
}

fn normalize(code: &str) -> Option<String> {
    let is_valid = code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic());
    is_valid.then(|| code.to_ascii_uppercase())
}

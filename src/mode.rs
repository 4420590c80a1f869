use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the configured country codes are an allow-list or a deny-list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Only requests from the configured countries are permitted.
    #[default]
    Allow,
    /// Requests from all countries except the configured ones are permitted.
    Deny,
}

impl FilterMode {
    /// Applies the mode to the result of the country code lookup.
    pub fn permits(self, is_member: bool) -> bool {
        match self {
            FilterMode::Allow => is_member,
            FilterMode::Deny => !is_member,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Allow => "allow",
            FilterMode::Deny => "deny",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(ConfigurationError::InvalidMode(s.to_string())),
        }
    }
}

//! Canonical addressing: `api_name.member_name`.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::BusError;

/// A dotted API name, e.g. `auth` or `billing.invoices`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiName(String);

impl ApiName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ApiName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A method or event name, unique within its API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberName(String);

impl MemberName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MemberName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// `api_name.member_name`, the address a caller writes (`bus.auth.login`).
///
/// Splits on the *last* dot: `api_name` may itself contain dots
/// (`billing.invoices.create` is API `billing.invoices`, member `create`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalAddress {
    api_name: ApiName,
    member_name: MemberName,
}

impl CanonicalAddress {
    pub fn new(api_name: impl Into<ApiName>, member_name: impl Into<MemberName>) -> Self {
        Self {
            api_name: api_name.into(),
            member_name: member_name.into(),
        }
    }

    pub fn api_name(&self) -> &ApiName {
        &self.api_name
    }

    pub fn member_name(&self) -> &MemberName {
        &self.member_name
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.api_name, self.member_name)
    }
}

impl FromStr for CanonicalAddress {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (api, member) = s
            .rsplit_once('.')
            .ok_or_else(|| BusError::configuration(format!("not a canonical address: {s:?}")))?;
        if api.is_empty() || member.is_empty() {
            return Err(BusError::configuration(format!(
                "not a canonical address: {s:?}"
            )));
        }
        Ok(Self::new(api, member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_dot() {
        let addr: CanonicalAddress = "billing.invoices.create".parse().unwrap();
        assert_eq!(addr.api_name().as_str(), "billing.invoices");
        assert_eq!(addr.member_name().as_str(), "create");
    }

    #[test]
    fn rejects_unqualified_names() {
        assert!("login".parse::<CanonicalAddress>().is_err());
        assert!(".login".parse::<CanonicalAddress>().is_err());
        assert!("auth.".parse::<CanonicalAddress>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let addr = CanonicalAddress::new("auth", "login");
        assert_eq!(addr.to_string(), "auth.login");
    }
}

//! Typed views over the dynamically-shaped token claims
//!
//! Claims arrive as arbitrary JSON. Every read goes through [`ClaimShape`],
//! which says whether the value had the expected shape instead of failing.

use serde::Deserialize;
use serde_json::{Map, Value};

pub const RESOURCE_ACCESS_CLAIM: &str = "resource_access";
pub const ROLES_CLAIM: &str = "roles";
/// Scope claim names, in lookup order
pub const SCOPE_CLAIMS: [&str; 2] = ["scope", "scp"];

/// Outcome of interpreting a claim value as an expected shape
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimShape<T> {
    WellFormed(T),
    /// Claim not present (or explicitly `null`)
    Absent,
    /// Claim present with a different shape
    Malformed,
}

impl<T> ClaimShape<T> {
    pub fn well_formed(self) -> Option<T> {
        match self {
            Self::WellFormed(value) => Some(value),
            Self::Absent | Self::Malformed => None,
        }
    }

    fn from_value<'a>(value: Option<&'a Value>, parse: impl FnOnce(&'a Value) -> Option<T>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(value) => parse(value).map_or(Self::Malformed, Self::WellFormed),
        }
    }
}

/// Roles granted by one client in `resource_access`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientAccess {
    pub roles: Vec<String>,
}

/// Scope claim in either of its two encodings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScopeClaim {
    /// Space-delimited string (`"openid email profile"`)
    Delimited(String),
    /// Array of scope names
    List(Vec<String>),
}

impl ScopeClaim {
    pub fn scopes(&self) -> Vec<&str> {
        match self {
            Self::Delimited(scopes) => scopes.split_whitespace().collect(),
            Self::List(scopes) => scopes.iter().map(String::as_str).collect(),
        }
    }
}

/// `resource_access` as a client-name to access mapping
pub fn resource_access(claims: &Value) -> ClaimShape<&Map<String, Value>> {
    ClaimShape::from_value(claims.get(RESOURCE_ACCESS_CLAIM), Value::as_object)
}

/// One `resource_access` entry; well-formed only when `roles` is a list of strings
pub fn client_access(entry: &Value) -> ClaimShape<ClientAccess> {
    let Some(access) = entry.as_object() else {
        return ClaimShape::Malformed;
    };
    ClaimShape::from_value(access.get(ROLES_CLAIM), |roles| {
        Vec::<String>::deserialize(roles)
            .ok()
            .map(|roles| ClientAccess { roles })
    })
}

/// First present scope claim (`scope`, then `scp`)
pub fn scope_claim(claims: &Value) -> ClaimShape<ScopeClaim> {
    let present = SCOPE_CLAIMS
        .iter()
        .filter_map(|name| claims.get(name))
        .find(|value| !value.is_null());
    ClaimShape::from_value(present, |value| ScopeClaim::deserialize(value).ok())
}

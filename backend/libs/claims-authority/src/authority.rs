//! Granted authorities consumed by access-control checks

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// Deduplicated grants for one request; iteration order is unspecified
pub type AuthoritySet = HashSet<GrantedAuthority>;

/// A normalized permission token such as `ROLE_book_editor` or `SCOPE_email`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    pub const ROLE_PREFIX: &'static str = "ROLE_";
    pub const SCOPE_PREFIX: &'static str = "SCOPE_";

    /// Wrap an authority that is already normalized
    pub fn new(authority: impl Into<String>) -> Self {
        Self(authority.into())
    }

    /// `ROLE_` + role name, with every `-` replaced by `_`
    pub fn role(name: &str) -> Self {
        Self(format!("{}{}", Self::ROLE_PREFIX, name.replace('-', "_")))
    }

    /// `SCOPE_` + scope name, verbatim
    pub fn scope(name: &str) -> Self {
        Self(format!("{}{}", Self::SCOPE_PREFIX, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GrantedAuthority {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GrantedAuthority {
    fn from(authority: &str) -> Self {
        Self::new(authority)
    }
}

impl From<String> for GrantedAuthority {
    fn from(authority: String) -> Self {
        Self(authority)
    }
}

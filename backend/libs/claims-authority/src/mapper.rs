//! Claims to authority mapping
//!
//! Runs once per authenticated request on claims the token-validation layer
//! has already verified. Never fails: a claim with the wrong shape only
//! drops the grants it would have contributed.

use serde_json::Value;
use tracing::debug;

use crate::authority::{AuthoritySet, GrantedAuthority};
use crate::claims::{client_access, resource_access, scope_claim, ClaimShape};

/// Client roles from `resource_access` unioned with `base`
///
/// `base` holds grants derived independently (normally
/// [`scope_authorities`]).
pub fn map_authorities<I>(claims: &Value, base: I) -> AuthoritySet
where
    I: IntoIterator<Item = GrantedAuthority>,
{
    let mut authorities: AuthoritySet = base.into_iter().collect();
    authorities.extend(resource_roles(claims));
    authorities
}

/// `ROLE_*` grants for every client entry in `resource_access`
pub fn resource_roles(claims: &Value) -> AuthoritySet {
    let clients = match resource_access(claims) {
        ClaimShape::WellFormed(clients) => clients,
        ClaimShape::Absent => return AuthoritySet::new(),
        ClaimShape::Malformed => {
            debug!("resource_access claim is not an object, ignoring");
            return AuthoritySet::new();
        }
    };

    let mut roles = AuthoritySet::new();
    for (client, entry) in clients {
        match client_access(entry) {
            ClaimShape::WellFormed(access) => {
                roles.extend(access.roles.iter().map(|role| GrantedAuthority::role(role)));
            }
            ClaimShape::Absent => {
                debug!(client = %client, "resource_access entry has no roles, skipping");
            }
            ClaimShape::Malformed => {
                debug!(
                    client = %client,
                    "resource_access entry is not an object with a string list of roles, skipping"
                );
            }
        }
    }
    roles
}

/// `SCOPE_*` grants from the `scope` (or `scp`) claim
pub fn scope_authorities(claims: &Value) -> AuthoritySet {
    match scope_claim(claims) {
        ClaimShape::WellFormed(scopes) => scopes
            .scopes()
            .into_iter()
            .map(GrantedAuthority::scope)
            .collect(),
        ClaimShape::Absent => AuthoritySet::new(),
        ClaimShape::Malformed => {
            debug!("scope claim is neither a string nor a string list, ignoring");
            AuthoritySet::new()
        }
    }
}

/// Full authority set for a principal: scope grants plus client roles
pub fn authorities_from_claims(claims: &Value) -> AuthoritySet {
    map_authorities(claims, scope_authorities(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> AuthoritySet {
        items.iter().map(|s| GrantedAuthority::from(*s)).collect()
    }

    #[test]
    fn test_maps_client_roles() {
        let claims = json!({
            "resource_access": {"app": {"roles": ["book-editor", "ADMIN"]}}
        });

        let authorities = map_authorities(&claims, AuthoritySet::new());
        assert_eq!(authorities, set(&["ROLE_book_editor", "ROLE_ADMIN"]));
    }

    #[test]
    fn test_unions_with_base_authorities() {
        let claims = json!({
            "resource_access": {"app": {"roles": ["user"]}}
        });

        let authorities = map_authorities(&claims, set(&["SCOPE_email", "ROLE_user"]));
        assert_eq!(authorities, set(&["SCOPE_email", "ROLE_user"]));
    }

    #[test]
    fn test_roles_merged_across_clients_without_duplicates() {
        let claims = json!({
            "resource_access": {
                "book-network": {"roles": ["reader", "book-editor"]},
                "account": {"roles": ["manage-account", "reader"]}
            }
        });

        let authorities = resource_roles(&claims);
        assert_eq!(
            authorities,
            set(&["ROLE_reader", "ROLE_book_editor", "ROLE_manage_account"])
        );
    }

    #[test]
    fn test_absent_resource_access_yields_base() {
        let base = set(&["SCOPE_openid"]);
        let authorities = map_authorities(&json!({"sub": "u-1"}), base.clone());
        assert_eq!(authorities, base);
    }

    #[test]
    fn test_non_list_roles_yields_base() {
        let base = set(&["SCOPE_openid"]);
        let claims = json!({"resource_access": {"app": {"roles": "ADMIN"}}});
        assert_eq!(map_authorities(&claims, base.clone()), base);
    }

    #[test]
    fn test_malformed_entry_does_not_abort_siblings() {
        let claims = json!({
            "resource_access": {
                "broken": "not-an-object",
                "mixed": {"roles": ["ok", 1]},
                "empty": {},
                "good": {"roles": ["book-reviewer"]}
            }
        });

        assert_eq!(resource_roles(&claims), set(&["ROLE_book_reviewer"]));
    }

    #[test]
    fn test_resource_access_not_an_object() {
        let claims = json!({"resource_access": ["app"]});
        assert!(resource_roles(&claims).is_empty());
    }

    #[test]
    fn test_scope_authorities() {
        let claims = json!({"scope": "openid email profile"});
        assert_eq!(
            scope_authorities(&claims),
            set(&["SCOPE_openid", "SCOPE_email", "SCOPE_profile"])
        );
        assert!(scope_authorities(&json!({"scope": {"nested": true}})).is_empty());
    }

    #[test]
    fn test_authorities_from_claims() {
        let claims = json!({
            "scope": "openid email",
            "resource_access": {"bsn": {"roles": ["book-editor"]}}
        });

        assert_eq!(
            authorities_from_claims(&claims),
            set(&["SCOPE_openid", "SCOPE_email", "ROLE_book_editor"])
        );
    }

    #[test]
    fn test_idempotent() {
        let claims = json!({
            "scope": "openid",
            "resource_access": {"app": {"roles": ["a-b", "c"]}}
        });

        let first = authorities_from_claims(&claims);
        let second = authorities_from_claims(&claims);
        assert_eq!(first, second);
    }
}

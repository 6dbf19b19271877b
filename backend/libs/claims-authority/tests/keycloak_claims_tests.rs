//! Mapping realistic Keycloak access-token claims

use std::sync::Arc;

use claims_authority::{
    authorities_from_claims, map_authorities, scope_authorities, AuthoritySet, GrantedAuthority,
};
use serde_json::{json, Value};

fn keycloak_access_token() -> Value {
    json!({
        "exp": 1729350000,
        "iat": 1729349700,
        "jti": "6b1f3c2e-9d4a-4f0e-8a77-0c5d2b1e9f10",
        "iss": "http://localhost:9090/realms/book-social-network",
        "aud": ["bsn", "account"],
        "sub": "0f8c2a4e-5b1d-4c3e-9a2f-7e6d5c4b3a21",
        "typ": "Bearer",
        "azp": "bsn",
        "realm_access": {"roles": ["offline_access", "uma_authorization"]},
        "resource_access": {
            "bsn": {"roles": ["book-editor", "reviewer"]},
            "account": {"roles": ["manage-account", "manage-account-links", "view-profile"]}
        },
        "scope": "openid email profile",
        "email_verified": true,
        "preferred_username": "reader@example.com"
    })
}

fn names(set: &AuthoritySet) -> Vec<&str> {
    let mut names: Vec<&str> = set.iter().map(GrantedAuthority::as_str).collect();
    names.sort_unstable();
    names
}

#[test]
fn test_full_keycloak_token() {
    let authorities = authorities_from_claims(&keycloak_access_token());

    assert_eq!(
        names(&authorities),
        vec![
            "ROLE_book_editor",
            "ROLE_manage_account",
            "ROLE_manage_account_links",
            "ROLE_reviewer",
            "ROLE_view_profile",
            "SCOPE_email",
            "SCOPE_openid",
            "SCOPE_profile",
        ]
    );
    // Realm roles are not part of the mapping
    assert!(!authorities.contains("ROLE_offline_access"));
}

#[test]
fn test_claims_are_not_mutated() {
    let claims = keycloak_access_token();
    let before = claims.clone();

    let _ = authorities_from_claims(&claims);
    assert_eq!(claims, before);
}

#[test]
fn test_token_without_client_roles() {
    let mut claims = keycloak_access_token();
    claims
        .as_object_mut()
        .unwrap()
        .remove("resource_access");

    let base = scope_authorities(&claims);
    assert_eq!(map_authorities(&claims, base.clone()), base);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_nothing() {
    let claims = Arc::new(keycloak_access_token());
    let expected = authorities_from_claims(&claims);

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let claims = Arc::clone(&claims);
            tokio::spawn(async move { authorities_from_claims(&claims) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

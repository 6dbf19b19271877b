//! Authorization grants from identity-token claims
//!
//! Flattens Keycloak-style client roles
//! (`resource_access.<client>.roles`) into `ROLE_*` authorities and merges
//! them with the `SCOPE_*` authorities derived from the standard scope claim.
//!
//! ```ignore
//! let claims: serde_json::Value = token_data.claims;
//! let authorities = claims_authority::authorities_from_claims(&claims);
//! if authorities.contains("ROLE_book_editor") { /* ... */ }
//! ```
//!
//! Everything here is a pure function of its input, so it is safe to call
//! from any number of request handlers at once.

pub mod authority;
pub mod claims;
mod mapper;

pub use authority::{AuthoritySet, GrantedAuthority};
pub use claims::{ClaimShape, ClientAccess, ScopeClaim};
pub use mapper::{authorities_from_claims, map_authorities, resource_roles, scope_authorities};

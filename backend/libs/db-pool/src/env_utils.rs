//! Environment variable lookup utilities
//!
//! Resolution code never reads `std::env` directly; it takes a lookup
//! function so the same logic runs against the process environment at
//! startup and against a plain map in tests.

/// Read a variable from the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Look up a variable, treating empty and whitespace-only values as unset
///
/// # Example
/// ```ignore
/// let url = lookup_non_empty(&process_env, "DATABASE_URL");
/// ```
pub fn lookup_non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Return the first non-empty variable among `keys`, with the name it came from
pub fn first_non_empty<'k, F>(lookup: &F, keys: &[&'k str]) -> Option<(&'k str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup_non_empty(lookup, key).map(|value| (*key, value)))
}

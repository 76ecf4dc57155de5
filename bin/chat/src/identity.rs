//! Resolves the user's display name at session start.

/// Name used when nothing else is available.
pub const FALLBACK_USER_NAME: &str = "User";

/// Returns the configured name, else the login name from the environment.
#[must_use]
pub fn resolve_user_name(configured: Option<&str>) -> String {
    resolve_with(configured, |key| std::env::var(key).ok())
}

fn resolve_with(configured: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(["USER", "USERNAME"].into_iter().filter_map(|key| lookup(key)))
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_string())
}

//! Credential scrubbing for child-process environments.
//!
//! Installers, package managers and git need the general environment
//! (PATH, HOME, proxy settings), so the default policy is a denylist of
//! credential-shaped names. Call sites that want a tighter boundary can
//! use an allowlist instead.

use std::collections::BTreeMap;

pub type EnvMap = BTreeMap<String, String>;

/// Known credential variables removed by exact name.
pub const SENSITIVE_ENV_KEYS: &[&str] = &[
    "AWS_SECRET_ACCESS_KEY",
    "AWS_ACCESS_KEY_ID",
    "AWS_SESSION_TOKEN",
    "AZURE_CLIENT_SECRET",
    "GOOGLE_APPLICATION_CREDENTIALS",
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "GITLAB_TOKEN",
    "NPM_TOKEN",
    "DATABASE_URL",
    "DB_PASSWORD",
    "API_KEY",
    "SECRET_KEY",
    "PRIVATE_KEY",
    "JWT_SECRET",
    "SESSION_SECRET",
    "ENCRYPTION_KEY",
    "SUPABASE_SERVICE_KEY",
    "STRIPE_SECRET_KEY",
];

/// Substrings of the uppercased name that mark a variable as a credential.
pub const SENSITIVE_ENV_SUBSTRINGS: &[&str] = &["SECRET", "PASSWORD", "_TOKEN", "PRIVATE_KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnvPolicy {
    /// Keep everything except credential-shaped variables.
    #[default]
    Denylist,
    /// Keep only the named variables (credential-shaped ones are still dropped).
    Allowlist(Vec<String>),
}

pub fn is_sensitive_key(key: &str) -> bool {
    if SENSITIVE_ENV_KEYS.contains(&key) {
        return true;
    }
    let upper = key.to_uppercase();
    SENSITIVE_ENV_SUBSTRINGS
        .iter()
        .any(|needle| upper.contains(needle))
}

/// Copy `env`, dropping every credential-shaped variable.
pub fn sanitize_env(env: &EnvMap) -> EnvMap {
    sanitize_env_with(env, &EnvPolicy::Denylist)
}

pub fn sanitize_env_with(env: &EnvMap, policy: &EnvPolicy) -> EnvMap {
    env.iter()
        .filter(|(key, _)| !is_sensitive_key(key))
        .filter(|(key, _)| match policy {
            EnvPolicy::Denylist => true,
            EnvPolicy::Allowlist(allowed) => allowed.iter().any(|a| a == *key),
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Snapshot of the current process environment, read fresh on every call.
/// Non UTF-8 variables are skipped.
pub fn current_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

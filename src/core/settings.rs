//! Process-wide settings read from the environment once at startup.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeSettings {
    /// `DEBUG` set: verbose errors and diagnostic logging.
    pub debug: bool,
    /// `CI` or `NO_BANNER` set: no decorative banner.
    pub suppress_banner: bool,
}

fn is_set(value: Option<String>) -> bool {
    match value {
        Some(v) => !matches!(v.trim(), "" | "0" | "false"),
        None => false,
    }
}

impl RuntimeSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            debug: is_set(lookup("DEBUG")),
            suppress_banner: is_set(lookup("CI")) || is_set(lookup("NO_BANNER")),
        }
    }
}

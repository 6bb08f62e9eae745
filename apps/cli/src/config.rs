// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,sitecheck_rules=debug";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Pretty-print JSON reports.
    pub pretty: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("RUST_LOG").ok(),
            std::env::var("SITECHECK_PRETTY").ok(),
        )
    }

    fn from_vars(log_filter: Option<String>, pretty: Option<String>) -> Self {
        Self {
            log_filter: log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
            pretty: pretty
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! Configuration for the rules service.

use serde::{Deserialize, Serialize};

/// Configuration for the rules service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Allow any origin. The contribution UI is served from another host,
    /// so this defaults to on; disable behind a same-origin deployment.
    #[serde(default = "default_true")]
    pub permissive_cors: bool,

    /// Rules installed pre-approved at startup, credited to `system`.
    #[serde(default)]
    pub seed_rules: Vec<SeedRule>,
}

/// A rule shipped with the deployment rather than contributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRule {
    pub domain: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub starts_with: Vec<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            permissive_cors: default_true(),
            seed_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.permissive_cors);
        assert!(config.seed_rules.is_empty());
    }

    #[test]
    fn test_seed_rules_parse() {
        let config: Config = serde_json::from_str(
            r#"{"seed_rules": [{"domain": "instagram.com", "keys": ["igsh"], "starts_with": ["utm_"]}]}"#,
        )
        .unwrap();
        assert_eq!(config.seed_rules.len(), 1);
        assert_eq!(config.seed_rules[0].domain, "instagram.com");
        assert_eq!(config.seed_rules[0].keys, vec!["igsh"]);
    }
}

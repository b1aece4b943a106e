// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! Domain rule model and submission validation.
//!
//! A `DomainRule` describes which query parameters should be stripped from
//! links on a given host: exact parameter names (`keys`) and parameter-name
//! prefixes (`starts_with`). Rules enter the system as contributor
//! submissions and stay `pending` until an administrator moderates them.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    // Hostname shape only ("twitter.com", "sub.example.co.uk"), not a full
    // RFC 1035 check. Compiled once, reused everywhere.
    static ref DOMAIN_RE: Regex = Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid domain format: {0:?}")]
    InvalidDomain(String),

    #[error("Rule removes nothing: keys and starts_with are both empty")]
    NothingToRemove,

    #[error("Unknown rule status: {0:?}")]
    UnknownStatus(String),
}

/// Moderation status of a rule.
///
/// `Pending` is the only state a rule can leave; `Approved` and `Rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pending,
    Approved,
    Rejected,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Terminal statuses never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A domain cleaning rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub id: i64,
    /// Lowercase hostname the rule applies to.
    pub domain: String,
    /// Exact parameter names to remove.
    pub keys: Vec<String>,
    /// Parameter-name prefixes to remove.
    pub starts_with: Vec<String>,
    /// Identities credited with this rule. Empty renders as anonymous.
    #[serde(default)]
    pub contributors: Vec<String>,
    pub status: RuleStatus,
    pub created_at: DateTime<Utc>,
}

/// Contributor-facing input for a new rule.
///
/// All fields default so that a missing field surfaces as a field-level
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub starts_with: Vec<String>,
    #[serde(default)]
    pub contributor: String,
}

/// A submission that passed validation, ready to become a pending rule.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub domain: String,
    pub keys: Vec<String>,
    pub starts_with: Vec<String>,
    pub contributor: String,
}

impl Submission {
    /// Validate and normalize a submission.
    ///
    /// The domain is lowercased, key/prefix entries are comma-split and
    /// trimmed with empties dropped, and at least one key or prefix must
    /// survive normalization.
    pub fn validate(self) -> Result<ValidatedSubmission, ValidationError> {
        let domain = self.domain.trim().to_lowercase();
        if domain.is_empty() {
            return Err(ValidationError::MissingField("domain"));
        }
        if !DOMAIN_RE.is_match(&domain) {
            return Err(ValidationError::InvalidDomain(domain));
        }

        let contributor = self.contributor.trim().to_string();
        if contributor.is_empty() {
            return Err(ValidationError::MissingField("contributor"));
        }

        let keys = normalize_entries(&self.keys);
        let starts_with = normalize_entries(&self.starts_with);
        if keys.is_empty() && starts_with.is_empty() {
            return Err(ValidationError::NothingToRemove);
        }

        Ok(ValidatedSubmission {
            domain,
            keys,
            starts_with,
            contributor,
        })
    }
}

/// Split comma-separated entries, trim whitespace, drop empties, and
/// collapse duplicates preserving first-seen order.
pub fn normalize_entries(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in raw {
        for part in entry.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if !out.iter().any(|seen| seen == part) {
                out.push(part.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(domain: &str, keys: &[&str], starts_with: &[&str], contributor: &str) -> Submission {
        Submission {
            domain: domain.to_string(),
            keys: keys.iter().map(|s| s.to_string()).collect(),
            starts_with: starts_with.iter().map(|s| s.to_string()).collect(),
            contributor: contributor.to_string(),
        }
    }

    #[test]
    fn test_valid_submission_normalizes() {
        let validated = submission("Twitter.com", &["utm_source, fbclid"], &[], "a@b.com")
            .validate()
            .unwrap();

        assert_eq!(validated.domain, "twitter.com");
        assert_eq!(validated.keys, vec!["utm_source", "fbclid"]);
        assert!(validated.starts_with.is_empty());
        assert_eq!(validated.contributor, "a@b.com");
    }

    #[test]
    fn test_empty_domain_rejected() {
        let err = submission("", &["utm_source"], &[], "a@b.com")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("domain"));
    }

    #[test]
    fn test_bad_domain_format_rejected() {
        let err = submission("not a domain", &["utm_source"], &[], "a@b.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDomain(_)));

        // Missing TLD
        let err = submission("localhost", &["utm_source"], &[], "a@b.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDomain(_)));
    }

    #[test]
    fn test_missing_contributor_rejected() {
        let err = submission("x.com", &["utm_source"], &[], "   ")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("contributor"));
    }

    #[test]
    fn test_nothing_to_remove_rejected() {
        let err = submission("x.com", &[" , ", ""], &["  "], "a@b.com")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::NothingToRemove);
    }

    #[test]
    fn test_normalize_entries_dedupes_in_order() {
        let raw = vec![
            "utm_source, fbclid".to_string(),
            " utm_source ".to_string(),
            "igsh".to_string(),
        ];
        assert_eq!(normalize_entries(&raw), vec!["utm_source", "fbclid", "igsh"]);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [RuleStatus::Pending, RuleStatus::Approved, RuleStatus::Rejected] {
            assert_eq!(status.as_str().parse::<RuleStatus>().unwrap(), status);
        }
        assert!("active".parse::<RuleStatus>().is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!RuleStatus::Pending.is_terminal());
        assert!(RuleStatus::Approved.is_terminal());
        assert!(RuleStatus::Rejected.is_terminal());
    }
}

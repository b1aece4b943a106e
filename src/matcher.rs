// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! Strip decision over the approved rule set.
//!
//! The matcher is a pure predicate: given a hostname and a query-parameter
//! name it answers whether that parameter should be removed. It is built
//! from a snapshot of the approved rules and holds no mutable state, so the
//! same input always yields the same answer.

use crate::rules::{DomainRule, RuleStatus};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Per-domain strip sets compiled from approved rules.
///
/// When several approved rules target the same domain their keys and
/// prefixes union together; a parameter is stripped if any rule flags it.
#[derive(Debug, Default)]
pub struct RuleMatcher {
    domains: HashMap<String, DomainPolicy>,
}

#[derive(Debug, Default)]
struct DomainPolicy {
    keys: HashSet<String>,
    starts_with: HashSet<String>,
}

impl RuleMatcher {
    /// Build a matcher from the approved subset of `rules`.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a DomainRule>,
    {
        let mut domains: HashMap<String, DomainPolicy> = HashMap::new();
        for rule in rules {
            if rule.status != RuleStatus::Approved {
                continue;
            }
            let policy = domains.entry(rule.domain.to_lowercase()).or_default();
            policy.keys.extend(rule.keys.iter().cloned());
            // Empty prefixes would match every parameter; validation forbids
            // them, and the matcher refuses them regardless.
            policy
                .starts_with
                .extend(rule.starts_with.iter().filter(|p| !p.is_empty()).cloned());
        }
        Self { domains }
    }

    /// Whether `param` should be stripped from links on `domain`.
    ///
    /// Domain comparison is case-insensitive and exact: no subdomain
    /// wildcarding. Unknown domains strip nothing.
    pub fn should_strip(&self, domain: &str, param: &str) -> bool {
        match self.domains.get(&domain.to_lowercase()) {
            Some(policy) => {
                policy.keys.contains(param)
                    || policy
                        .starts_with
                        .iter()
                        .any(|prefix| param.starts_with(prefix.as_str()))
            }
            None => false,
        }
    }

    /// Number of domains with at least one approved rule.
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }
}

/// Remove flagged query parameters from `input`, preserving everything else
/// about the URL.
pub fn clean_url(input: &str, matcher: &RuleMatcher) -> Result<String, url::ParseError> {
    let mut url = Url::parse(input)?;
    let host = url.host_str().unwrap_or("").to_string();

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !matcher.should_strip(&host, key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rule(id: i64, domain: &str, keys: &[&str], starts_with: &[&str], status: RuleStatus) -> DomainRule {
        DomainRule {
            id,
            domain: domain.to_string(),
            keys: keys.iter().map(|s| s.to_string()).collect(),
            starts_with: starts_with.iter().map(|s| s.to_string()).collect(),
            contributors: vec!["a@b.com".to_string()],
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_exact_and_prefix_matching() {
        let rules = [rule(1, "x.com", &["utm_source"], &["fbclid"], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        assert!(matcher.should_strip("x.com", "utm_source"));
        assert!(!matcher.should_strip("x.com", "utm_campaign"));
        assert!(matcher.should_strip("x.com", "fbclid_click"));
        assert!(!matcher.should_strip("y.com", "utm_source"));
    }

    #[test]
    fn test_only_approved_rules_participate() {
        let rules = [
            rule(1, "x.com", &["a"], &[], RuleStatus::Pending),
            rule(2, "x.com", &["b"], &[], RuleStatus::Rejected),
        ];
        let matcher = RuleMatcher::from_rules(&rules);

        assert!(!matcher.should_strip("x.com", "a"));
        assert!(!matcher.should_strip("x.com", "b"));
        assert_eq!(matcher.domain_count(), 0);
    }

    #[test]
    fn test_union_across_rules_for_same_domain() {
        let rules = [
            rule(1, "x.com", &["fbclid"], &[], RuleStatus::Approved),
            rule(2, "x.com", &[], &["utm_"], RuleStatus::Approved),
        ];
        let matcher = RuleMatcher::from_rules(&rules);

        assert!(matcher.should_strip("x.com", "fbclid"));
        assert!(matcher.should_strip("x.com", "utm_medium"));
        assert_eq!(matcher.domain_count(), 1);
    }

    #[test]
    fn test_domain_comparison_case_insensitive() {
        let rules = [rule(1, "X.com", &["igsh"], &[], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        assert!(matcher.should_strip("x.com", "igsh"));
        assert!(matcher.should_strip("X.COM", "igsh"));
    }

    #[test]
    fn test_empty_param_never_matches() {
        let rules = [rule(1, "x.com", &["utm_source"], &["utm_"], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        assert!(!matcher.should_strip("x.com", ""));
    }

    #[test]
    fn test_clean_url_strips_flagged_params() {
        let rules = [rule(1, "example.com", &["fbclid"], &["utm_"], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        let cleaned =
            clean_url("https://example.com/p?utm_source=x&fbclid=123&keep=1", &matcher).unwrap();
        assert!(cleaned.contains("keep=1"));
        assert!(!cleaned.contains("utm_source"));
        assert!(!cleaned.contains("fbclid"));
        assert!(cleaned.starts_with("https://example.com/p"));
    }

    #[test]
    fn test_clean_url_unknown_domain_untouched() {
        let rules = [rule(1, "example.com", &[], &["utm_"], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        let cleaned = clean_url("https://other.org/?utm_source=x", &matcher).unwrap();
        assert!(cleaned.contains("utm_source=x"));
    }

    #[test]
    fn test_clean_url_drops_empty_query() {
        let rules = [rule(1, "example.com", &[], &["utm_"], RuleStatus::Approved)];
        let matcher = RuleMatcher::from_rules(&rules);

        let cleaned = clean_url("https://example.com/p?utm_source=x", &matcher).unwrap();
        assert_eq!(cleaned, "https://example.com/p");
    }
}

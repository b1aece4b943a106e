// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! In-memory rule store and moderation state machine.
//!
//! Each rule is addressed by a unique id and moves through exactly one
//! lifecycle: `pending` at submission, then a one-way transition to
//! `approved` or `rejected`. Moderation is a single check-and-set under the
//! write lock, so two racing decisions on the same rule observe exactly one
//! winner; the loser fails with [`StoreError::InvalidStateTransition`].
//!
//! Reads take the read lock and return cloned snapshots, never a rule in a
//! half-transitioned state.

use crate::matcher::RuleMatcher;
use crate::rules::{DomainRule, RuleStatus, Submission, ValidationError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Store error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rule {0} not found")]
    NotFound(i64),

    #[error("Rule {id} already moderated: {status}")]
    InvalidStateTransition { id: i64, status: RuleStatus },
}

/// Moderation decision on a pending rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn target(self) -> RuleStatus {
        match self {
            Self::Approve => RuleStatus::Approved,
            Self::Reject => RuleStatus::Rejected,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rules: BTreeMap<i64, DomainRule>,
}

/// Thread-safe rule store.
#[derive(Debug, Default, Clone)]
pub struct RuleStore {
    inner: Arc<RwLock<Inner>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a submission and persist it as a pending rule.
    pub async fn submit(&self, submission: Submission) -> Result<DomainRule, StoreError> {
        let validated = submission.validate()?;
        let rule = self.insert(validated, RuleStatus::Pending).await;
        info!(id = rule.id, domain = %rule.domain, "Rule submitted, pending review");
        Ok(rule)
    }

    /// Insert an already-approved rule, bypassing moderation.
    ///
    /// For deployment seed data only (e.g. a baseline `utm_` rule shipped
    /// with the service); everything contributor-facing goes through
    /// [`RuleStore::submit`].
    pub async fn seed(&self, submission: Submission) -> Result<DomainRule, StoreError> {
        let validated = submission.validate()?;
        let rule = self.insert(validated, RuleStatus::Approved).await;
        info!(id = rule.id, domain = %rule.domain, "Seed rule installed");
        Ok(rule)
    }

    async fn insert(&self, validated: crate::rules::ValidatedSubmission, status: RuleStatus) -> DomainRule {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let rule = DomainRule {
            id: inner.next_id,
            domain: validated.domain,
            keys: validated.keys,
            starts_with: validated.starts_with,
            contributors: vec![validated.contributor],
            status,
            created_at: Utc::now(),
        };
        inner.rules.insert(rule.id, rule.clone());
        rule
    }

    /// Apply a moderation decision to a pending rule.
    ///
    /// Atomic: the status check and the write happen under one write-lock
    /// acquisition. Rules that already left `pending` are never touched.
    pub async fn moderate(&self, id: i64, decision: Decision) -> Result<DomainRule, StoreError> {
        let mut inner = self.inner.write().await;
        let rule = inner.rules.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if rule.status != RuleStatus::Pending {
            debug!(id, status = %rule.status, "Repeat moderation refused");
            return Err(StoreError::InvalidStateTransition {
                id,
                status: rule.status,
            });
        }
        rule.status = decision.target();
        info!(id, domain = %rule.domain, status = %rule.status, "Rule moderated");
        Ok(rule.clone())
    }

    pub async fn approve(&self, id: i64) -> Result<DomainRule, StoreError> {
        self.moderate(id, Decision::Approve).await
    }

    pub async fn reject(&self, id: i64) -> Result<DomainRule, StoreError> {
        self.moderate(id, Decision::Reject).await
    }

    /// Snapshot of rules with the given status, oldest first.
    pub async fn list_by_status(&self, status: RuleStatus) -> Vec<DomainRule> {
        let inner = self.inner.read().await;
        inner
            .rules
            .values()
            .filter(|rule| rule.status == status)
            .cloned()
            .collect()
    }

    pub async fn list_pending(&self) -> Vec<DomainRule> {
        self.list_by_status(RuleStatus::Pending).await
    }

    pub async fn list_approved(&self) -> Vec<DomainRule> {
        self.list_by_status(RuleStatus::Approved).await
    }

    /// Snapshot of every rule regardless of status, oldest first.
    pub async fn list_all(&self) -> Vec<DomainRule> {
        let inner = self.inner.read().await;
        inner.rules.values().cloned().collect()
    }

    /// Fetch a single rule by id.
    pub async fn get(&self, id: i64) -> Result<DomainRule, StoreError> {
        let inner = self.inner.read().await;
        inner.rules.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Build a matcher from the current approved set.
    pub async fn matcher(&self) -> RuleMatcher {
        let inner = self.inner.read().await;
        RuleMatcher::from_rules(inner.rules.values())
    }
}

// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! LinkScrub Rules Service
//!
//! The community backend of the LinkScrub URL cleaner. Contributors submit
//! per-domain query-parameter cleaning rules, administrators moderate them,
//! and the approved set feeds the cleaning engine:
//!
//! - Rule model: exact parameter names (`keys`) plus name prefixes
//!   (`starts_with`) per domain.
//! - Moderation lifecycle: `pending` on submission, then a one-way
//!   transition to `approved` or `rejected`.
//! - Matching: a parameter is stripped when any approved rule for the exact
//!   (case-insensitive) domain flags it.
//! - Authorization: moderation and account creation require an opaque
//!   bearer token issued at login; submission and listing are public.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod matcher;
pub mod rules;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use matcher::{clean_url, RuleMatcher};
pub use rules::{DomainRule, RuleStatus, Submission};
pub use store::{Decision, RuleStore, StoreError};

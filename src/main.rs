// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! LinkScrub Rules Service
//!
//! HTTP backend for community-contributed URL cleaning rules. Contributors
//! submit per-domain rules, administrators approve or reject them, and the
//! approved set is what the cleaning engine consumes.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `PERMISSIVE_CORS`: Allow any origin (default: true)
//! - `SEED_RULES_PATH`: Optional JSON file of pre-approved seed rules
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: First-admin bootstrap when no
//!   accounts exist

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linkscrub_rules::{
    auth::{self, AdminDirectory, SessionIssuer},
    config::{Config, SeedRule},
    handlers::{self, AppState},
    rules::Submission,
    store::RuleStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config()?;
    info!(
        bind_addr = %config.bind_addr,
        permissive_cors = config.permissive_cors,
        seed_rules = config.seed_rules.len(),
        "Starting LinkScrub rules service"
    );

    // Create application state
    let store = RuleStore::new();
    seed_rules(&store, &config.seed_rules).await;

    let admins = AdminDirectory::new();
    auth::bootstrap_from_env(&admins).await;

    let state = Arc::new(AppState {
        store,
        admins,
        sessions: SessionIssuer::new(),
        config: config.clone(),
    });

    // Build router
    let mut app = handlers::router(state).layer(TraceLayer::new_for_http());
    if config.permissive_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> anyhow::Result<Config> {
    let mut config = Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        permissive_cors: std::env::var("PERMISSIVE_CORS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true),
        ..Default::default()
    };

    if let Ok(path) = std::env::var("SEED_RULES_PATH") {
        let raw = std::fs::read_to_string(&path)?;
        config.seed_rules = serde_json::from_str(&raw)?;
    }

    Ok(config)
}

/// Install deployment seed rules as already-approved, credited to `system`.
async fn seed_rules(store: &RuleStore, seeds: &[SeedRule]) {
    for seed in seeds {
        let submission = Submission {
            domain: seed.domain.clone(),
            keys: seed.keys.clone(),
            starts_with: seed.starts_with.clone(),
            contributor: "system".to_string(),
        };
        // RuleStore::seed logs the install; only failures need attention here.
        if let Err(e) = store.seed(submission).await {
            warn!(domain = %seed.domain, error = %e, "Skipping invalid seed rule");
        }
    }
}

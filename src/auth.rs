// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! Administrator credentials and opaque session tokens.
//!
//! The moderation core only needs one answer: is this bearer credential
//! valid. This module is the reference collaborator behind that question.
//! Passwords are stored as argon2 hashes; a successful login issues a
//! random 256-bit hex token that stays valid until logout. A failed check
//! changes nothing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Authentication and authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing or invalid bearer credential")]
    Unauthorized,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Registered administrator accounts (username to argon2 hash).
#[derive(Debug, Default, Clone)]
pub struct AdminDirectory {
    accounts: Arc<RwLock<HashMap<String, String>>>,
}

impl AdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new administrator. Fails if the username is taken.
    pub async fn create(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(AuthError::UsernameExists);
        }
        accounts.insert(username.to_string(), hash);
        info!(username, "Administrator account created");
        Ok(())
    }

    /// Verify a username/password pair.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let accounts = self.accounts.read().await;
        let stored = accounts.get(username).ok_or(AuthError::InvalidCredentials)?;
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

/// Issues and checks opaque bearer tokens.
#[derive(Debug, Default, Clone)]
pub struct SessionIssuer {
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl SessionIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for an already-authenticated administrator.
    pub async fn issue(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.tokens.write().await.insert(token.clone());
        token
    }

    /// Check a bearer token.
    pub async fn verify(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.read().await.contains(token) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    /// Revoke a token (logout). Returns whether it was live.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token)
    }
}

/// Login flow: verify the password, then issue a session token.
pub async fn login(
    directory: &AdminDirectory,
    sessions: &SessionIssuer,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    directory.verify_password(username, password).await?;
    let token = sessions.issue().await;
    info!(username, "Administrator logged in");
    Ok(token)
}

/// Create the first administrator from `ADMIN_USERNAME`/`ADMIN_PASSWORD`
/// when the directory is empty. Startup wiring; later accounts go through
/// the authenticated create endpoint.
pub async fn bootstrap_from_env(directory: &AdminDirectory) {
    if !directory.is_empty().await {
        return;
    }
    match (std::env::var("ADMIN_USERNAME"), std::env::var("ADMIN_PASSWORD")) {
        (Ok(username), Ok(password)) => match directory.create(&username, &password).await {
            Ok(()) => info!(username = %username, "Bootstrap administrator created"),
            Err(e) => warn!(error = %e, "Failed to create bootstrap administrator"),
        },
        _ => warn!("No administrators exist and ADMIN_USERNAME/ADMIN_PASSWORD are not set"),
    }
}

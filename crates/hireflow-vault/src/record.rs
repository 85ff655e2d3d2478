// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential records and display masking.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// The stored secret plus expiry and permission metadata for one service.
///
/// Debug output never includes the secret value.
#[derive(Clone)]
pub struct CredentialRecord {
    pub service: String,
    pub(crate) value: SecretString,
    pub expiry: Option<DateTime<Utc>>,
    pub permissions: BTreeSet<String>,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("service", &self.service)
            .field("value", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl CredentialRecord {
    /// Create a non-expiring record with no permissions.
    pub fn new(service: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            value: SecretString::from(value.into()),
            expiry: None,
            permissions: BTreeSet::new(),
        }
    }

    /// Set the expiry timestamp.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Set the permission tags.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// A record whose expiry is at or before `now` is logically absent.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}

/// Mask a secret value for display: `"sk-a...mnop"` format.
///
/// Shows up to 4 leading and 4 trailing characters. Values shorter than 10
/// characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars.iter().take(4).collect();
    let suffix: String = chars.iter().skip(chars.len() - 4).collect();
    format!("{prefix}...{suffix}")
}

// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential manager: expiry-gated reads, rotation, usage, and permissions.
//!
//! Records live behind a readers-writer lock; the access log has its own
//! mutex so concurrent reads of different services only contend briefly on
//! the log append. A poisoned lock is recovered rather than propagated since
//! both structures stay consistent after every individual mutation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use hireflow_config::model::CredentialConfig;
use hireflow_core::{ComponentKind, HireflowError};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::access_log::{AccessLog, AccessLogEntry, UsageReport};
use crate::record::{mask_secret, CredentialRecord};

/// Source of the current time, injectable for expiry tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Origin recorded when the caller does not identify itself.
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Stores per-service credentials and audits every successful read.
pub struct CredentialManager {
    records: RwLock<HashMap<String, CredentialRecord>>,
    log: Mutex<AccessLog>,
    clock: Clock,
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("services", &self.services())
            .finish_non_exhaustive()
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager {
    /// Create an empty manager using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Create an empty manager with a custom time source.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            log: Mutex::new(AccessLog::new()),
            clock,
        }
    }

    /// Build a manager from `[[credentials]]` entries, reading fallback values
    /// from the process environment.
    pub fn from_config(entries: &[CredentialConfig]) -> Self {
        Self::from_config_with_env(entries, |key| std::env::var(key).ok())
    }

    /// Build a manager from `[[credentials]]` entries with an explicit
    /// environment lookup.
    ///
    /// Value resolution order: inline `value`, then the variable named by
    /// `value_env`, then `HIREFLOW_<SERVICE>_KEY`. Entries with no value or an
    /// unparseable expiry are skipped with a warning.
    pub fn from_config_with_env<F>(entries: &[CredentialConfig], env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let manager = Self::new();
        for entry in entries {
            let value = entry
                .value
                .clone()
                .or_else(|| entry.value_env.as_deref().and_then(&env))
                .or_else(|| env(&default_env_var(&entry.service)));

            let Some(value) = value.filter(|v| !v.is_empty()) else {
                warn!(service = %entry.service, "credential has no value, skipping");
                continue;
            };

            let mut record =
                CredentialRecord::new(&entry.service, value).with_permissions(&entry.permissions);

            if let Some(raw) = &entry.expiry {
                match DateTime::parse_from_rfc3339(raw) {
                    Ok(expiry) => record = record.with_expiry(expiry.with_timezone(&Utc)),
                    Err(e) => {
                        warn!(
                            service = %entry.service,
                            expiry = %raw,
                            error = %e,
                            "credential expiry is not RFC 3339, skipping"
                        );
                        continue;
                    }
                }
            }

            manager.insert(record);
        }
        info!(count = manager.len(), "credential manager initialized");
        manager
    }

    /// Insert or replace the record for its service.
    pub fn insert(&self, record: CredentialRecord) {
        debug!(service = %record.service, "credential stored");
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.service.clone(), record);
    }

    /// Remove a service's record. Returns true if one existed.
    pub fn remove(&self, service: &str) -> bool {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(service)
            .is_some()
    }

    /// Retrieve a credential, recording the read with an unknown origin.
    pub fn get(&self, service: &str) -> Option<SecretString> {
        self.get_from(service, UNKNOWN_ORIGIN)
    }

    /// Retrieve a credential, recording the read against `origin`.
    ///
    /// Missing and expired credentials both return `None`; neither is logged.
    pub fn get_from(&self, service: &str, origin: &str) -> Option<SecretString> {
        self.check_from(service, origin).ok()
    }

    /// Like [`get_from`](Self::get_from) but distinguishes a missing record
    /// from an expired one.
    pub fn check_from(&self, service: &str, origin: &str) -> Result<SecretString, HireflowError> {
        let now = (self.clock)();
        let value = {
            let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
            let record = records
                .get(service)
                .ok_or_else(|| HireflowError::not_found(ComponentKind::Credential, service))?;
            if record.is_expired_at(now) {
                return Err(HireflowError::Expired {
                    service: service.to_string(),
                });
            }
            record.value.clone()
        };

        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AccessLogEntry {
                service: service.to_string(),
                timestamp: now,
                origin: origin.to_string(),
            });
        Ok(value)
    }

    /// Total and last-hour read counts for `service`.
    pub fn check_usage(&self, service: &str) -> UsageReport {
        let now = (self.clock)();
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .usage(service, now)
    }

    /// True iff the service has a record whose permissions include every
    /// `required` tag. Expiry is not considered.
    pub fn validate_permissions<S: AsRef<str>>(&self, service: &str, required: &[S]) -> bool {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(service).is_some_and(|record| {
            required
                .iter()
                .all(|perm| record.permissions.contains(perm.as_ref()))
        })
    }

    /// Replace the stored value for `service`, keeping expiry and permissions.
    ///
    /// Returns false without changing anything if the service is unknown.
    pub fn rotate(&self, service: &str, new_value: SecretString) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(service) {
            Some(record) => {
                record.value = new_value;
                info!(service, "credential rotated");
                true
            }
            None => {
                debug!(service, "rotation requested for unknown service");
                false
            }
        }
    }

    /// Replace both value and expiry for `service`.
    pub fn rotate_with_expiry(
        &self,
        service: &str,
        new_value: SecretString,
        expiry: Option<DateTime<Utc>>,
    ) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(service) {
            Some(record) => {
                record.value = new_value;
                record.expiry = expiry;
                info!(service, ?expiry, "credential rotated with new expiry");
                true
            }
            None => false,
        }
    }

    /// Names of all stored services, sorted.
    pub fn services(&self) -> Vec<String> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = records.keys().cloned().collect();
        names.sort();
        names
    }

    /// `(service, masked value, expired)` for display. Not recorded as access.
    pub fn list_masked(&self) -> Vec<(String, String, bool)> {
        use secrecy::ExposeSecret;

        let now = (self.clock)();
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut rows: Vec<_> = records
            .values()
            .map(|r| {
                (
                    r.service.clone(),
                    mask_secret(r.value.expose_secret()),
                    r.is_expired_at(now),
                )
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    /// Snapshot of the access log, oldest first.
    pub fn access_log(&self) -> Vec<AccessLogEntry> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .to_vec()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `HIREFLOW_<SERVICE>_KEY`, uppercased with dashes mapped to underscores.
fn default_env_var(service: &str) -> String {
    format!(
        "HIREFLOW_{}_KEY",
        service.to_ascii_uppercase().replace('-', "_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use secrecy::ExposeSecret;

    /// Manually advanced clock shared with the manager under test.
    fn manual_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, Clock) {
        let now = Arc::new(Mutex::new(start));
        let handle = Arc::clone(&now);
        let clock: Clock = Arc::new(move || *handle.lock().unwrap());
        (now, clock)
    }

    #[test]
    fn get_returns_value_and_logs_access() {
        let mgr = CredentialManager::new();
        mgr.insert(CredentialRecord::new("qwen", "sk-qwen-123"));

        let value = mgr.get_from("qwen", "10.0.0.7").unwrap();
        assert_eq!(value.expose_secret(), "sk-qwen-123");

        let log = mgr.access_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].service, "qwen");
        assert_eq!(log[0].origin, "10.0.0.7");
    }

    #[test]
    fn missing_service_is_absent_and_not_logged() {
        let mgr = CredentialManager::new();
        assert!(mgr.get("nope").is_none());
        assert!(mgr.access_log().is_empty());
        assert!(mgr.check_from("nope", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn expired_credential_is_absent_and_not_logged() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let mgr = CredentialManager::with_clock(clock);
        mgr.insert(CredentialRecord::new("outlook", "tok-1").with_expiry(start + Duration::minutes(5)));

        assert!(mgr.get("outlook").is_some());
        assert_eq!(mgr.access_log().len(), 1);

        *now.lock().unwrap() = start + Duration::minutes(5);
        assert!(mgr.get("outlook").is_none());
        assert!(matches!(
            mgr.check_from("outlook", "x"),
            Err(HireflowError::Expired { .. })
        ));
        assert_eq!(mgr.access_log().len(), 1);
    }

    #[test]
    fn check_usage_counts_recent_window() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let mgr = CredentialManager::with_clock(clock);
        mgr.insert(CredentialRecord::new("qwen", "sk-1"));

        mgr.get("qwen");
        mgr.get("qwen");
        *now.lock().unwrap() = start + Duration::hours(2);
        mgr.get("qwen");

        let report = mgr.check_usage("qwen");
        assert_eq!(report.total_requests, 3);
        assert_eq!(report.recent_requests, 1);
    }

    #[test]
    fn validate_permissions_requires_all_tags() {
        let mgr = CredentialManager::new();
        mgr.insert(CredentialRecord::new("dingtalk", "tok").with_permissions(["read", "write"]));

        assert!(mgr.validate_permissions("dingtalk", &["read"]));
        assert!(mgr.validate_permissions("dingtalk", &["read", "write"]));
        assert!(!mgr.validate_permissions("dingtalk", &["read", "admin"]));
        assert!(!mgr.validate_permissions("missing", &["read"]));
        assert!(mgr.validate_permissions::<&str>("dingtalk", &[]));
    }

    #[test]
    fn rotate_replaces_value_and_keeps_metadata() {
        let mgr = CredentialManager::new();
        let expiry = Utc::now() + Duration::days(1);
        mgr.insert(
            CredentialRecord::new("qwen", "old")
                .with_expiry(expiry)
                .with_permissions(["generate"]),
        );

        assert!(mgr.rotate("qwen", SecretString::from("new".to_string())));
        assert_eq!(mgr.get("qwen").unwrap().expose_secret(), "new");
        assert!(mgr.validate_permissions("qwen", &["generate"]));

        assert!(!mgr.rotate("unknown", SecretString::from("x".to_string())));
        assert!(mgr.get("unknown").is_none());
    }

    #[test]
    fn rotate_with_expiry_revives_expired_credential() {
        let start = Utc::now();
        let (_now, clock) = manual_clock(start);
        let mgr = CredentialManager::with_clock(clock);
        mgr.insert(CredentialRecord::new("outlook", "stale").with_expiry(start - Duration::minutes(1)));
        assert!(mgr.get("outlook").is_none());

        assert!(mgr.rotate_with_expiry(
            "outlook",
            SecretString::from("fresh".to_string()),
            Some(start + Duration::hours(1)),
        ));
        assert_eq!(mgr.get("outlook").unwrap().expose_secret(), "fresh");
    }

    #[test]
    fn from_config_resolves_values_in_order() {
        let entries: Vec<CredentialConfig> = toml::from_str::<ConfigList>(
            r#"
            [[credentials]]
            service = "inline"
            value = "inline-value"
            value_env = "SHOULD_NOT_BE_READ"

            [[credentials]]
            service = "named"
            value_env = "MY_NAMED_VAR"

            [[credentials]]
            service = "dingtalk-app"

            [[credentials]]
            service = "missing"
            "#,
        )
        .unwrap()
        .credentials;

        let env = |key: &str| match key {
            "SHOULD_NOT_BE_READ" => Some("wrong".to_string()),
            "MY_NAMED_VAR" => Some("named-value".to_string()),
            "HIREFLOW_DINGTALK_APP_KEY" => Some("default-value".to_string()),
            _ => None,
        };
        let mgr = CredentialManager::from_config_with_env(&entries, env);

        assert_eq!(mgr.services(), vec!["dingtalk-app", "inline", "named"]);
        assert_eq!(mgr.get("inline").unwrap().expose_secret(), "inline-value");
        assert_eq!(mgr.get("named").unwrap().expose_secret(), "named-value");
        assert_eq!(
            mgr.get("dingtalk-app").unwrap().expose_secret(),
            "default-value"
        );
        assert!(mgr.get("missing").is_none());
    }

    #[test]
    fn from_config_skips_invalid_expiry_and_honours_past_expiry() {
        let entries: Vec<CredentialConfig> = toml::from_str::<ConfigList>(
            r#"
            [[credentials]]
            service = "garbled"
            value = "v"
            expiry = "next tuesday"

            [[credentials]]
            service = "past"
            value = "v"
            expiry = "2000-01-01T00:00:00Z"

            [[credentials]]
            service = "future"
            value = "v"
            expiry = "2999-01-01T00:00:00+08:00"
            permissions = ["read"]
            "#,
        )
        .unwrap()
        .credentials;

        let mgr = CredentialManager::from_config_with_env(&entries, |_| None);
        assert_eq!(mgr.services(), vec!["future", "past"]);
        assert!(mgr.get("past").is_none());
        assert!(mgr.get("future").is_some());
        assert!(mgr.validate_permissions("future", &["read"]));
    }

    #[test]
    fn list_masked_hides_values_without_logging() {
        let mgr = CredentialManager::new();
        mgr.insert(CredentialRecord::new("qwen", "sk-ant-REDACTED"));
        mgr.insert(CredentialRecord::new("brief", "short"));

        let rows = mgr.list_masked();
        assert_eq!(
            rows,
            vec![
                ("brief".to_string(), "****".to_string(), false),
                ("qwen".to_string(), "sk-a...mnop".to_string(), false),
            ]
        );
        assert!(mgr.access_log().is_empty());
    }

    #[test]
    fn concurrent_reads_all_logged() {
        let mgr = Arc::new(CredentialManager::new());
        mgr.insert(CredentialRecord::new("qwen", "sk"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let mgr = Arc::clone(&mgr);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        assert!(mgr.get_from("qwen", &format!("thread-{i}")).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(mgr.check_usage("qwen").total_requests, 200);
    }

    #[test]
    #[serial_test::serial]
    fn from_config_reads_process_environment() {
        // SAFETY: serialized with other env-mutating tests.
        unsafe { std::env::set_var("HIREFLOW_SMS_GATEWAY_KEY", "from-env") };
        let entries = vec![CredentialConfig {
            service: "sms-gateway".into(),
            value: None,
            value_env: None,
            expiry: None,
            permissions: vec![],
        }];
        let mgr = CredentialManager::from_config(&entries);
        unsafe { std::env::remove_var("HIREFLOW_SMS_GATEWAY_KEY") };
        assert_eq!(mgr.get("sms-gateway").unwrap().expose_secret(), "from-env");
    }

    #[derive(serde::Deserialize)]
    struct ConfigList {
        credentials: Vec<CredentialConfig>,
    }
}

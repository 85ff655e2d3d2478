// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hireflow credentials` command implementation.
//!
//! Values are never printed in full; listing does not count as access.
//! Usage reflects reads made while the runtime is built for this command.

use std::collections::BTreeSet;

use hireflow_config::HireflowConfig;
use hireflow_core::{ComponentKind, HireflowError};
use hireflow_vault::{CredentialManager, UsageReport};
use serde_json::json;

/// Run `hireflow credentials list`.
pub fn run_list(config: &HireflowConfig) -> Result<(), HireflowError> {
    let manager = CredentialManager::from_config(&config.credentials);
    let rows = manager.list_masked();

    println!();
    println!("  hireflow credentials");
    println!("  {}", "-".repeat(50));
    if rows.is_empty() {
        println!("    (none configured)");
    }
    for (service, masked, expired) in rows {
        let state = if expired { "expired" } else { "active" };
        println!("    {service:<20} {masked:<16} {state}");
    }
    println!();
    Ok(())
}

/// Run `hireflow credentials usage <service>`.
///
/// Builds the runtime first so the reads made while constructing backends
/// (origin `backend:<name>`) show up in the report.
pub async fn run_usage(config: HireflowConfig, service: &str) -> Result<(), HireflowError> {
    let runtime = crate::build_runtime(config).await;
    let result = usage_report(runtime.credentials(), service);
    runtime.shutdown().await;

    let (report, origins) = result?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "service": report.service,
            "total_requests": report.total_requests,
            "recent_requests": report.recent_requests,
            "origins": origins,
        }))
        .unwrap_or_else(|_| "{}".to_string())
    );
    Ok(())
}

/// Usage counts for `service` plus the distinct origins that read it.
fn usage_report(
    manager: &CredentialManager,
    service: &str,
) -> Result<(UsageReport, BTreeSet<String>), HireflowError> {
    if !manager.services().iter().any(|s| s == service) {
        return Err(HireflowError::not_found(ComponentKind::Credential, service));
    }
    let origins = manager
        .access_log()
        .into_iter()
        .filter(|entry| entry.service == service)
        .map(|entry| entry.origin)
        .collect();
    Ok((manager.check_usage(service), origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[runtime]
default_backend = "qwen"

[[backends]]
name = "qwen"

[[credentials]]
service = "qwen"
value = "sk-qwen-test-value"

[[credentials]]
service = "dingtalk"
value = "dt-secret-value"
"#;

    #[tokio::test]
    async fn usage_counts_reads_made_by_runtime_construction() {
        let config = hireflow_config::load_and_validate_str(CONFIG).unwrap();
        let runtime = crate::build_runtime(config).await;

        let (report, origins) = usage_report(runtime.credentials(), "qwen").unwrap();
        assert_eq!(report.total_requests, 1);
        assert_eq!(report.recent_requests, 1);
        assert!(origins.contains("backend:qwen"));

        let (report, origins) = usage_report(runtime.credentials(), "dingtalk").unwrap();
        assert_eq!(report.total_requests, 0);
        assert!(origins.is_empty());

        let err = usage_report(runtime.credentials(), "missing").unwrap_err();
        assert!(err.is_not_found());
        runtime.shutdown().await;
    }
}

// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hireflow doctor` command implementation.
//!
//! Builds each component family from configuration and reports what would
//! reduce capability at runtime: missing keys, expired credentials, plugins
//! that fail to load, calendar integrations that would be skipped.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use hireflow_backend::BackendRegistry;
use hireflow_calendar::{CalendarFanOut, SyncOutcome};
use hireflow_config::HireflowConfig;
use hireflow_core::{GenerateOptions, HireflowError};
use hireflow_plugin::{LoadOutcome, PluginRegistry};
use hireflow_vault::CredentialManager;

const PING_TIMEOUT: Duration = Duration::from_secs(15);

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, started: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: started.elapsed(),
        }
    }
}

/// Run the `hireflow doctor` command.
///
/// With `--deep`, also sends a one-word prompt to the active backend.
pub async fn run_doctor(config: HireflowConfig, deep: bool, plain: bool) -> Result<(), HireflowError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let credentials = CredentialManager::from_config(&config.credentials);
    let backends = BackendRegistry::from_config(&config, &credentials);

    let mut results = vec![
        check_config(&config),
        check_backends(&config, &backends),
        check_credentials(&credentials),
        check_plugins(&config).await,
    ];
    results.extend(check_calendars(&config));
    if deep {
        results.push(check_backend_ping(&backends).await);
    }

    println!();
    println!("  hireflow doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {word} found.");
        if !deep {
            println!("  Run with --deep to contact the active backend.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();
    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({ms}ms)", result.name, result.message)
    }
}

fn check_config(config: &HireflowConfig) -> CheckResult {
    let started = Instant::now();
    let message = format!(
        "{} backend(s), {} credential(s), {} calendar(s)",
        config.backends.len(),
        config.credentials.len(),
        config.calendars.len()
    );
    CheckResult::new("Config", CheckStatus::Pass, message, started)
}

fn check_backends(config: &HireflowConfig, backends: &BackendRegistry) -> CheckResult {
    let started = Instant::now();
    let dropped: Vec<&str> = config
        .backends
        .iter()
        .map(|b| b.name.as_str())
        .filter(|name| backends.get(name).is_none())
        .collect();

    match backends.active_name() {
        None => CheckResult::new(
            "Backends",
            CheckStatus::Fail,
            format!(
                "no active backend ({} has no API key)",
                config.runtime.default_backend
            ),
            started,
        ),
        Some(active) if !dropped.is_empty() => CheckResult::new(
            "Backends",
            CheckStatus::Warn,
            format!("active: {active}; skipped without key: {}", dropped.join(", ")),
            started,
        ),
        Some(active) => CheckResult::new(
            "Backends",
            CheckStatus::Pass,
            format!("active: {active}; {} registered", backends.len()),
            started,
        ),
    }
}

fn check_credentials(credentials: &CredentialManager) -> CheckResult {
    let started = Instant::now();
    let rows = credentials.list_masked();
    let expired: Vec<&str> = rows
        .iter()
        .filter(|(_, _, expired)| *expired)
        .map(|(service, _, _)| service.as_str())
        .collect();

    if rows.is_empty() {
        CheckResult::new("Credentials", CheckStatus::Warn, "none configured", started)
    } else if !expired.is_empty() {
        CheckResult::new(
            "Credentials",
            CheckStatus::Warn,
            format!("expired: {}", expired.join(", ")),
            started,
        )
    } else {
        CheckResult::new(
            "Credentials",
            CheckStatus::Pass,
            format!("{} active", rows.len()),
            started,
        )
    }
}

async fn check_plugins(config: &HireflowConfig) -> CheckResult {
    let started = Instant::now();
    let plugins = PluginRegistry::from_config(&config.plugins);
    let outcomes = plugins.load_all().await;
    plugins.shutdown().await;

    let failed: Vec<String> = outcomes
        .iter()
        .filter_map(|(name, outcome)| match outcome {
            LoadOutcome::Loaded => None,
            LoadOutcome::Failed(e) => Some(format!("{name} ({e})")),
        })
        .collect();

    if outcomes.is_empty() {
        CheckResult::new("Plugins", CheckStatus::Warn, "none discovered", started)
    } else if failed.is_empty() {
        CheckResult::new(
            "Plugins",
            CheckStatus::Pass,
            format!("{} loaded", outcomes.len()),
            started,
        )
    } else {
        CheckResult::new(
            "Plugins",
            CheckStatus::Fail,
            format!("failed: {}", failed.join("; ")),
            started,
        )
    }
}

fn check_calendars(config: &HireflowConfig) -> Vec<CheckResult> {
    let fan_out = CalendarFanOut::new(
        config.calendars.clone(),
        Duration::from_secs(config.runtime.sync_timeout_secs),
    );
    fan_out
        .preflight()
        .into_iter()
        .map(|(name, check)| {
            let started = Instant::now();
            let label = format!("Calendar {name}");
            match check {
                Ok(()) => CheckResult::new(&label, CheckStatus::Pass, "ready", started),
                Err(SyncOutcome::Skipped { message }) => {
                    CheckResult::new(&label, CheckStatus::Pass, message, started)
                }
                Err(outcome) => {
                    let message = match outcome {
                        SyncOutcome::Error { message } => message,
                        other => other.status().to_string(),
                    };
                    CheckResult::new(&label, CheckStatus::Warn, message, started)
                }
            }
        })
        .collect()
}

async fn check_backend_ping(backends: &BackendRegistry) -> CheckResult {
    let started = Instant::now();
    let options = GenerateOptions {
        max_tokens: Some(8),
        ..GenerateOptions::with_timeout(PING_TIMEOUT)
    };
    match backends.generate("ping", &options, None).await {
        Ok(_) => CheckResult::new("Backend ping", CheckStatus::Pass, "reply received", started),
        Err(e) => CheckResult::new("Backend ping", CheckStatus::Fail, e.to_string(), started),
    }
}

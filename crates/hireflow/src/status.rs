// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hireflow status` and `hireflow plugins` command implementations.
//!
//! Both build a runtime from configuration, report what it can do, and shut
//! it down again. Nothing is left running.

use std::io::IsTerminal;

use hireflow_agent::RuntimeStatus;
use hireflow_config::HireflowConfig;
use hireflow_core::{HealthStatus, HireflowError};

/// Run the `hireflow status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: HireflowConfig, json: bool, plain: bool) -> Result<(), HireflowError> {
    let runtime = crate::build_runtime(config).await;
    let status = runtime.status();
    runtime.shutdown().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(())
}

/// Run the `hireflow plugins` command.
pub async fn run_plugins(config: HireflowConfig) -> Result<(), HireflowError> {
    let runtime = crate::build_runtime(config).await;
    let discovered = runtime.plugins().discover();
    let loaded = runtime.plugins().describe();
    runtime.shutdown().await;

    println!();
    println!("  hireflow plugins");
    println!("  {}", "-".repeat(50));
    for name in &discovered {
        match loaded.iter().find(|p| &p.name == name) {
            Some(info) => println!(
                "    {:<20} v{:<8} loaded   {}",
                info.name,
                info.version,
                info.methods.join(", ")
            ),
            None => println!("    {name:<20} {:<9} failed", "-"),
        }
    }
    if discovered.is_empty() {
        println!("    (none)");
    }
    println!();
    Ok(())
}

fn health_label(health: &HealthStatus) -> (String, bool) {
    match health {
        HealthStatus::Healthy => ("healthy".to_string(), true),
        HealthStatus::Degraded(reason) => (format!("degraded ({reason})"), false),
        HealthStatus::Unhealthy(reason) => (format!("unhealthy ({reason})"), false),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn print_status(status: &RuntimeStatus, use_color: bool) {
    let (label, healthy) = health_label(&status.health);

    println!();
    println!("  hireflow status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        if healthy {
            println!("    State:       {} {}", "✓".green(), label.green());
        } else {
            println!("    State:       {} {}", "!".yellow(), label.yellow());
        }
    } else if healthy {
        println!("    State:       [OK] {label}");
    } else {
        println!("    State:       [WARN] {label}");
    }

    println!(
        "    Backend:     {}",
        status.active_backend.as_deref().unwrap_or("(none active)")
    );
    println!("    Backends:    {}", list_or_none(&status.backends));
    println!("    Plugins:     {}", list_or_none(&status.plugins));
    println!("    Credentials: {}", list_or_none(&status.credentials));
    println!("    Calendars:   {}", list_or_none(&status.calendars));
    println!("    Agents:      {}", list_or_none(&status.agents));
    println!();
}

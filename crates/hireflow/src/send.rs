// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hireflow send` command implementation.

use hireflow_config::HireflowConfig;
use hireflow_core::HireflowError;
use serde_json::Value;
use tracing::debug;

/// Parse `data` as JSON, deliver it to `target`, and print the pretty reply.
pub async fn run_send(
    config: HireflowConfig,
    target: &str,
    action: &str,
    data: &str,
) -> Result<(), HireflowError> {
    let payload = parse_payload(data)?;
    debug!(target_agent = target, action, "sending action");
    let runtime = crate::build_runtime(config).await;
    let result = runtime.send(target, action, payload).await;
    runtime.shutdown().await;

    let reply = result?;
    println!(
        "{}",
        serde_json::to_string_pretty(&reply).unwrap_or_else(|_| reply.to_string())
    );
    Ok(())
}

fn parse_payload(data: &str) -> Result<Value, HireflowError> {
    serde_json::from_str(data)
        .map_err(|e| HireflowError::InvalidRequest(format!("payload is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_must_be_json() {
        assert_eq!(
            parse_payload(r#"{"prompt": "hi"}"#).unwrap()["prompt"],
            "hi"
        );
        let err = parse_payload("prompt=hi").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}

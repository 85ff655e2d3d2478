// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for `hireflow.toml`.
//!
//! Figment reports where a value came from but not where in the file it sits.
//! For errors that originate in a TOML file, the file is re-parsed with
//! `toml` to recover the byte span of the offending key, so the rendered
//! report can point at it. Unknown keys get a "did you mean" suggestion from
//! the keys valid in that section.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::HireflowConfig;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, ready to render with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key not recognized in its section (`[runtime]`, `[[backends]]`,
    /// `[[credentials]]`, `[plugins]`, or the top level).
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(
        code(hireflow::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Human-readable section, e.g. `[runtime]` or `backends[1]`.
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a {section} key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(hireflow::config::invalid_type), help("{help}"))]
    InvalidType {
        key: String,
        detail: String,
        /// Section-specific advice; calendar settings must all be strings.
        help: String,
    },

    /// A key every entry of its section needs (`backends[].name`,
    /// `credentials[].service`).
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(hireflow::config::missing_key),
        help("every entry in this section needs `{field} = ...`")
    )]
    MissingKey { key: String, field: String },

    /// A semantic check on a parsed value failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(hireflow::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(hireflow::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` are `(path, content)` pairs for the files that were merged;
/// they are only used to attach source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section: section_label(&error.path),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: join_key(&error.path, field),
                field: field.to_string(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                help: type_help(&error.path, expected),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// `[runtime]`, `backends[1]`, or `the top level` for an empty path.
fn section_label(path: &[String]) -> String {
    match path {
        [] => "the top level".to_string(),
        [section] => format!("[{section}]"),
        [section, index, ..] if index.parse::<usize>().is_ok() => format!("{section}[{index}]"),
        _ => format!("[{}]", path.join(".")),
    }
}

fn join_key(path: &[String], field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", path.join("."))
    }
}

fn type_help(path: &[String], expected: &str) -> String {
    if path.first().map(String::as_str) == Some("calendars") {
        "calendar settings are provider keys with string values, e.g. `app_key = \"...\"`; \
         only `enabled` is a boolean"
            .to_string()
    } else {
        format!("expected {expected}")
    }
}

/// Span of the unknown `field`, recovered by re-parsing the file it came from.
///
/// `toml` reports the key's byte range for `deny_unknown_fields` failures.
/// Errors from environment variables carry no file and get no span.
fn locate(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| s.file_path())
        .map(|p| p.display().to_string());

    let source = match origin {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        // Inline strings have no file path; use the single source if that is all there is.
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };
    let Some((path, content)) = source else {
        return (None, None);
    };

    let span = toml::from_str::<HireflowConfig>(content)
        .err()
        .and_then(|e| e.span())
        .filter(|range| content.get(range.clone()).is_some_and(|s| s.contains(field)));

    match span {
        Some(range) => (
            Some(SourceSpan::new(range.start.into(), range.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// The valid key most similar to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn errors_for(toml: &str) -> Vec<ConfigError> {
        let err = load_config_from_str(toml).expect_err("config should be rejected");
        figment_to_config_errors(err, &[("<inline>".to_string(), toml.to_string())])
    }

    #[test]
    fn suggests_closest_runtime_key() {
        let valid = &["log_level", "default_backend", "request_timeout_secs"];
        assert_eq!(suggest_key("log_levle", valid), Some("log_level".to_string()));
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn unknown_backend_key_names_entry_and_points_at_it() {
        let toml = "[[backends]]\nname = \"qwen\"\nmodle_id = \"qwen-plus\"\n";
        let errors = errors_for(toml);
        match &errors[..] {
            [ConfigError::UnknownKey {
                key,
                section,
                suggestion,
                span,
                ..
            }] => {
                assert_eq!(key, "modle_id");
                assert!(section.starts_with("backends"), "section: {section}");
                assert_eq!(suggestion.as_deref(), Some("model_id"));
                let span = span.expect("span recovered from source");
                assert!(toml[span.offset()..span.offset() + span.len()].contains("modle_id"));
            }
            other => panic!("unexpected errors: {other:?}"),
        }
    }

    #[test]
    fn unknown_plugins_key_is_reported_for_its_section() {
        let errors = errors_for("[plugins]\ndirectory = \"plugins\"\n");
        assert!(matches!(
            &errors[..],
            [ConfigError::UnknownKey { section, suggestion, .. }]
                if section == "[plugins]" && suggestion.as_deref() == Some("dir")
        ));
    }

    #[test]
    fn credential_without_service_is_missing_key() {
        let errors = errors_for("[[credentials]]\nvalue = \"sk\"\n");
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::MissingKey { field, .. } if field == "service"
        )));
    }

    #[test]
    fn non_string_calendar_setting_gets_calendar_help() {
        let errors = errors_for("[calendars.outlook]\nenabled = true\nport = 443\n");
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidType { help, .. } if help.contains("calendar settings")
        )));
    }

    #[test]
    fn section_labels() {
        assert_eq!(section_label(&[]), "the top level");
        assert_eq!(section_label(&["runtime".to_string()]), "[runtime]");
        assert_eq!(
            section_label(&["credentials".to_string(), "2".to_string()]),
            "credentials[2]"
        );
    }
}

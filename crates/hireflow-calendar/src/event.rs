// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interview event shared by all calendar providers.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Accepted layouts for `TimeOption::datetime`.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// One proposed interview slot. Times are wall-clock in `timezone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOption {
    pub datetime: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// An interviewer given either as a bare name or with contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Interviewer {
    Name(String),
    Contact {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
    },
}

impl Interviewer {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Contact { name, .. } => name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Name(_) => "",
            Self::Contact { email, .. } => email,
        }
    }
}

/// Structured interview arrangement produced by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDetails {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub time_options: Vec<TimeOption>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub interviewer: Vec<Interviewer>,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub notes: String,
    /// Length in minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    60
}

impl Default for InterviewDetails {
    /// Placeholder arrangement used when generated details cannot be parsed.
    fn default() -> Self {
        Self {
            position: None,
            time_options: vec![TimeOption {
                datetime: "2023-01-10T10:00:00".into(),
                timezone: Some("Asia/Shanghai".into()),
                format: Some("yyyy-MM-dd HH:mm".into()),
            }],
            location: "TBD".into(),
            interviewer: vec![Interviewer::Name("TBD".into())],
            process: "TBD".into(),
            notes: "None".into(),
            duration: default_duration(),
        }
    }
}

impl InterviewDetails {
    /// Event title shown in calendars.
    pub fn title(&self) -> String {
        format!(
            "Interview: {}",
            self.position.as_deref().unwrap_or("Unknown position")
        )
    }

    /// Start of the first proposed slot, or "" when there are none.
    pub fn start_time(&self) -> &str {
        self.time_options
            .first()
            .map(|t| t.datetime.as_str())
            .unwrap_or("")
    }

    /// Start plus `duration` minutes, in the start's own layout.
    ///
    /// Unparseable starts are returned unchanged.
    pub fn end_time(&self) -> String {
        let start = self.start_time();
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| {
                NaiveDateTime::parse_from_str(start, fmt)
                    .ok()
                    .map(|t| (t + Duration::minutes(i64::from(self.duration))).format(fmt).to_string())
            })
            .unwrap_or_else(|| start.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_time_adds_duration() {
        let details = InterviewDetails {
            duration: 90,
            time_options: vec![TimeOption {
                datetime: "2026-03-02T23:00:00".into(),
                timezone: None,
                format: None,
            }],
            ..InterviewDetails::default()
        };
        assert_eq!(details.end_time(), "2026-03-03T00:30:00");
    }

    #[test]
    fn end_time_keeps_short_layout() {
        let mut details = InterviewDetails::default();
        details.time_options[0].datetime = "2026-03-02 09:15".into();
        assert_eq!(details.end_time(), "2026-03-02 10:15");
    }

    #[test]
    fn unparseable_or_missing_start() {
        let mut details = InterviewDetails::default();
        details.time_options[0].datetime = "next monday".into();
        assert_eq!(details.end_time(), "next monday");

        details.time_options.clear();
        assert_eq!(details.start_time(), "");
        assert_eq!(details.end_time(), "");
    }

    #[test]
    fn interviewers_accept_names_and_contacts() {
        let details: InterviewDetails = serde_json::from_value(serde_json::json!({
            "interviewer": ["Li Wei", {"name": "Ana", "email": "ana@example.com"}]
        }))
        .unwrap();
        assert_eq!(details.interviewer[0].name(), "Li Wei");
        assert_eq!(details.interviewer[0].email(), "");
        assert_eq!(details.interviewer[1].email(), "ana@example.com");
        assert_eq!(details.duration, 60);
        assert_eq!(details.title(), "Interview: Unknown position");
    }
}

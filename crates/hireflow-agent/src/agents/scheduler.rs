// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `interview_scheduler` agent.
//!
//! `schedule` asks the active backend for an interview arrangement, extracts
//! the JSON object from the reply, and fans the result out to every
//! configured calendar. A reply that cannot be parsed falls back to a
//! placeholder arrangement so calendars still receive an event.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hireflow_backend::BackendRegistry;
use hireflow_calendar::{CalendarFanOut, InterviewDetails};
use hireflow_core::{Agent, GenerateOptions, HireflowError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::parse_request;

pub const INTERVIEW_SCHEDULER_ID: &str = "interview_scheduler";

const SYSTEM_PROMPT: &str = "You are an interview coordinator. Given candidate, job, and \
interview requirements, propose concrete time options, a location or meeting link, \
interviewers, the interview process, and notes.";

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    #[serde(default)]
    candidate: Value,
    #[serde(default)]
    job: Value,
    #[serde(default)]
    interview: Value,
    #[serde(default)]
    backend: Option<String>,
}

pub struct InterviewSchedulerAgent {
    backends: Arc<BackendRegistry>,
    calendars: Arc<CalendarFanOut>,
    timeout: Duration,
}

impl InterviewSchedulerAgent {
    pub fn new(
        backends: Arc<BackendRegistry>,
        calendars: Arc<CalendarFanOut>,
        timeout: Duration,
    ) -> Self {
        Self {
            backends,
            calendars,
            timeout,
        }
    }

    async fn schedule(&self, request: ScheduleRequest) -> Result<Value, HireflowError> {
        let prompt = schedule_prompt(&request.candidate, &request.job, &request.interview);
        let options = GenerateOptions {
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            timeout: Some(self.timeout),
            ..GenerateOptions::default()
        };
        let reply = self
            .backends
            .generate(&prompt, &options, request.backend.as_deref())
            .await?;

        let mut details = parse_details(&reply).unwrap_or_else(|| {
            warn!("generated interview details were not valid JSON, using placeholder");
            InterviewDetails::default()
        });
        if details.position.is_none() {
            details.position = request
                .job
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        let sync_results = self.calendars.fan_out(&details).await;
        debug!(targets = sync_results.len(), "interview synced to calendars");

        Ok(json!({
            "status": "success",
            "data": details,
            "sync_results": sync_results,
        }))
    }
}

#[async_trait]
impl Agent for InterviewSchedulerAgent {
    fn id(&self) -> &str {
        INTERVIEW_SCHEDULER_ID
    }

    async fn handle(&self, action: &str, data: Value) -> Result<Value, HireflowError> {
        match action {
            "schedule" => self.schedule(parse_request(action, data)?).await,
            _ => Err(HireflowError::UnknownAction {
                agent: INTERVIEW_SCHEDULER_ID.to_string(),
                action: action.to_string(),
            }),
        }
    }
}

fn schedule_prompt(candidate: &Value, job: &Value, interview: &Value) -> String {
    format!(
        "Arrange an interview from the following information.\n\
         Candidate: {candidate}\n\
         Job: {job}\n\
         Interview: {interview}\n\n\
         Reply with only a JSON object of this shape:\n\
         {{\"time_options\": [{{\"datetime\": \"2026-01-10T10:00:00\", \"timezone\": \"Asia/Shanghai\"}}], \
         \"location\": \"...\", \"interviewer\": [\"...\"], \"process\": \"...\", \
         \"notes\": \"...\", \"duration\": 60}}"
    )
}

/// The span from the first `{` to the last `}`, parsed as interview details.
fn parse_details(reply: &str) -> Option<InterviewDetails> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

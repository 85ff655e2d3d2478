// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar providers keyed by integration name.
//!
//! Providers validate their required settings and build the provider's event
//! payload. Delivery to the remote calendar API is not performed here; the
//! returned payload is what would be posted.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use hireflow_core::HireflowError;
use serde_json::{json, Value};

use crate::event::InterviewDetails;

/// One calendar system reachable through fan-out.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Integration name this provider serves (e.g. "dingtalk").
    fn name(&self) -> &str;

    /// Settings keys that must be present and non-empty.
    fn required_settings(&self) -> &[&'static str];

    /// Sync one event. Settings have already been checked.
    async fn sync(
        &self,
        event: &InterviewDetails,
        settings: &BTreeMap<String, String>,
    ) -> Result<Value, HireflowError>;
}

/// Providers for DingTalk, WeCom, Outlook, and Google Calendar.
pub fn builtin_providers() -> Vec<Arc<dyn CalendarProvider>> {
    vec![
        Arc::new(DingTalk),
        Arc::new(WechatWork),
        Arc::new(Outlook),
        Arc::new(GoogleCalendar),
    ]
}

fn description(event: &InterviewDetails) -> String {
    format!("Candidate interview arrangement\n\n{}", event.process)
}

struct DingTalk;

#[async_trait]
impl CalendarProvider for DingTalk {
    fn name(&self) -> &str {
        "dingtalk"
    }

    fn required_settings(&self) -> &[&'static str] {
        &["app_key", "app_secret"]
    }

    async fn sync(
        &self,
        event: &InterviewDetails,
        _settings: &BTreeMap<String, String>,
    ) -> Result<Value, HireflowError> {
        Ok(json!({
            "title": event.title(),
            "description": description(event),
            "location": event.location,
            "start_time": event.start_time(),
            "end_time": event.end_time(),
            "attendees": event.interviewer.iter().map(|i| i.name()).collect::<Vec<_>>(),
        }))
    }
}

struct WechatWork;

#[async_trait]
impl CalendarProvider for WechatWork {
    fn name(&self) -> &str {
        "wechat_work"
    }

    fn required_settings(&self) -> &[&'static str] {
        &["corp_id", "secret"]
    }

    async fn sync(
        &self,
        event: &InterviewDetails,
        _settings: &BTreeMap<String, String>,
    ) -> Result<Value, HireflowError> {
        Ok(json!({
            "summary": event.title(),
            "description": description(event),
            "location": event.location,
            "start_time": event.start_time(),
            "end_time": event.end_time(),
            "attendees": event.interviewer.iter().map(|i| i.name()).collect::<Vec<_>>(),
        }))
    }
}

struct Outlook;

#[async_trait]
impl CalendarProvider for Outlook {
    fn name(&self) -> &str {
        "outlook"
    }

    fn required_settings(&self) -> &[&'static str] {
        &["client_id", "client_secret"]
    }

    async fn sync(
        &self,
        event: &InterviewDetails,
        settings: &BTreeMap<String, String>,
    ) -> Result<Value, HireflowError> {
        let time_zone = settings
            .get("time_zone")
            .map(String::as_str)
            .unwrap_or("China Standard Time");
        let attendees: Vec<Value> = event
            .interviewer
            .iter()
            .map(|i| {
                json!({
                    "emailAddress": {"address": i.email(), "name": i.name()},
                    "type": "required",
                })
            })
            .collect();
        Ok(json!({
            "subject": event.title(),
            "body": {
                "contentType": "HTML",
                "content": format!("<p>Candidate interview arrangement</p><p>{}</p>", event.process),
            },
            "location": {"displayName": event.location},
            "start": {"dateTime": event.start_time(), "timeZone": time_zone},
            "end": {"dateTime": event.end_time(), "timeZone": time_zone},
            "attendees": attendees,
        }))
    }
}

struct GoogleCalendar;

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    fn name(&self) -> &str {
        "google_calendar"
    }

    fn required_settings(&self) -> &[&'static str] {
        &["client_id", "client_secret"]
    }

    async fn sync(
        &self,
        event: &InterviewDetails,
        settings: &BTreeMap<String, String>,
    ) -> Result<Value, HireflowError> {
        let time_zone = settings
            .get("time_zone")
            .map(String::as_str)
            .unwrap_or("Asia/Shanghai");
        let attendees: Vec<Value> = event
            .interviewer
            .iter()
            .map(|i| json!({"email": i.email()}))
            .collect();
        Ok(json!({
            "summary": event.title(),
            "description": description(event),
            "location": event.location,
            "start": {"dateTime": event.start_time(), "timeZone": time_zone},
            "end": {"dateTime": event.end_time(), "timeZone": time_zone},
            "attendees": attendees,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Interviewer;

    fn event() -> InterviewDetails {
        InterviewDetails {
            position: Some("Platform Engineer".into()),
            interviewer: vec![
                Interviewer::Name("Li Wei".into()),
                Interviewer::Contact {
                    name: "Ana".into(),
                    email: "ana@example.com".into(),
                },
            ],
            ..InterviewDetails::default()
        }
    }

    fn provider(name: &str) -> Arc<dyn CalendarProvider> {
        builtin_providers()
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap()
    }

    #[tokio::test]
    async fn dingtalk_payload() {
        let payload = provider("dingtalk")
            .sync(&event(), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(payload["title"], "Interview: Platform Engineer");
        assert_eq!(payload["start_time"], "2023-01-10T10:00:00");
        assert_eq!(payload["end_time"], "2023-01-10T11:00:00");
        assert_eq!(payload["attendees"], json!(["Li Wei", "Ana"]));
    }

    #[tokio::test]
    async fn outlook_payload_uses_contacts_and_time_zone_setting() {
        let settings = BTreeMap::from([("time_zone".to_string(), "UTC".to_string())]);
        let payload = provider("outlook").sync(&event(), &settings).await.unwrap();
        assert_eq!(payload["start"]["timeZone"], "UTC");
        assert_eq!(
            payload["attendees"][1]["emailAddress"]["address"],
            "ana@example.com"
        );
        assert_eq!(payload["attendees"][0]["emailAddress"]["name"], "Li Wei");
    }

    #[test]
    fn required_settings_per_provider() {
        assert_eq!(provider("wechat_work").required_settings(), ["corp_id", "secret"]);
        assert_eq!(
            provider("google_calendar").required_settings(),
            ["client_id", "client_secret"]
        );
    }
}

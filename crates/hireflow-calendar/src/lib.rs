// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar fan-out for interview scheduling.
//!
//! An [`InterviewDetails`] event is dispatched concurrently to every
//! configured calendar integration. Each integration yields its own
//! [`SyncOutcome`]; one failing or slow target never affects the others.

pub mod event;
pub mod fanout;
pub mod providers;

pub use event::{InterviewDetails, Interviewer, TimeOption};
pub use fanout::{CalendarFanOut, SyncOutcome};
pub use providers::{builtin_providers, CalendarProvider};

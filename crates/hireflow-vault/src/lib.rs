// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential lifecycle manager for the Hireflow agent runtime.
//!
//! Stores per-service secrets with optional expiry and permission tags,
//! gates every read on expiry, records successful reads in a capped access
//! log, and answers usage and permission queries.

pub mod access_log;
pub mod manager;
pub mod record;

pub use access_log::{AccessLog, AccessLogEntry, UsageReport};
pub use manager::{Clock, CredentialManager};
pub use record::{mask_secret, CredentialRecord};

// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing between Hireflow agents.
//!
//! [`AgentRouter`] maps agent ids to handles and delivers `(action, data)`
//! requests to exactly one target, returning the handler's reply unchanged.

pub mod router;

pub use router::AgentRouter;

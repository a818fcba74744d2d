// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim workflow: the uniqueness-check / mint state machine.
//!
//! `session` holds the phase machine and its pure transition function;
//! `workflow` holds the async drivers that do the IO and feed it events.

pub mod session;
pub mod workflow;

pub use session::{Availability, ClaimError, ClaimEvent, ClaimPhase, ClaimSession};
pub use workflow::ClaimWorkflow;

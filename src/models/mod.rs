// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod progression;
pub mod quest;

pub use activity::ActivityRecord;
pub use progression::{AwardRecord, ProgressionSnapshot, Tier, XpAward};
pub use quest::{QuestDefinition, QuestRequirement};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily quest definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A day-scoped bonus objective from the static quest catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct QuestDefinition {
    /// Stable identifier (stored in `completed_quest_ids_today`)
    pub id: String,
    /// Display title (e.g. "Weekend Warrior")
    pub title: String,
    pub requirement: QuestRequirement,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub reward_xp: u64,
    /// Weekdays the quest is offered, 0 = Sunday .. 6 = Saturday
    pub active_weekdays: BTreeSet<u8>,
}

/// Minimums an activity must meet. Every present field must be satisfied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct QuestRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_meters: Option<f64>,
}

impl QuestRequirement {
    pub fn is_empty(&self) -> bool {
        self.distance_meters.is_none() && self.elevation_meters.is_none()
    }
}

impl QuestDefinition {
    /// Whether the quest is offered on the given weekday index.
    pub fn is_active_on(&self, weekday: u8) -> bool {
        self.active_weekdays.contains(&weekday)
    }
}

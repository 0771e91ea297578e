// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily quest evaluation.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::models::{ActivityRecord, QuestDefinition, QuestRequirement};
use crate::time_utils::weekday_index;

/// Quests completed by a single activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestOutcome {
    /// Completed quest IDs, in catalog order
    pub completed_ids: Vec<String>,
    pub bonus_xp: u64,
}

/// Quests offered on the weekday of `date`.
pub fn active_quests(
    catalog: &[QuestDefinition],
    date: DateTime<Utc>,
) -> impl Iterator<Item = &QuestDefinition> {
    let weekday = weekday_index(date);
    catalog.iter().filter(move |q| q.is_active_on(weekday))
}

/// Whether the activity satisfies every requirement the quest sets.
pub fn meets_requirement(activity: &ActivityRecord, requirement: &QuestRequirement) -> bool {
    let distance_ok = requirement
        .distance_meters
        .is_none_or(|min| activity.distance_meters >= min);
    let elevation_ok = requirement
        .elevation_meters
        .is_none_or(|min| activity.elevation_gain_meters >= min);
    distance_ok && elevation_ok
}

/// Match an activity against the quests active on its own date, skipping
/// any already completed today.
pub fn check_quests(
    catalog: &[QuestDefinition],
    activity: &ActivityRecord,
    completed_today: &BTreeSet<String>,
) -> QuestOutcome {
    let mut outcome = QuestOutcome::default();

    for quest in active_quests(catalog, activity.start_date) {
        if completed_today.contains(&quest.id) {
            continue;
        }
        if meets_requirement(activity, &quest.requirement) {
            outcome.bonus_xp = outcome.bonus_xp.saturating_add(quest.reward_xp);
            outcome.completed_ids.push(quest.id.clone());
        }
    }

    outcome
}

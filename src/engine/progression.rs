// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Applies one activity to a progression snapshot.
//!
//! Pure: the caller supplies the stored snapshot and the processing time,
//! and persists the returned snapshot. Order of operations:
//! 1. Anti-cheat veto (snapshot untouched)
//! 2. Base XP
//! 3. Streak bonus, gated by the streak state *before* this activity
//! 4. Daily XP and quest rollover at the processing day boundary
//! 5. Quest bonus
//! 6. Daily cap (today-dated activities only)
//! 7. Level, tier and streak update

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::engine::{anti_cheat, quests, streak, xp, EngineConfig};
use crate::models::{ActivityRecord, ProgressionSnapshot, XpAward};
use crate::time_utils::is_same_day;

/// Result of applying one activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionOutcome {
    pub award: XpAward,
    /// Snapshot to persist
    pub snapshot: ProgressionSnapshot,
    pub previous_level: u32,
    /// True when the anti-cheat filter vetoed the activity
    pub rejected: bool,
}

impl ProgressionOutcome {
    pub fn leveled_up(&self) -> bool {
        self.snapshot.level > self.previous_level
    }
}

fn stamped_today(stamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    stamp.is_some_and(|s| is_same_day(s, now))
}

/// Compute the award for `activity` and the snapshot that results from it.
pub fn apply_activity(
    config: &EngineConfig,
    snapshot: &ProgressionSnapshot,
    activity: &ActivityRecord,
    now: DateTime<Utc>,
) -> ProgressionOutcome {
    if anti_cheat::is_suspicious(activity, config) {
        return ProgressionOutcome {
            award: XpAward::default(),
            snapshot: snapshot.clone(),
            previous_level: snapshot.level,
            rejected: true,
        };
    }

    let base_xp = xp::calculate_base_xp(activity, config);
    let streak_bonus_xp = if snapshot.streak_active {
        streak::streak_bonus_xp(base_xp, config.streak.bonus_multiplier)
    } else {
        0
    };

    let activity_is_today = is_same_day(activity.start_date, now);

    let same_daily_window = stamped_today(snapshot.daily_xp_reset_date, now);
    let daily_xp_earned = if same_daily_window {
        snapshot.daily_xp_earned
    } else {
        0
    };

    let same_quest_day = stamped_today(snapshot.quest_reset_date, now);
    let mut completed_today = if same_quest_day {
        snapshot.completed_quest_ids_today.clone()
    } else {
        BTreeSet::new()
    };
    let quest_outcome = quests::check_quests(&config.quests, activity, &completed_today);

    let mut total_xp = base_xp
        .saturating_add(streak_bonus_xp)
        .saturating_add(quest_outcome.bonus_xp);
    let mut was_capped = false;
    if activity_is_today
        && config.daily_xp_cap > 0
        && daily_xp_earned.saturating_add(total_xp) > config.daily_xp_cap
    {
        total_xp = config.daily_xp_cap.saturating_sub(daily_xp_earned);
        was_capped = true;
    }

    let mut next = snapshot.clone();
    next.set_total_xp(snapshot.total_xp.saturating_add(total_xp), config);

    let streak_state = streak::update_streak(
        snapshot.last_activity_date,
        snapshot.streak_count,
        activity.start_date,
        config.streak.threshold,
    );
    next.streak_count = streak_state.count;
    next.streak_active = streak_state.active;
    next.last_activity_date = Some(activity.start_date);

    completed_today.extend(quest_outcome.completed_ids.iter().cloned());
    next.completed_quest_ids_today = completed_today;
    if !same_quest_day {
        next.quest_reset_date = Some(now);
    }

    next.daily_xp_earned = daily_xp_earned.saturating_add(total_xp);
    if !same_daily_window {
        next.daily_xp_reset_date = Some(now);
    }

    ProgressionOutcome {
        award: XpAward {
            base_xp,
            streak_bonus_xp,
            quest_bonus_xp: quest_outcome.bonus_xp,
            total_awarded_xp: total_xp,
            completed_quest_ids: quest_outcome.completed_ids,
            was_capped,
        },
        snapshot: next,
        previous_level: snapshot.level,
        rejected: false,
    }
}

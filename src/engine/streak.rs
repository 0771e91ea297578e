// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day streak tracking.

use chrono::{DateTime, Utc};

use crate::time_utils::calendar_day_diff;

/// Streak after an activity has been counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub count: u32,
    pub active: bool,
}

impl StreakState {
    const RESET: StreakState = StreakState {
        count: 1,
        active: false,
    };
}

/// Compute the streak after an activity at `activity_date`.
///
/// Same day keeps the count, the next day extends it, anything else
/// (a gap, or an activity dated before the last one) starts over at 1.
pub fn update_streak(
    last_activity_date: Option<DateTime<Utc>>,
    current_count: u32,
    activity_date: DateTime<Utc>,
    threshold: u32,
) -> StreakState {
    let Some(last) = last_activity_date else {
        return StreakState::RESET;
    };

    match calendar_day_diff(last, activity_date) {
        0 => StreakState {
            count: current_count,
            active: current_count >= threshold,
        },
        1 => {
            let count = current_count.saturating_add(1);
            StreakState {
                count,
                active: count >= threshold,
            }
        }
        _ => StreakState::RESET,
    }
}

/// Extra XP granted on top of `base_xp` while a streak is active.
///
/// Computed as `floor(base · multiplier) − base`, which equals
/// `floor(base · (multiplier − 1))` without the rounding error of `1.2 − 1`.
pub fn streak_bonus_xp(base_xp: u64, multiplier: f64) -> u64 {
    let boosted = (base_xp as f64 * multiplier).floor();
    if boosted.is_finite() && boosted > 0.0 {
        (boosted as u64).saturating_sub(base_xp)
    } else {
        0
    }
}

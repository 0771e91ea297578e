// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Base XP calculation from distance, moving time and elevation.

use crate::engine::config::EngineConfig;
use crate::models::ActivityRecord;

/// Base XP for an activity, before streak, quest and cap adjustments.
///
/// Distance-based classes earn per kilometer, time-based classes per
/// minute, unknown types nothing. The elevation bonus is always added.
/// The sum is truncated, never rounded.
pub fn calculate_base_xp(activity: &ActivityRecord, config: &EngineConfig) -> u64 {
    let class = config.activity_types.classify(&activity.sport_type);
    let rates = &config.rates;

    let effort_xp = match (rates.per_km(class), rates.per_minute(class)) {
        (Some(per_km), _) if activity.distance_meters > 0.0 => {
            (activity.distance_meters / 1000.0) * per_km
        }
        (_, Some(per_minute)) if activity.moving_time_seconds > 0 => {
            (f64::from(activity.moving_time_seconds) / 60.0) * per_minute
        }
        _ => 0.0,
    };
    let elevation_xp = activity.elevation_gain_meters.max(0.0) * rates.elevation_m;

    let total = (effort_xp + elevation_xp).floor();
    if total.is_finite() && total > 0.0 {
        total as u64
    } else {
        0
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plausibility check for incoming activities.

use crate::engine::config::{ActivityClass, EngineConfig};
use crate::models::ActivityRecord;

/// Flag activities whose recorded speed is implausible for their type.
///
/// Only running is checked. A flagged activity earns nothing at all.
pub fn is_suspicious(activity: &ActivityRecord, config: &EngineConfig) -> bool {
    let Some(speed_kmh) = activity.speed_kmh() else {
        return false;
    };

    config.activity_types.classify(&activity.sport_type) == ActivityClass::Running
        && speed_kmh > config.anti_cheat.max_running_speed_kmh
}

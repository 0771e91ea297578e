// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record as delivered by the activity-fetching collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// A single logged activity, already fetched from the tracking service.
///
/// Immutable once fetched. `sport_type` is matched case-sensitively
/// against the engine's activity-type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActivityRecord {
    /// Strava activity ID
    pub id: u64,
    /// Sport type (Run, Ride, Swim, etc.)
    #[validate(length(min = 1))]
    pub sport_type: String,
    /// Distance in meters
    #[validate(range(min = 0.0))]
    pub distance_meters: f64,
    /// Moving time in seconds
    pub moving_time_seconds: u32,
    /// Total elevation gain in meters
    #[validate(range(min = 0.0))]
    pub elevation_gain_meters: f64,
    /// Start date/time
    pub start_date: DateTime<Utc>,
}

impl ActivityRecord {
    /// Reject malformed records before they reach the engine.
    pub fn check(&self) -> Result<(), AppError> {
        if !self.distance_meters.is_finite() || !self.elevation_gain_meters.is_finite() {
            return Err(AppError::InvalidActivity {
                activity_id: self.id,
                reason: "distance and elevation must be finite".to_string(),
            });
        }
        self.validate().map_err(|e| AppError::InvalidActivity {
            activity_id: self.id,
            reason: e.to_string(),
        })
    }

    /// Average speed in km/h, or `None` when distance or time is zero.
    pub fn speed_kmh(&self) -> Option<f64> {
        if self.distance_meters <= 0.0 || self.moving_time_seconds == 0 {
            return None;
        }
        Some((self.distance_meters / 1000.0) / (f64::from(self.moving_time_seconds) / 3600.0))
    }
}

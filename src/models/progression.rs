// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user progression state and XP award results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::engine::{leveling, EngineConfig};

/// Coarse character rank derived from level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub enum Tier {
    #[default]
    Novice,
    Apprentice,
    Expert,
    Master,
}

/// Persisted progression state, one document per athlete.
///
/// Stored at: `progression/{athlete_id}`
///
/// `level`, `current_level_xp`, `next_level_xp_required` and `tier` are
/// always derived from `total_xp`; they are stored for cheap reads only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct ProgressionSnapshot {
    // ─── Leveling ────────────────────────────────────────────────
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_xp: u64,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub current_level_xp: u64,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub next_level_xp_required: u64,
    #[serde(default)]
    pub tier: Tier,

    // ─── Streak ──────────────────────────────────────────────────
    #[serde(default)]
    pub streak_count: u32,
    #[serde(default)]
    pub streak_active: bool,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub last_activity_date: Option<DateTime<Utc>>,

    // ─── Daily Cap ───────────────────────────────────────────────
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub daily_xp_earned: u64,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub daily_xp_reset_date: Option<DateTime<Utc>>,

    // ─── Daily Quests ────────────────────────────────────────────
    #[serde(default)]
    pub completed_quest_ids_today: BTreeSet<String>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub quest_reset_date: Option<DateTime<Utc>>,
}

fn first_level() -> u32 {
    1
}

impl ProgressionSnapshot {
    /// Snapshot for a brand-new athlete.
    pub fn initial(config: &EngineConfig) -> Self {
        Self {
            total_xp: 0,
            level: 1,
            current_level_xp: 0,
            next_level_xp_required: config.curve.xp_required_for_level(2),
            tier: Tier::Novice,
            streak_count: 0,
            streak_active: false,
            last_activity_date: None,
            daily_xp_earned: 0,
            daily_xp_reset_date: None,
            completed_quest_ids_today: BTreeSet::new(),
            quest_reset_date: None,
        }
    }

    /// Set `total_xp` and re-derive level, in-level XP and tier from it.
    ///
    /// Totals beyond what the curve can express are clamped.
    pub fn set_total_xp(&mut self, total_xp: u64, config: &EngineConfig) {
        let total_xp = total_xp.min(config.curve.max_total_xp());
        let resolved = leveling::resolve_level(&config.curve, total_xp);
        self.total_xp = total_xp;
        self.level = resolved.level;
        self.current_level_xp = resolved.current_level_xp;
        self.next_level_xp_required = resolved.next_level_xp_required;
        self.tier = config.tiers.tier_for_level(resolved.level);
    }
}

/// XP breakdown for one processed activity. Not persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct XpAward {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub base_xp: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub streak_bonus_xp: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub quest_bonus_xp: u64,
    /// Sum of the components after the daily cap was applied
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_awarded_xp: u64,
    pub completed_quest_ids: Vec<String>,
    pub was_capped: bool,
}

/// Award history entry, one per processed activity.
///
/// Stored at: `xp_awards/{activity_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub athlete_id: u64,
    pub activity_id: u64,
    pub sport_type: String,
    pub start_date: DateTime<Utc>,
    pub award: XpAward,
    /// True when the anti-cheat filter vetoed the activity
    pub rejected: bool,
    pub level_after: u32,
    pub total_xp_after: u64,
    /// When this award was computed (RFC3339)
    pub processed_at: String,
}

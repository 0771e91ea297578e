// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine configuration: rate tables, activity-type classification,
//! thresholds and the daily quest catalog.
//!
//! Loaded once at startup and shared read-only. Every field has a default,
//! so a config file only needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::engine::leveling::{LevelCurve, TierBreakpoints};
use crate::models::{QuestDefinition, QuestRequirement};

/// Number of leading levels checked for a strictly increasing curve.
const CURVE_CHECK_LEVELS: u32 = 500;

/// Complete gamification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub curve: LevelCurve,
    pub tiers: TierBreakpoints,
    pub rates: XpRates,
    pub activity_types: ActivityTypeTable,
    pub anti_cheat: AntiCheatConfig,
    pub streak: StreakConfig,
    /// Maximum XP per calendar day (0 disables the cap)
    pub daily_xp_cap: u64,
    pub quests: Vec<QuestDefinition>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve: LevelCurve::default(),
            tiers: TierBreakpoints::default(),
            rates: XpRates::default(),
            activity_types: ActivityTypeTable::default(),
            anti_cheat: AntiCheatConfig::default(),
            streak: StreakConfig::default(),
            daily_xp_cap: 5000,
            quests: default_quest_catalog(),
        }
    }
}

/// XP per unit for each activity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpRates {
    pub running_km: f64,
    pub walking_km: f64,
    pub cycling_km: f64,
    pub xc_ski_km: f64,
    pub downhill_ski_km: f64,
    pub swim_km: f64,
    pub workout_min: f64,
    pub yoga_min: f64,
    pub elevation_m: f64,
}

impl Default for XpRates {
    fn default() -> Self {
        Self {
            running_km: 100.0,
            walking_km: 60.0,
            cycling_km: 40.0,
            xc_ski_km: 80.0,
            downhill_ski_km: 30.0,
            swim_km: 300.0,
            workout_min: 5.0,
            yoga_min: 3.0,
            elevation_m: 2.0,
        }
    }
}

impl XpRates {
    /// Per-kilometer rate for distance-based classes.
    pub fn per_km(&self, class: ActivityClass) -> Option<f64> {
        match class {
            ActivityClass::Running => Some(self.running_km),
            ActivityClass::Walking => Some(self.walking_km),
            ActivityClass::Cycling => Some(self.cycling_km),
            ActivityClass::CrossCountrySki => Some(self.xc_ski_km),
            ActivityClass::DownhillSki => Some(self.downhill_ski_km),
            ActivityClass::Swimming => Some(self.swim_km),
            ActivityClass::Workout | ActivityClass::Yoga | ActivityClass::Other => None,
        }
    }

    /// Per-minute rate for time-based classes.
    pub fn per_minute(&self, class: ActivityClass) -> Option<f64> {
        match class {
            ActivityClass::Workout => Some(self.workout_min),
            ActivityClass::Yoga => Some(self.yoga_min),
            _ => None,
        }
    }

    fn all(&self) -> [(&'static str, f64); 9] {
        [
            ("running_km", self.running_km),
            ("walking_km", self.walking_km),
            ("cycling_km", self.cycling_km),
            ("xc_ski_km", self.xc_ski_km),
            ("downhill_ski_km", self.downhill_ski_km),
            ("swim_km", self.swim_km),
            ("workout_min", self.workout_min),
            ("yoga_min", self.yoga_min),
            ("elevation_m", self.elevation_m),
        ]
    }
}

/// Activity classification used to pick a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityClass {
    Running,
    Walking,
    Cycling,
    CrossCountrySki,
    DownhillSki,
    Swimming,
    Workout,
    Yoga,
    /// Type not listed in any set
    Other,
}

/// Case-sensitive sport-type names per class. Sets must not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityTypeTable {
    pub running: Vec<String>,
    pub walking: Vec<String>,
    pub cycling: Vec<String>,
    pub xc_ski: Vec<String>,
    pub downhill_ski: Vec<String>,
    pub swimming: Vec<String>,
    pub workout: Vec<String>,
    pub yoga: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ActivityTypeTable {
    fn default() -> Self {
        Self {
            running: names(&["Run", "TrailRun", "VirtualRun"]),
            walking: names(&["Walk", "Hike", "Snowshoe"]),
            cycling: names(&[
                "Ride",
                "VirtualRide",
                "MountainBikeRide",
                "GravelRide",
                "EBikeRide",
                "EMountainBikeRide",
                "Handcycle",
                "Velomobile",
            ]),
            xc_ski: names(&["NordicSki", "BackcountrySki", "RollerSki"]),
            downhill_ski: names(&["AlpineSki", "Snowboard"]),
            swimming: names(&["Swim"]),
            workout: names(&[
                "Workout",
                "WeightTraining",
                "Crossfit",
                "HighIntensityIntervalTraining",
                "Elliptical",
                "StairStepper",
                "Rowing",
            ]),
            yoga: names(&["Yoga", "Pilates"]),
        }
    }
}

impl ActivityTypeTable {
    fn classes(&self) -> [(ActivityClass, &[String]); 8] {
        [
            (ActivityClass::Running, self.running.as_slice()),
            (ActivityClass::Walking, self.walking.as_slice()),
            (ActivityClass::Cycling, self.cycling.as_slice()),
            (ActivityClass::CrossCountrySki, self.xc_ski.as_slice()),
            (ActivityClass::DownhillSki, self.downhill_ski.as_slice()),
            (ActivityClass::Swimming, self.swimming.as_slice()),
            (ActivityClass::Workout, self.workout.as_slice()),
            (ActivityClass::Yoga, self.yoga.as_slice()),
        ]
    }

    /// Classify a sport type. First matching set wins.
    pub fn classify(&self, sport_type: &str) -> ActivityClass {
        self.classes()
            .into_iter()
            .find(|(_, members)| members.iter().any(|m| m == sport_type))
            .map(|(class, _)| class)
            .unwrap_or(ActivityClass::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntiCheatConfig {
    /// Running activities faster than this are vetoed
    pub max_running_speed_kmh: f64,
}

impl Default for AntiCheatConfig {
    fn default() -> Self {
        Self {
            max_running_speed_kmh: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Consecutive days needed before the bonus applies
    pub threshold: u32,
    /// Multiplier applied to base XP while the streak is active
    pub bonus_multiplier: f64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            bonus_multiplier: 1.2,
        }
    }
}

fn quest(
    id: &str,
    title: &str,
    req: QuestRequirement,
    reward_xp: u64,
    days: &[u8],
) -> QuestDefinition {
    QuestDefinition {
        id: id.to_string(),
        title: title.to_string(),
        requirement: req,
        reward_xp,
        active_weekdays: days.iter().copied().collect::<BTreeSet<u8>>(),
    }
}

fn distance(meters: f64) -> QuestRequirement {
    QuestRequirement {
        distance_meters: Some(meters),
        elevation_meters: None,
    }
}

fn elevation(meters: f64) -> QuestRequirement {
    QuestRequirement {
        distance_meters: None,
        elevation_meters: Some(meters),
    }
}

/// Built-in quest catalog. Weekdays: 0 = Sunday .. 6 = Saturday.
pub fn default_quest_catalog() -> Vec<QuestDefinition> {
    vec![
        quest("weekend_warrior", "Weekend Warrior", distance(10_000.0), 200, &[0, 6]),
        quest("monday_kickoff", "Monday Kickoff", distance(5_000.0), 100, &[1]),
        quest("tempo_tuesday", "Tempo Tuesday", distance(8_000.0), 120, &[2]),
        quest("hump_day_climb", "Hump Day Climb", elevation(200.0), 150, &[3]),
        quest("thursday_summit", "Thursday Summit", elevation(400.0), 180, &[4]),
        quest("friday_five", "Friday Five", distance(5_000.0), 100, &[5]),
    ]
}

impl EngineConfig {
    /// Load engine config from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineConfigError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| EngineConfigError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load engine config from a JSON string and validate it.
    pub fn load_from_json(json_data: &str) -> Result<Self, EngineConfigError> {
        let config: EngineConfig = serde_json::from_str(json_data)
            .map_err(|e| EngineConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        tracing::info!(
            quests = config.quests.len(),
            daily_xp_cap = config.daily_xp_cap,
            "Loaded engine config"
        );
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        let invalid = |msg: String| Err(EngineConfigError::Invalid(msg));

        match self.curve {
            LevelCurve::Quadratic { a, b } if a == 0 && b == 0 => {
                return invalid("quadratic curve needs a > 0 or b > 0".to_string());
            }
            LevelCurve::PowerLaw { base, exponent }
                if !(base.is_finite() && base > 0.0 && exponent.is_finite() && exponent > 0.0) =>
            {
                return invalid("power-law curve needs positive base and exponent".to_string());
            }
            _ => {}
        }
        let mut previous = self.curve.xp_required_for_level(1);
        for level in 2..=CURVE_CHECK_LEVELS {
            let required = self.curve.xp_required_for_level(level);
            if required <= previous {
                return invalid(format!("level curve is not increasing at level {}", level));
            }
            previous = required;
        }

        if !(self.tiers.apprentice <= self.tiers.expert && self.tiers.expert <= self.tiers.master) {
            return invalid("tier breakpoints must be ordered".to_string());
        }

        for (name, rate) in self.rates.all() {
            if !rate.is_finite() || rate < 0.0 {
                return invalid(format!("rate {} must be a non-negative number", name));
            }
        }

        let mut seen_types = HashSet::new();
        for (_, members) in self.activity_types.classes() {
            for name in members {
                if !seen_types.insert(name.as_str()) {
                    return invalid(format!("activity type {} is listed in two classes", name));
                }
            }
        }

        if !(self.anti_cheat.max_running_speed_kmh > 0.0) {
            return invalid("max_running_speed_kmh must be positive".to_string());
        }
        if !(self.streak.bonus_multiplier >= 1.0) || !self.streak.bonus_multiplier.is_finite() {
            return invalid("streak bonus_multiplier must be at least 1.0".to_string());
        }

        let mut seen_ids = HashSet::new();
        for quest in &self.quests {
            if !seen_ids.insert(quest.id.as_str()) {
                return invalid(format!("duplicate quest id {}", quest.id));
            }
            if quest.reward_xp == 0 {
                return invalid(format!("quest {} has no reward", quest.id));
            }
            if quest.requirement.is_empty() {
                return invalid(format!("quest {} has no requirement", quest.id));
            }
            let thresholds = [
                quest.requirement.distance_meters,
                quest.requirement.elevation_meters,
            ];
            if thresholds
                .into_iter()
                .flatten()
                .any(|min| !min.is_finite() || min < 0.0)
            {
                return invalid(format!(
                    "quest {} requirement must be a non-negative number",
                    quest.id
                ));
            }
            if let Some(day) = quest.active_weekdays.iter().find(|d| **d > 6) {
                return invalid(format!("quest {} has invalid weekday {}", quest.id, day));
            }
        }

        Ok(())
    }
}

/// Errors from engine config loading.
#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse engine config: {0}")]
    ParseError(String),

    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let table = ActivityTypeTable::default();
        assert_eq!(table.classify("Run"), ActivityClass::Running);
        assert_eq!(table.classify("TrailRun"), ActivityClass::Running);
        assert_eq!(table.classify("run"), ActivityClass::Other);
        assert_eq!(table.classify("GravelRide"), ActivityClass::Cycling);
        assert_eq!(table.classify("Yoga"), ActivityClass::Yoga);
        assert_eq!(table.classify("Kitesurf"), ActivityClass::Other);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::load_from_json(r#"{"daily_xp_cap": 500, "rates": {"running_km": 10}}"#)
                .unwrap();
        assert_eq!(config.daily_xp_cap, 500);
        assert_eq!(config.rates.running_km, 10.0);
        assert_eq!(config.rates.elevation_m, 2.0);
        assert_eq!(config.streak.threshold, 3);
        assert_eq!(config.quests.len(), 6);
    }

    #[test]
    fn test_power_law_curve_from_json() {
        let config = EngineConfig::load_from_json(
            r#"{"curve": {"kind": "power_law", "base": 500.0, "exponent": 1.5}}"#,
        )
        .unwrap();
        assert_eq!(config.curve.xp_required_for_level(2), 1414);
    }

    #[test]
    fn test_rejects_overlapping_type_sets() {
        let mut config = EngineConfig::default();
        config.activity_types.walking.push("Run".to_string());
        assert!(matches!(
            config.validate(),
            Err(EngineConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_flat_power_curve() {
        let mut config = EngineConfig::default();
        config.curve = LevelCurve::PowerLaw {
            base: 1.0,
            exponent: 0.1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_quests() {
        let mut config = EngineConfig::default();
        config.quests.push(config.quests[0].clone());
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.quests[0].active_weekdays.insert(7);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.quests[0].requirement = QuestRequirement::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_quest_thresholds() {
        for bad in [f64::NAN, f64::INFINITY, -5.0] {
            let mut config = EngineConfig::default();
            config.quests[0].requirement.distance_meters = Some(bad);
            assert!(config.validate().is_err(), "distance {} accepted", bad);

            let mut config = EngineConfig::default();
            config.quests[0].requirement.elevation_meters = Some(bad);
            assert!(config.validate().is_err(), "elevation {} accepted", bad);
        }
    }

    #[test]
    fn test_rejects_unordered_tiers() {
        let mut config = EngineConfig::default();
        config.tiers.expert = 60;
        assert!(matches!(
            config.validate(),
            Err(EngineConfigError::Invalid(msg)) if msg.contains("tier")
        ));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let mut config = EngineConfig::default();
        config.rates.cycling_km = -1.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.rates.yoga_min = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.rates.elevation_m = 0.0;
        config.validate().expect("zero rate is allowed");
    }

    #[test]
    fn test_rejects_non_positive_max_speed() {
        for bad in [0.0, -10.0, f64::NAN] {
            let mut config = EngineConfig::default();
            config.anti_cheat.max_running_speed_kmh = bad;
            assert!(config.validate().is_err(), "max speed {} accepted", bad);
        }
    }

    #[test]
    fn test_rejects_multiplier_below_one() {
        let mut config = EngineConfig::default();
        config.streak.bonus_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            EngineConfig::load_from_json("not json"),
            Err(EngineConfigError::ParseError(_))
        ));
    }
}

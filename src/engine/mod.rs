// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gamification engine: pure functions turning an activity and a stored
//! progression snapshot into an XP award and a new snapshot.

pub mod anti_cheat;
pub mod config;
pub mod leveling;
pub mod progression;
pub mod quests;
pub mod streak;
pub mod xp;

pub use config::{EngineConfig, EngineConfigError};
pub use progression::{apply_activity, ProgressionOutcome};

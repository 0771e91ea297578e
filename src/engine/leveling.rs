// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Level curve, level resolution and tier breakpoints.
//!
//! Thresholds are cumulative: `xp_required_for_level(n)` is the total XP at
//! which a character reaches level `n`. Level 1 always starts at 0.

use serde::{Deserialize, Serialize};

use crate::models::Tier;

/// Highest reachable level. XP beyond the start of the next level is
/// clamped, see [`LevelCurve::max_total_xp`].
pub const MAX_LEVEL: u32 = u32::MAX - 1;

/// Cumulative XP curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelCurve {
    /// `floor(a·level² + b·level)`
    Quadratic { a: u64, b: u64 },
    /// `floor(base · level^exponent)`
    PowerLaw { base: f64, exponent: f64 },
}

impl Default for LevelCurve {
    fn default() -> Self {
        LevelCurve::Quadratic { a: 100, b: 300 }
    }
}

impl LevelCurve {
    /// Total XP needed to reach `level`. Zero for level 1 and below.
    pub fn xp_required_for_level(&self, level: u32) -> u64 {
        if level <= 1 {
            return 0;
        }
        let l = u64::from(level);
        match *self {
            LevelCurve::Quadratic { a, b } => a
                .saturating_mul(l)
                .saturating_mul(l)
                .saturating_add(b.saturating_mul(l)),
            // `as` saturates on overflow and maps NaN to 0
            LevelCurve::PowerLaw { base, exponent } => {
                (base * (l as f64).powf(exponent)).floor() as u64
            }
        }
    }

    /// Largest total XP the curve can express.
    ///
    /// One below the threshold of the level after `MAX_LEVEL`, or one below
    /// `u64::MAX` when the curve saturates first. Totals above this resolve
    /// as if they were this value.
    pub fn max_total_xp(&self) -> u64 {
        self.xp_required_for_level(MAX_LEVEL + 1).saturating_sub(1)
    }
}

/// Level and in-level progress derived from a total XP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLevel {
    pub level: u32,
    /// XP earned since reaching `level`
    pub current_level_xp: u64,
    /// XP span between `level` and `level + 1`
    pub next_level_xp_required: u64,
}

/// Resolve the level for `total_xp`: the largest level whose threshold is
/// at most `total_xp`, found by binary search.
///
/// `total_xp` is clamped to [`LevelCurve::max_total_xp`], so the next
/// threshold is always strictly above it and `current_level_xp <
/// next_level_xp_required` holds for every input. Relies on the curve being
/// non-decreasing.
pub fn resolve_level(curve: &LevelCurve, total_xp: u64) -> ResolvedLevel {
    let total_xp = total_xp.min(curve.max_total_xp());

    // Invariant: threshold(lo) <= total_xp < threshold(hi + 1)
    let (mut lo, mut hi) = (1u32, MAX_LEVEL);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if curve.xp_required_for_level(mid) <= total_xp {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let floor = curve.xp_required_for_level(lo);
    let next = curve.xp_required_for_level(lo + 1);
    ResolvedLevel {
        level: lo,
        current_level_xp: total_xp.saturating_sub(floor),
        next_level_xp_required: next.saturating_sub(floor),
    }
}

/// Minimum level for each tier above Novice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBreakpoints {
    pub apprentice: u32,
    pub expert: u32,
    pub master: u32,
}

impl Default for TierBreakpoints {
    fn default() -> Self {
        Self {
            apprentice: 10,
            expert: 25,
            master: 50,
        }
    }
}

impl TierBreakpoints {
    pub fn tier_for_level(&self, level: u32) -> Tier {
        if level >= self.master {
            Tier::Master
        } else if level >= self.expert {
            Tier::Expert
        } else if level >= self.apprentice {
            Tier::Apprentice
        } else {
            Tier::Novice
        }
    }
}

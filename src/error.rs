// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Application error type shared by the store and service layers.
///
/// Anti-cheat rejections are not errors; they produce a zero award.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid activity {activity_id}: {reason}")]
    InvalidActivity { activity_id: u64, reason: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::InvalidActivity { .. })
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

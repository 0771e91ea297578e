// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EnduranceRPG: gamified progression for Strava activities
//!
//! This crate turns logged activities into experience points, levels,
//! streak bonuses and daily quest rewards, and persists each athlete's
//! progression snapshot.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

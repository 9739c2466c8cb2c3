// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for capstone scheduler integration tests.
//!
//! Provides an in-memory portal and record fixtures for fast, deterministic
//! tests without a running portal service.
//!
//! # Components
//!
//! - [`InMemoryPortal`] - All three stores backed by maps, with injectable failures
//! - [`fixtures`] - Catalog, free-time, and session builders

pub mod fixtures;
pub mod portal;

pub use portal::InMemoryPortal;

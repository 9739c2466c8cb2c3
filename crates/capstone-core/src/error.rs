// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the capstone meeting scheduler.

use thiserror::Error;

/// The primary error type shared by the schedule core, the store traits and
/// the remote adapter.
///
/// Validation variants are recoverable by the user (fix the field and retry);
/// `Remote` wraps failures of the external system of record.
#[derive(Debug, Error)]
pub enum CapstoneError {
    /// A slot's start time is not strictly before its end time.
    #[error("invalid time range: start {start} must be before end {end}")]
    InvalidRange { start: String, end: String },

    /// A slot label is blank after trimming.
    #[error("slot label must not be empty")]
    EmptyLabel,

    /// Another active slot in the catalog already uses this name (case-insensitive).
    #[error("a slot named `{name}` already exists")]
    DuplicateName { name: String },

    /// The slot's time range intersects another active slot.
    #[error("`{name}` overlaps the existing slot `{conflicting}`")]
    Overlap { name: String, conflicting: String },

    /// A slot id does not resolve to an active slot of the catalog.
    #[error("unknown or inactive slot: {slot_id}")]
    UnknownSlot { slot_id: String },

    /// Time-of-day or day-of-week text could not be understood.
    #[error("cannot parse `{input}`: {reason}")]
    Parse { input: String, reason: String },

    /// A meeting record cannot be finalized because a required field is missing.
    #[error("meeting is missing required field `{field}`")]
    IncompleteMeeting { field: &'static str },

    /// The group's meeting is finalized, so availability can no longer change.
    #[error("meeting schedule for group {group_id} is finalized")]
    MeetingLocked { group_id: String },

    /// A student tried to change another student's availability.
    #[error("{actor} cannot change the availability of {owner}")]
    NotOwner { owner: String, actor: String },

    /// The remote system of record failed or returned an error.
    #[error("remote error: {message}")]
    Remote {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CapstoneError {
    /// Builds a [`CapstoneError::Parse`] from the offending input.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`CapstoneError::Remote`] without an underlying cause.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures the user can correct by editing input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::EmptyLabel
                | Self::DuplicateName { .. }
                | Self::Overlap { .. }
                | Self::UnknownSlot { .. }
                | Self::Parse { .. }
                | Self::IncompleteMeeting { .. }
        )
    }
}

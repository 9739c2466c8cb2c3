// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schedule engine for the capstone meeting scheduler.
//!
//! Campus administrators maintain a [`SlotCatalog`] of named, non-overlapping
//! daily time slots. Students mark the slots they are free for on each day
//! ([`AvailabilitySet`]); the group's selections are merged and ranked by how
//! many members share them ([`merge_schedules`], [`suggest`]), and one result
//! is finalized as the group's meeting ([`accept`]).
//!
//! Everything except [`SchedulePlanner`] is synchronous and side-effect free.

pub mod availability;
pub mod batch;
pub mod catalog;
pub mod consensus;
pub mod finalization;
pub mod planner;
pub mod slot;
pub mod time;

pub use availability::AvailabilitySet;
pub use batch::{BatchReport, DraftIssue, SlotBatch, SlotDraft, SlotField};
pub use catalog::SlotCatalog;
pub use consensus::{
    DEFAULT_SUGGESTION_LIMIT, GroupAvailability, MIN_SUPPORT, MergedSchedule, Suggestion,
    SuggestionPolicy, merge_schedules, suggest, suggest_week, suggest_with,
};
pub use finalization::{
    FinalizationState, FinalizedMeeting, MeetingProposal, accept, is_finalized,
};
pub use planner::{SchedulePlanner, SubmitOutcome};
pub use slot::{ScheduledSlot, SlotCandidate, TimeSlot};
pub use time::{
    DayAliases, MINUTES_PER_DAY, format_clock_time, format_clock_time_24h, normalize_week_day,
    parse_clock_time,
};

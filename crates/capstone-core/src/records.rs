// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire records exchanged with the portal's system of record.
//!
//! Field names follow the remote API (camelCase). Time values are kept as the
//! raw text the API sends; the schedule crate parses them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MeetingId, SlotId, StudentId};

/// One entry of a campus slot catalog feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub id: SlotId,
    pub name: String,
    pub start_at: String,
    pub end_at: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A newly added slot handed to the catalog mutation sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlotRecord {
    pub name_slot: String,
    pub start_at: String,
    pub end_at: String,
}

/// Outcome reported by a mutation sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl MutationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A slot as embedded in the free-time read feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTimeSlotRecord {
    pub id: SlotId,
    pub name_slot: String,
    pub start_at: String,
    pub end_at: String,
}

/// One day of a student's free time in the read feed.
///
/// `day_of_week` is free text; it may be a locale variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTimeDayRecord {
    pub day_of_week: String,
    #[serde(default)]
    pub time_slots: Vec<FreeTimeSlotRecord>,
}

/// All free time reported by one student of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFreeTimeRecord {
    pub student_id: StudentId,
    #[serde(default)]
    pub free_time_slots: Vec<FreeTimeDayRecord>,
}

/// One day of a student's full replacement write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayFreeTimeRecord {
    pub day_of_week: String,
    pub slots: Vec<SlotId>,
}

/// Meeting finalization record as stored remotely.
///
/// Every field except `is_active` may be absent on partially written records.
/// The schedule label arrives as either `time` or `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    #[serde(default)]
    pub id: Option<MeetingId>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default, alias = "slot")]
    pub time: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub create_at: Option<DateTime<Utc>>,
}

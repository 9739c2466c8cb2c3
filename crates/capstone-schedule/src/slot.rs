// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time slot value types.

use serde::{Deserialize, Serialize};

use capstone_core::records::{FreeTimeSlotRecord, NewSlotRecord, SlotRecord};
use capstone_core::{CampusId, CapstoneError, SlotId};

use crate::time::{format_clock_time, format_clock_time_24h, parse_clock_time};

/// Prefix every slot display name carries.
pub const SLOT_NAME_PREFIX: &str = "Slot ";

/// Builds the display name for a user-supplied label.
pub fn display_name(label: &str) -> String {
    format!("{SLOT_NAME_PREFIX}{}", label.trim())
}

/// Recovers the user-editable label from a display name.
pub fn label_of(name: &str) -> &str {
    let name = name.trim();
    match name.get(..SLOT_NAME_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SLOT_NAME_PREFIX) => {
            name[SLOT_NAME_PREFIX.len()..].trim_start()
        }
        _ => name,
    }
}

/// Half-open overlap test on `[start, end)` ranges.
pub fn ranges_overlap(a: (u16, u16), b: (u16, u16)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

/// A named, campus-scoped meeting window `[start_minutes, end_minutes)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub campus_id: CampusId,
    pub name: String,
    pub start_minutes: u16,
    pub end_minutes: u16,
    pub is_active: bool,
}

impl TimeSlot {
    /// Converts a catalog feed entry, parsing both time formats.
    pub fn from_record(campus_id: &CampusId, record: &SlotRecord) -> Result<Self, CapstoneError> {
        let start_minutes = parse_clock_time(&record.start_at)?;
        let end_minutes = parse_clock_time(&record.end_at)?;
        if start_minutes >= end_minutes {
            return Err(CapstoneError::InvalidRange {
                start: record.start_at.clone(),
                end: record.end_at.clone(),
            });
        }
        Ok(Self {
            id: record.id.clone(),
            campus_id: campus_id.clone(),
            name: record.name.trim().to_string(),
            start_minutes,
            end_minutes,
            is_active: record.is_active,
        })
    }

    /// The user-editable part of the name.
    pub fn label(&self) -> &str {
        label_of(&self.name)
    }

    pub fn range(&self) -> (u16, u16) {
        (self.start_minutes, self.end_minutes)
    }

    /// `"7:00 AM - 9:00 AM"`.
    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            format_clock_time(self.start_minutes),
            format_clock_time(self.end_minutes)
        )
    }

    pub fn to_record(&self) -> SlotRecord {
        SlotRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            start_at: format_clock_time_24h(self.start_minutes),
            end_at: format_clock_time_24h(self.end_minutes),
            is_active: self.is_active,
        }
    }

    pub fn summary(&self) -> ScheduledSlot {
        ScheduledSlot {
            id: self.id.clone(),
            name: self.name.clone(),
            start_minutes: self.start_minutes,
            end_minutes: self.end_minutes,
        }
    }
}

/// A proposed slot before it is stored: label and parsed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub label: String,
    pub start_minutes: u16,
    pub end_minutes: u16,
}

impl SlotCandidate {
    pub fn new(label: impl Into<String>, start_minutes: u16, end_minutes: u16) -> Self {
        Self {
            label: label.into(),
            start_minutes,
            end_minutes,
        }
    }

    /// Parses start and end from either supported time format.
    pub fn parse(label: &str, start_at: &str, end_at: &str) -> Result<Self, CapstoneError> {
        Ok(Self::new(
            label,
            parse_clock_time(start_at)?,
            parse_clock_time(end_at)?,
        ))
    }

    pub fn display_name(&self) -> String {
        display_name(&self.label)
    }

    pub fn range(&self) -> (u16, u16) {
        (self.start_minutes, self.end_minutes)
    }

    /// Payload for the catalog mutation sink.
    pub fn to_new_record(&self) -> NewSlotRecord {
        NewSlotRecord {
            name_slot: self.display_name(),
            start_at: format_clock_time_24h(self.start_minutes),
            end_at: format_clock_time_24h(self.end_minutes),
        }
    }
}

/// A slot as seen by the consensus engine: no campus, no activity flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledSlot {
    pub id: SlotId,
    pub name: String,
    pub start_minutes: u16,
    pub end_minutes: u16,
}

impl ScheduledSlot {
    /// Converts a free-time feed entry, parsing both time formats.
    pub fn from_record(record: &FreeTimeSlotRecord) -> Result<Self, CapstoneError> {
        Ok(Self {
            id: record.id.clone(),
            name: record.name_slot.trim().to_string(),
            start_minutes: parse_clock_time(&record.start_at)?,
            end_minutes: parse_clock_time(&record.end_at)?,
        })
    }

    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            format_clock_time(self.start_minutes),
            format_clock_time(self.end_minutes)
        )
    }
}

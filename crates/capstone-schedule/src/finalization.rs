// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The group's authoritative meeting record and the Open → Finalized gate.
//!
//! There is no way back to `Open`: accepting again while finalized
//! overwrites the record (last write wins).

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use capstone_core::records::MeetingRecord;
use capstone_core::{CapstoneError, GroupId, MeetingId, SessionContext, WeekDay};

use crate::consensus::Suggestion;
use crate::time::{DayAliases, format_clock_time, parse_clock_time};

/// A group's meeting schedule as stored. Optional fields model records left
/// half-written by upstream failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedMeeting {
    pub id: Option<MeetingId>,
    pub group_id: GroupId,
    pub day: Option<WeekDay>,
    pub slot_or_time_label: Option<String>,
    pub meeting_link: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FinalizedMeeting {
    /// Reads a stored record. An unreadable day is kept as missing.
    pub fn from_record(group_id: GroupId, record: &MeetingRecord, aliases: &DayAliases) -> Self {
        let day = record.day_of_week.as_deref().and_then(|text| {
            aliases
                .normalize(text)
                .inspect_err(|err| warn!(group_id = %group_id, error = %err, "meeting day unreadable"))
                .ok()
        });
        Self {
            id: record.id.clone(),
            group_id,
            day,
            slot_or_time_label: record.time.clone(),
            meeting_link: record.meeting_link.clone(),
            is_active: record.is_active,
            created_by: record.created_by_name.clone(),
            created_at: record.create_at,
        }
    }

    pub fn to_record(&self) -> MeetingRecord {
        MeetingRecord {
            id: self.id.clone(),
            is_active: self.is_active,
            meeting_link: self.meeting_link.clone(),
            time: self.slot_or_time_label.clone(),
            day_of_week: self.day.map(|d| d.to_string()),
            created_by_name: self.created_by.clone(),
            create_at: self.created_at,
        }
    }
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// True only for an active record with a link, a schedule label and a day.
pub fn is_finalized(meeting: Option<&FinalizedMeeting>) -> bool {
    meeting.is_some_and(|m| {
        m.is_active
            && present(m.meeting_link.as_deref())
            && present(m.slot_or_time_label.as_deref())
            && m.day.is_some()
    })
}

/// What the group agreed to meet at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingProposal {
    /// A ranked consensus slot.
    FromSuggestion(Suggestion),
    /// A day and a time (`"7:00 AM"`) or range (`"07:00 - 09:00"`) typed by hand.
    Manual { day: WeekDay, time: String },
}

impl MeetingProposal {
    pub fn day(&self) -> WeekDay {
        match self {
            MeetingProposal::FromSuggestion(s) => s.day,
            MeetingProposal::Manual { day, .. } => *day,
        }
    }

    /// The normalized schedule label stored on the record.
    pub fn label(&self) -> Result<String, CapstoneError> {
        match self {
            MeetingProposal::FromSuggestion(s) => {
                Ok(format!("{} ({})", s.slot.name, s.slot.time_range_label()))
            }
            MeetingProposal::Manual { time, .. } => manual_time_label(time),
        }
    }
}

fn manual_time_label(text: &str) -> Result<String, CapstoneError> {
    match text.split_once('-') {
        Some((start, end)) => {
            let start = parse_clock_time(start)?;
            let end = parse_clock_time(end)?;
            if start >= end {
                return Err(CapstoneError::InvalidRange {
                    start: format_clock_time(start),
                    end: format_clock_time(end),
                });
            }
            Ok(format!(
                "{} - {}",
                format_clock_time(start),
                format_clock_time(end)
            ))
        }
        None => Ok(format_clock_time(parse_clock_time(text)?)),
    }
}

/// Produces the active record for an accepted proposal.
///
/// When `existing` is present its id is kept and everything else is
/// overwritten. A blank link is rejected.
pub fn accept(
    existing: Option<&FinalizedMeeting>,
    ctx: &SessionContext,
    proposal: &MeetingProposal,
    meeting_link: &str,
    now: DateTime<Utc>,
) -> Result<FinalizedMeeting, CapstoneError> {
    let meeting_link = meeting_link.trim();
    if meeting_link.is_empty() {
        return Err(CapstoneError::IncompleteMeeting {
            field: "meetingLink",
        });
    }
    let label = proposal.label()?;

    if is_finalized(existing) {
        warn!(group_id = %ctx.group_id, "overwriting finalized meeting");
    }

    let meeting = FinalizedMeeting {
        id: existing.and_then(|m| m.id.clone()),
        group_id: ctx.group_id.clone(),
        day: Some(proposal.day()),
        slot_or_time_label: Some(label),
        meeting_link: Some(meeting_link.to_string()),
        is_active: true,
        created_by: Some(ctx.user_id.to_string()),
        created_at: Some(now),
    };
    info!(group_id = %ctx.group_id, day = %proposal.day(), "meeting finalized");
    Ok(meeting)
}

/// Whether the group is still negotiating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizationState {
    Open,
    Finalized(FinalizedMeeting),
}

impl FinalizationState {
    /// Incomplete or inactive records leave the group `Open`.
    pub fn from_record(meeting: Option<FinalizedMeeting>) -> Self {
        match meeting {
            Some(m) if is_finalized(Some(&m)) => FinalizationState::Finalized(m),
            _ => FinalizationState::Open,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, FinalizationState::Finalized(_))
    }

    pub fn allows_availability_edits(&self) -> bool {
        !self.is_finalized()
    }

    pub fn meeting(&self) -> Option<&FinalizedMeeting> {
        match self {
            FinalizationState::Finalized(m) => Some(m),
            FinalizationState::Open => None,
        }
    }

    /// Fails with `MeetingLocked` once the schedule is final.
    pub fn ensure_editable(&self, group_id: &GroupId) -> Result<(), CapstoneError> {
        if self.is_finalized() {
            return Err(CapstoneError::MeetingLocked {
                group_id: group_id.to_string(),
            });
        }
        Ok(())
    }
}

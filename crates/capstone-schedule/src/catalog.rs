// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A campus's slot catalog and its invariants.
//!
//! Among active slots, display names are unique ignoring case and
//! `[start, end)` ranges never overlap. Every mutation re-checks the whole
//! list; catalogs hold tens of slots, so there is no index.

use tracing::{info, warn};

use capstone_core::records::SlotRecord;
use capstone_core::{CampusId, CapstoneError, SlotId};

use crate::slot::{SlotCandidate, TimeSlot, ranges_overlap};
use crate::time::{MINUTES_PER_DAY, format_clock_time};

/// Checks a proposed name and range against a set of other slots.
///
/// `others` yields `(display name, range)` pairs that must already exclude
/// the slot being edited and any inactive slot.
pub(crate) fn check_conflicts<'a>(
    name: &str,
    range: (u16, u16),
    others: impl IntoIterator<Item = (&'a str, (u16, u16))> + Clone,
) -> Result<(), CapstoneError> {
    check_name(name, others.clone())?;
    check_overlap(name, range, others)
}

pub(crate) fn check_range(range: (u16, u16)) -> Result<(), CapstoneError> {
    if range.0 >= range.1 || range.1 >= MINUTES_PER_DAY {
        return Err(CapstoneError::InvalidRange {
            start: format_clock_time(range.0),
            end: format_clock_time(range.1),
        });
    }
    Ok(())
}

pub(crate) fn check_name<'a>(
    name: &str,
    others: impl IntoIterator<Item = (&'a str, (u16, u16))>,
) -> Result<(), CapstoneError> {
    let wanted = name.trim().to_lowercase();
    if others
        .into_iter()
        .any(|(other, _)| other.trim().to_lowercase() == wanted)
    {
        return Err(CapstoneError::DuplicateName {
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_overlap<'a>(
    name: &str,
    range: (u16, u16),
    others: impl IntoIterator<Item = (&'a str, (u16, u16))>,
) -> Result<(), CapstoneError> {
    match others
        .into_iter()
        .find(|(_, other)| ranges_overlap(range, *other))
    {
        Some((conflicting, _)) => Err(CapstoneError::Overlap {
            name: name.trim().to_string(),
            conflicting: conflicting.to_string(),
        }),
        None => Ok(()),
    }
}

/// Ordered set of time slots owned by one campus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    campus_id: CampusId,
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    pub fn new(campus_id: CampusId) -> Self {
        Self {
            campus_id,
            slots: Vec::new(),
        }
    }

    /// Builds a catalog from the campus feed.
    ///
    /// Any entry with unparsable or inverted times fails the whole load.
    pub fn from_records(campus_id: CampusId, records: &[SlotRecord]) -> Result<Self, CapstoneError> {
        let mut slots: Vec<TimeSlot> = Vec::with_capacity(records.len());
        for record in records {
            let slot = TimeSlot::from_record(&campus_id, record)?;
            if slots.iter().any(|s| s.id == slot.id) {
                return Err(CapstoneError::Internal(format!(
                    "duplicate slot id {} in catalog feed for campus {campus_id}",
                    slot.id
                )));
            }
            slots.push(slot);
        }
        Ok(Self { campus_id, slots })
    }

    pub fn campus_id(&self) -> &CampusId {
        &self.campus_id
    }

    /// Every slot, active or not, in insertion order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Active slots in insertion order.
    pub fn list_active(&self) -> Vec<&TimeSlot> {
        self.slots.iter().filter(|s| s.is_active).collect()
    }

    /// Active slots sorted by start time, then id.
    pub fn list_active_by_start(&self) -> Vec<&TimeSlot> {
        let mut active = self.list_active();
        active.sort_by(|a, b| (a.start_minutes, &a.id).cmp(&(b.start_minutes, &b.id)));
        active
    }

    /// Looks up a slot by id, including deactivated ones.
    pub fn resolve(&self, id: &SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| &s.id == id)
    }

    /// Looks up a slot that can still be selected.
    pub fn resolve_active(&self, id: &SlotId) -> Option<&TimeSlot> {
        self.resolve(id).filter(|s| s.is_active)
    }

    /// `(name, range)` of active slots other than `exclude`.
    pub(crate) fn active_entries<'a>(
        &'a self,
        exclude: Option<&'a SlotId>,
    ) -> impl Iterator<Item = (&'a str, (u16, u16))> + Clone + 'a {
        self.slots
            .iter()
            .filter(move |s| s.is_active && Some(&s.id) != exclude)
            .map(|s| (s.name.as_str(), s.range()))
    }

    /// Runs every invariant check for `candidate` against the current slots.
    ///
    /// `exclude` names the slot being updated so it is not compared with itself.
    pub fn validate_candidate(
        &self,
        candidate: &SlotCandidate,
        exclude: Option<&SlotId>,
    ) -> Result<(), CapstoneError> {
        check_range(candidate.range())?;
        if candidate.label.trim().is_empty() {
            return Err(CapstoneError::EmptyLabel);
        }
        check_conflicts(
            &candidate.display_name(),
            candidate.range(),
            self.active_entries(exclude),
        )
    }

    /// Validates and appends a new active slot with a fresh id.
    pub fn add_slot(&mut self, candidate: &SlotCandidate) -> Result<TimeSlot, CapstoneError> {
        if let Err(err) = self.validate_candidate(candidate, None) {
            warn!(campus_id = %self.campus_id, label = %candidate.label, error = %err, "slot rejected");
            return Err(err);
        }

        let slot = TimeSlot {
            id: SlotId(uuid::Uuid::new_v4().to_string()),
            campus_id: self.campus_id.clone(),
            name: candidate.display_name(),
            start_minutes: candidate.start_minutes,
            end_minutes: candidate.end_minutes,
            is_active: true,
        };
        info!(campus_id = %self.campus_id, slot_id = %slot.id, name = %slot.name, "slot added");
        self.slots.push(slot.clone());
        Ok(slot)
    }

    /// Validates and replaces the name and range of an existing slot.
    pub fn update_slot(
        &mut self,
        id: &SlotId,
        candidate: &SlotCandidate,
    ) -> Result<&TimeSlot, CapstoneError> {
        let index = self
            .slots
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| CapstoneError::UnknownSlot {
                slot_id: id.to_string(),
            })?;

        if let Err(err) = self.validate_candidate(candidate, Some(id)) {
            warn!(campus_id = %self.campus_id, slot_id = %id, error = %err, "slot update rejected");
            return Err(err);
        }

        let slot = &mut self.slots[index];
        slot.name = candidate.display_name();
        slot.start_minutes = candidate.start_minutes;
        slot.end_minutes = candidate.end_minutes;
        info!(campus_id = %self.campus_id, slot_id = %id, name = %slot.name, "slot updated");
        Ok(&self.slots[index])
    }

    /// Soft-deletes a slot. Returns whether the slot was active before.
    ///
    /// Selections and meetings that reference the id are left alone.
    pub fn deactivate_slot(&mut self, id: &SlotId) -> Result<bool, CapstoneError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CapstoneError::UnknownSlot {
                slot_id: id.to_string(),
            })?;
        let was_active = std::mem::replace(&mut slot.is_active, false);
        if was_active {
            info!(campus_id = %self.campus_id, slot_id = %id, "slot deactivated");
        }
        Ok(was_active)
    }
}

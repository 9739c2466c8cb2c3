// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending, unsaved slots an administrator is adding to a catalog.
//!
//! Drafts hold raw field text. [`SlotBatch::validate`] is a pure recomputation
//! run after every field edit; [`SlotBatch::submission`] runs it again and
//! only yields a payload when nothing is wrong.

use std::fmt;

use tracing::{debug, warn};

use capstone_core::CapstoneError;
use capstone_core::records::NewSlotRecord;

use crate::catalog::{SlotCatalog, check_name, check_overlap, check_range};
use crate::slot::{SlotCandidate, display_name};
use crate::time::parse_clock_time;

/// Editable fields of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotField {
    Label,
    StartAt,
    EndAt,
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotField::Label => "nameSlot",
            SlotField::StartAt => "startAt",
            SlotField::EndAt => "endAt",
        })
    }
}

/// Raw text of one new slot as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDraft {
    pub label: String,
    pub start_at: String,
    pub end_at: String,
}

impl SlotDraft {
    pub fn new(
        label: impl Into<String>,
        start_at: impl Into<String>,
        end_at: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            start_at: start_at.into(),
            end_at: end_at.into(),
        }
    }

    fn field_mut(&mut self, field: SlotField) -> &mut String {
        match field {
            SlotField::Label => &mut self.label,
            SlotField::StartAt => &mut self.start_at,
            SlotField::EndAt => &mut self.end_at,
        }
    }

    /// Parsed range, if both times parse and start < end.
    fn valid_range(&self) -> Option<(u16, u16)> {
        let start = parse_clock_time(&self.start_at).ok()?;
        let end = parse_clock_time(&self.end_at).ok()?;
        check_range((start, end)).ok().map(|_| (start, end))
    }
}

/// One validation failure attached to a draft field.
#[derive(Debug)]
pub struct DraftIssue {
    pub index: usize,
    pub field: SlotField,
    pub error: CapstoneError,
}

/// Every issue found across a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub issues: Vec<DraftIssue>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// The error shown next to one field, if any.
    pub fn error_for(&self, index: usize, field: SlotField) -> Option<&CapstoneError> {
        self.issues
            .iter()
            .find(|issue| issue.index == index && issue.field == field)
            .map(|issue| &issue.error)
    }

    fn push(&mut self, index: usize, field: SlotField, error: CapstoneError) {
        self.issues.push(DraftIssue {
            index,
            field,
            error,
        });
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("slot #{} {}: {}", i.index + 1, i.field, i.error))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// Ordered list of pending new slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotBatch {
    drafts: Vec<SlotDraft>,
}

impl SlotBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[SlotDraft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn push(&mut self, draft: SlotDraft) -> usize {
        self.drafts.push(draft);
        self.drafts.len() - 1
    }

    /// Replaces one field of one draft.
    pub fn edit(
        &mut self,
        index: usize,
        field: SlotField,
        value: impl Into<String>,
    ) -> Result<(), CapstoneError> {
        let draft = self
            .drafts
            .get_mut(index)
            .ok_or_else(|| CapstoneError::Internal(format!("no pending slot at index {index}")))?;
        *draft.field_mut(field) = value.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<SlotDraft> {
        (index < self.drafts.len()).then(|| self.drafts.remove(index))
    }

    /// Discards every pending draft.
    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    /// Validates every draft against the catalog's active slots and against
    /// the other drafts' in-progress names and ranges.
    pub fn validate(&self, catalog: &SlotCatalog) -> BatchReport {
        let mut report = BatchReport::default();
        let ranges: Vec<Option<(u16, u16)>> = self.drafts.iter().map(SlotDraft::valid_range).collect();
        let names: Vec<String> = self.drafts.iter().map(|d| display_name(&d.label)).collect();

        for (index, draft) in self.drafts.iter().enumerate() {
            let peers = self
                .drafts
                .iter()
                .enumerate()
                .filter(move |(other, _)| *other != index);

            if draft.label.trim().is_empty() {
                report.push(index, SlotField::Label, CapstoneError::EmptyLabel);
            } else {
                let peer_names = peers
                    .clone()
                    .filter(|(_, d)| !d.label.trim().is_empty())
                    .map(|(other, _)| (names[other].as_str(), (0, 0)));
                if let Err(err) =
                    check_name(&names[index], catalog.active_entries(None).chain(peer_names))
                {
                    report.push(index, SlotField::Label, err);
                }
            }

            let start = parse_clock_time(&draft.start_at);
            let end = parse_clock_time(&draft.end_at);
            let (start, end) = match (start, end) {
                (Ok(start), Ok(end)) => (start, end),
                (start, end) => {
                    if let Err(err) = start {
                        report.push(index, SlotField::StartAt, err);
                    }
                    if let Err(err) = end {
                        report.push(index, SlotField::EndAt, err);
                    }
                    continue;
                }
            };

            if let Err(err) = check_range((start, end)) {
                report.push(index, SlotField::EndAt, err);
                continue;
            }

            let peer_ranges = peers.filter_map(|(other, _)| {
                ranges[other].map(|range| (names[other].as_str(), range))
            });
            if let Err(err) = check_overlap(
                &names[index],
                (start, end),
                catalog.active_entries(None).chain(peer_ranges),
            ) {
                report.push(index, SlotField::StartAt, err);
            }
        }

        debug!(
            campus_id = %catalog.campus_id(),
            drafts = self.drafts.len(),
            issues = report.issues.len(),
            "slot batch validated"
        );
        report
    }

    /// Re-validates atomically and returns the sink payload, or the full
    /// report if any draft has any issue. The batch itself is untouched.
    pub fn submission(&self, catalog: &SlotCatalog) -> Result<Vec<NewSlotRecord>, BatchReport> {
        let report = self.validate(catalog);
        if !report.is_clean() {
            warn!(
                campus_id = %catalog.campus_id(),
                issues = report.issues.len(),
                "slot batch rejected"
            );
            return Err(report);
        }

        let mut records = Vec::with_capacity(self.drafts.len());
        for (index, draft) in self.drafts.iter().enumerate() {
            let candidate = SlotCandidate::parse(&draft.label, &draft.start_at, &draft.end_at)
                .map_err(|err| {
                    let mut report = BatchReport::default();
                    report.push(index, SlotField::StartAt, err);
                    report
                })?;
            records.push(candidate.to_new_record());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use capstone_core::CampusId;

    use super::*;

    fn catalog() -> SlotCatalog {
        let mut catalog = SlotCatalog::new(CampusId::from("campus-1"));
        catalog
            .add_slot(&SlotCandidate::parse("A", "07:00", "09:00").unwrap())
            .unwrap();
        catalog
    }

    #[test]
    fn clean_batch_produces_payload() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "9:00 AM", "11:00 AM"));
        batch.push(SlotDraft::new("C", "13:00", "15:00"));

        let records = batch.submission(&catalog()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name_slot, "Slot B");
        assert_eq!(records[0].start_at, "09:00");
        assert_eq!(records[1].end_at, "15:00");
    }

    #[test]
    fn each_field_reports_its_own_error() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("", "25:00", "oops"));

        let report = batch.validate(&catalog());
        assert!(matches!(
            report.error_for(0, SlotField::Label),
            Some(CapstoneError::EmptyLabel)
        ));
        assert!(matches!(
            report.error_for(0, SlotField::StartAt),
            Some(CapstoneError::Parse { .. })
        ));
        assert!(matches!(
            report.error_for(0, SlotField::EndAt),
            Some(CapstoneError::Parse { .. })
        ));
    }

    #[test]
    fn inverted_range_is_reported_on_end() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "11:00", "10:00"));
        let report = batch.validate(&catalog());
        assert!(matches!(
            report.error_for(0, SlotField::EndAt),
            Some(CapstoneError::InvalidRange { .. })
        ));
    }

    #[test]
    fn drafts_collide_with_each_other_by_proposed_name() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "09:00", "10:00"));
        batch.push(SlotDraft::new("b", "13:00", "14:00"));

        let report = batch.validate(&catalog());
        assert!(matches!(
            report.error_for(0, SlotField::Label),
            Some(CapstoneError::DuplicateName { .. })
        ));
        assert!(matches!(
            report.error_for(1, SlotField::Label),
            Some(CapstoneError::DuplicateName { .. })
        ));
    }

    #[test]
    fn drafts_collide_with_each_other_by_range() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "09:00", "11:00"));
        batch.push(SlotDraft::new("C", "10:00", "12:00"));

        let report = batch.validate(&catalog());
        assert!(matches!(
            report.error_for(1, SlotField::StartAt),
            Some(CapstoneError::Overlap { conflicting, .. }) if conflicting == "Slot B"
        ));
        assert!(batch.submission(&catalog()).is_err());
    }

    #[test]
    fn catalog_conflicts_are_reported() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("a", "12:00", "13:00"));
        batch.push(SlotDraft::new("D", "08:00", "10:00"));

        let report = batch.validate(&catalog());
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(
            report.error_for(0, SlotField::Label),
            Some(CapstoneError::DuplicateName { .. })
        ));
        assert!(matches!(
            report.error_for(1, SlotField::StartAt),
            Some(CapstoneError::Overlap { .. })
        ));
    }

    #[test]
    fn fixing_a_field_clears_its_error() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "08:00", "10:00"));
        assert!(!batch.validate(&catalog()).is_clean());

        batch.edit(0, SlotField::StartAt, "09:00").unwrap();
        assert!(batch.validate(&catalog()).is_clean());
        assert!(batch.edit(3, SlotField::Label, "x").is_err());
    }

    #[test]
    fn rejected_submission_keeps_drafts() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("A", "12:00", "13:00"));
        let before = batch.clone();
        let report = batch.submission(&catalog()).unwrap_err();
        assert!(report.to_string().contains("slot #1 nameSlot"));
        assert_eq!(batch, before);
    }

    #[test]
    fn remove_and_clear_discard_drafts() {
        let mut batch = SlotBatch::new();
        batch.push(SlotDraft::new("B", "09:00", "10:00"));
        batch.push(SlotDraft::new("C", "10:00", "11:00"));
        assert_eq!(batch.remove(0).unwrap().label, "B");
        assert!(batch.remove(5).is_none());
        assert_eq!(batch.len(), 1);
        batch.clear();
        assert!(batch.is_empty());
    }
}

// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One student's weekly free-time selection.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use capstone_core::records::{DayFreeTimeRecord, StudentFreeTimeRecord};
use capstone_core::{CapstoneError, SlotId, StudentId, WeekDay};

use crate::catalog::SlotCatalog;
use crate::time::DayAliases;

/// Per-day set of slot ids a student marked as free.
///
/// Keyed by id, so the same slot can never be counted twice on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySet {
    student_id: StudentId,
    days: BTreeMap<WeekDay, BTreeSet<SlotId>>,
}

impl AvailabilitySet {
    /// An empty selection, as created when a student joins a group.
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            days: BTreeMap::new(),
        }
    }

    /// Rebuilds a student's set from the group free-time feed.
    ///
    /// Day labels go through `aliases`; unrecognized days are skipped.
    pub fn from_record(record: &StudentFreeTimeRecord, aliases: &DayAliases) -> Self {
        let mut set = Self::new(record.student_id.clone());
        for day_record in &record.free_time_slots {
            let day = match aliases.normalize(&day_record.day_of_week) {
                Ok(day) => day,
                Err(err) => {
                    warn!(student_id = %record.student_id, error = %err, "skipping free-time day");
                    continue;
                }
            };
            let entry = set.days.entry(day).or_default();
            entry.extend(day_record.time_slots.iter().map(|s| s.id.clone()));
        }
        set
    }

    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Flips one slot on a day. Returns whether it is selected afterwards.
    pub fn toggle_slot(&mut self, day: WeekDay, slot: &SlotId) -> bool {
        let selected = self.days.entry(day).or_default();
        if selected.remove(slot) {
            false
        } else {
            selected.insert(slot.clone());
            true
        }
    }

    /// Selects a slot. Returns false if it was already selected.
    pub fn add_slot(&mut self, day: WeekDay, slot: &SlotId) -> bool {
        self.days.entry(day).or_default().insert(slot.clone())
    }

    /// Deselects a slot. Returns false if it was not selected.
    pub fn remove_slot(&mut self, day: WeekDay, slot: &SlotId) -> bool {
        self.days
            .get_mut(&day)
            .is_some_and(|selected| selected.remove(slot))
    }

    pub fn is_selected(&self, day: WeekDay, slot: &SlotId) -> bool {
        self.days.get(&day).is_some_and(|s| s.contains(slot))
    }

    /// Slot ids selected on `day`, in id order.
    pub fn selected(&self, day: WeekDay) -> impl Iterator<Item = &SlotId> {
        self.days.get(&day).into_iter().flatten()
    }

    /// Replaces a whole day's selection.
    ///
    /// Every id must resolve to an active slot of `catalog`; otherwise the
    /// set is left unchanged.
    pub fn replace_day(
        &mut self,
        day: WeekDay,
        slot_ids: &[SlotId],
        catalog: &SlotCatalog,
    ) -> Result<(), CapstoneError> {
        if let Some(unknown) = slot_ids.iter().find(|id| catalog.resolve_active(id).is_none()) {
            warn!(student_id = %self.student_id, %day, slot_id = %unknown, "unknown slot in day update");
            return Err(CapstoneError::UnknownSlot {
                slot_id: unknown.to_string(),
            });
        }
        self.days.insert(day, slot_ids.iter().cloned().collect());
        Ok(())
    }

    /// Checks that every selected id is still an active catalog slot.
    pub fn validate_against(&self, catalog: &SlotCatalog) -> Result<(), CapstoneError> {
        match self
            .days
            .values()
            .flatten()
            .find(|id| catalog.resolve_active(id).is_none())
        {
            Some(unknown) => Err(CapstoneError::UnknownSlot {
                slot_id: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Like [`AvailabilitySet::validate_against`], but only for ids not
    /// already present in `previous` on the same day.
    ///
    /// Selections kept from an earlier save stay valid after their slot is
    /// deactivated.
    pub fn validate_additions(
        &self,
        previous: &AvailabilitySet,
        catalog: &SlotCatalog,
    ) -> Result<(), CapstoneError> {
        let added = self.days.iter().flat_map(|(day, ids)| {
            ids.iter()
                .filter(move |id| !previous.is_selected(*day, id))
        });
        for id in added {
            if catalog.resolve_active(id).is_none() {
                return Err(CapstoneError::UnknownSlot {
                    slot_id: id.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn count_for_day(&self, day: WeekDay) -> usize {
        self.days.get(&day).map_or(0, BTreeSet::len)
    }

    pub fn total_selected(&self) -> usize {
        self.days.values().map(BTreeSet::len).sum()
    }

    /// Full replacement payload: one entry per day of the week, Monday first.
    pub fn to_write_records(&self) -> Vec<DayFreeTimeRecord> {
        WeekDay::ALL
            .iter()
            .map(|day| DayFreeTimeRecord {
                day_of_week: day.to_string(),
                slots: self.selected(*day).cloned().collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use capstone_core::CampusId;
    use capstone_core::records::{FreeTimeDayRecord, FreeTimeSlotRecord};

    use super::*;
    use crate::slot::SlotCandidate;

    fn catalog() -> (SlotCatalog, SlotId, SlotId) {
        let mut catalog = SlotCatalog::new(CampusId::from("c"));
        let one = catalog
            .add_slot(&SlotCandidate::parse("1", "07:00", "09:00").unwrap())
            .unwrap();
        let two = catalog
            .add_slot(&SlotCandidate::parse("2", "09:00", "11:00").unwrap())
            .unwrap();
        (catalog, one.id, two.id)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = AvailabilitySet::new(StudentId::from("s"));
        let slot = SlotId::from("x");
        assert!(set.toggle_slot(WeekDay::Monday, &slot));
        assert_eq!(set.count_for_day(WeekDay::Monday), 1);
        assert!(!set.toggle_slot(WeekDay::Monday, &slot));
        assert_eq!(set.count_for_day(WeekDay::Monday), 0);
    }

    #[test]
    fn count_never_double_counts() {
        let mut set = AvailabilitySet::new(StudentId::from("s"));
        let slot = SlotId::from("x");
        assert!(set.add_slot(WeekDay::Tuesday, &slot));
        assert!(!set.add_slot(WeekDay::Tuesday, &slot));
        assert_eq!(set.count_for_day(WeekDay::Tuesday), 1);
        assert_eq!(set.count_for_day(WeekDay::Friday), 0);
        assert!(set.remove_slot(WeekDay::Tuesday, &slot));
        assert!(!set.remove_slot(WeekDay::Friday, &slot));
    }

    #[test]
    fn replace_day_requires_active_slots() {
        let (mut catalog, one, two) = catalog();
        let mut set = AvailabilitySet::new(StudentId::from("s"));
        set.replace_day(WeekDay::Monday, &[one.clone(), two.clone()], &catalog)
            .unwrap();
        assert_eq!(set.count_for_day(WeekDay::Monday), 2);

        catalog.deactivate_slot(&two).unwrap();
        let err = set
            .replace_day(WeekDay::Monday, &[one.clone(), two.clone()], &catalog)
            .unwrap_err();
        assert!(matches!(err, CapstoneError::UnknownSlot { slot_id } if slot_id == two.to_string()));
        // unchanged on failure
        assert!(set.is_selected(WeekDay::Monday, &two));

        let err = set
            .replace_day(WeekDay::Monday, &[SlotId::from("ghost")], &catalog)
            .unwrap_err();
        assert!(matches!(err, CapstoneError::UnknownSlot { .. }));
    }

    #[test]
    fn replace_day_with_empty_clears_day() {
        let (catalog, one, _) = catalog();
        let mut set = AvailabilitySet::new(StudentId::from("s"));
        set.replace_day(WeekDay::Monday, &[one], &catalog).unwrap();
        set.replace_day(WeekDay::Monday, &[], &catalog).unwrap();
        assert_eq!(set.count_for_day(WeekDay::Monday), 0);
        assert!(set.validate_against(&catalog).is_ok());
    }

    #[test]
    fn kept_selection_of_deactivated_slot_does_not_block_additions() {
        let (mut catalog, one, two) = catalog();
        let mut stored = AvailabilitySet::new(StudentId::from("s"));
        stored.add_slot(WeekDay::Tuesday, &two);
        catalog.deactivate_slot(&two).unwrap();

        let mut edited = stored.clone();
        edited.add_slot(WeekDay::Monday, &one);
        assert!(edited.validate_additions(&stored, &catalog).is_ok());
        assert!(edited.validate_against(&catalog).is_err());

        // re-adding the inactive slot on another day is a new selection
        edited.add_slot(WeekDay::Friday, &two);
        let err = edited.validate_additions(&stored, &catalog).unwrap_err();
        assert!(matches!(err, CapstoneError::UnknownSlot { slot_id } if slot_id == two.to_string()));
    }

    #[test]
    fn write_records_cover_the_whole_week() {
        let mut set = AvailabilitySet::new(StudentId::from("s"));
        set.add_slot(WeekDay::Wednesday, &SlotId::from("b"));
        set.add_slot(WeekDay::Wednesday, &SlotId::from("a"));

        let records = set.to_write_records();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0].day_of_week, "Monday");
        assert!(records[0].slots.is_empty());
        assert_eq!(records[2].day_of_week, "Wednesday");
        assert_eq!(records[2].slots, vec![SlotId::from("a"), SlotId::from("b")]);
    }

    #[test]
    fn from_record_normalizes_and_merges_day_labels() {
        let slot = |id: &str| FreeTimeSlotRecord {
            id: SlotId::from(id),
            name_slot: format!("Slot {id}"),
            start_at: "07:00".into(),
            end_at: "09:00".into(),
        };
        let record = StudentFreeTimeRecord {
            student_id: StudentId::from("s"),
            free_time_slots: vec![
                FreeTimeDayRecord {
                    day_of_week: "Thứ Hai".into(),
                    time_slots: vec![slot("1")],
                },
                FreeTimeDayRecord {
                    day_of_week: "monday".into(),
                    time_slots: vec![slot("1"), slot("2")],
                },
                FreeTimeDayRecord {
                    day_of_week: "someday".into(),
                    time_slots: vec![slot("3")],
                },
            ],
        };

        let set = AvailabilitySet::from_record(&record, &DayAliases::default());
        assert_eq!(set.count_for_day(WeekDay::Monday), 2);
        assert_eq!(set.total_selected(), 2);
    }
}

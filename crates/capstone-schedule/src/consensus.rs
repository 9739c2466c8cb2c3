// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group free-time consensus.
//!
//! [`GroupAvailability`] is a snapshot of every member's selection with slot
//! times already resolved. [`merge_schedules`] and [`suggest`] are pure
//! functions of that snapshot: members live in an ordered map, so the result
//! never depends on the order members were added.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use capstone_config::ScheduleConfig;
use capstone_core::records::StudentFreeTimeRecord;
use capstone_core::{SlotId, StudentId, WeekDay};

use crate::availability::AvailabilitySet;
use crate::catalog::SlotCatalog;
use crate::slot::ScheduledSlot;
use crate::time::DayAliases;

/// Default number of suggestions returned per day.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 4;

/// Fewest distinct members that make a slot a suggestion.
pub const MIN_SUPPORT: usize = 2;

type DaySelection = BTreeMap<SlotId, ScheduledSlot>;

/// Every member's free slots, per canonical day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAvailability {
    members: BTreeMap<StudentId, BTreeMap<WeekDay, DaySelection>>,
}

impl GroupAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from the group free-time feed.
    ///
    /// Day labels are normalized through `aliases`. Unrecognized days and
    /// slots with unreadable times are skipped, not fatal.
    pub fn from_records(records: &[StudentFreeTimeRecord], aliases: &DayAliases) -> Self {
        let mut group = Self::new();
        for record in records {
            group.add_member(record.student_id.clone());
            for day_record in &record.free_time_slots {
                let day = match aliases.normalize(&day_record.day_of_week) {
                    Ok(day) => day,
                    Err(err) => {
                        warn!(student_id = %record.student_id, error = %err, "skipping free-time day");
                        continue;
                    }
                };
                for slot_record in &day_record.time_slots {
                    match ScheduledSlot::from_record(slot_record) {
                        Ok(slot) => group.insert(&record.student_id, day, slot),
                        Err(err) => warn!(
                            student_id = %record.student_id,
                            slot_id = %slot_record.id,
                            error = %err,
                            "skipping free-time slot"
                        ),
                    }
                }
            }
        }
        group
    }

    /// Builds a snapshot from stored sets, resolving ids through `catalog`.
    ///
    /// Deactivated slots still resolve, so past selections stay visible; ids
    /// absent from the catalog are skipped.
    pub fn from_sets<'a>(
        sets: impl IntoIterator<Item = &'a AvailabilitySet>,
        catalog: &SlotCatalog,
    ) -> Self {
        let mut group = Self::new();
        for set in sets {
            group.add_member(set.student_id().clone());
            for day in WeekDay::ALL {
                for id in set.selected(day) {
                    match catalog.resolve(id) {
                        Some(slot) => group.insert(set.student_id(), day, slot.summary()),
                        None => warn!(student_id = %set.student_id(), slot_id = %id, "selection references unknown slot"),
                    }
                }
            }
        }
        group
    }

    /// Registers a member even if they have selected nothing yet.
    pub fn add_member(&mut self, student: StudentId) {
        self.members.entry(student).or_default();
    }

    /// Records one selection. A repeated id for the same member and day is ignored.
    pub fn insert(&mut self, student: &StudentId, day: WeekDay, slot: ScheduledSlot) {
        self.members
            .entry(student.clone())
            .or_default()
            .entry(day)
            .or_default()
            .entry(slot.id.clone())
            .or_insert(slot);
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &StudentId> {
        self.members.keys()
    }

    /// One member's slots on a day, in id order.
    pub fn selections(&self, student: &StudentId, day: WeekDay) -> impl Iterator<Item = &ScheduledSlot> {
        self.members
            .get(student)
            .and_then(|days| days.get(&day))
            .into_iter()
            .flat_map(|selection| selection.values())
    }

    fn day_selections(&self, day: WeekDay) -> impl Iterator<Item = &DaySelection> {
        self.members.values().filter_map(move |days| days.get(&day))
    }
}

/// Union of all members' selections, per day, sorted by start time then id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedSchedule {
    days: BTreeMap<WeekDay, Vec<ScheduledSlot>>,
}

impl MergedSchedule {
    /// Slots anyone is free for on `day`.
    pub fn day(&self, day: WeekDay) -> &[ScheduledSlot] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All seven days, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (WeekDay, &[ScheduledSlot])> {
        WeekDay::ALL.into_iter().map(|day| (day, self.day(day)))
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }
}

/// Computes the merged schedule for the whole week.
pub fn merge_schedules(group: &GroupAvailability) -> MergedSchedule {
    let days = WeekDay::ALL
        .into_iter()
        .map(|day| {
            let mut union: BTreeMap<&SlotId, &ScheduledSlot> = BTreeMap::new();
            for selection in group.day_selections(day) {
                for (id, slot) in selection {
                    union.entry(id).or_insert(slot);
                }
            }
            let mut slots: Vec<ScheduledSlot> = union.into_values().cloned().collect();
            slots.sort_by(|a, b| (a.start_minutes, &a.id).cmp(&(b.start_minutes, &b.id)));
            (day, slots)
        })
        .collect();
    MergedSchedule { days }
}

/// A slot proposed as the group's meeting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub slot: ScheduledSlot,
    pub day: WeekDay,
    pub support_count: usize,
}

/// How many suggestions to return and how much agreement they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub limit: usize,
    pub min_support: usize,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            min_support: MIN_SUPPORT,
        }
    }
}

impl SuggestionPolicy {
    /// Reads the policy from config. `min_support` never drops below 2.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            limit: config.suggestion_limit,
            min_support: config.min_support.max(MIN_SUPPORT),
        }
    }
}

/// Ranks `day`'s slots shared by more than one member.
///
/// Highest support first, then earliest start, then id; at most `top_n`.
/// An empty result means no consensus, not a failure.
pub fn suggest(group: &GroupAvailability, day: WeekDay, top_n: usize) -> Vec<Suggestion> {
    suggest_with(
        group,
        day,
        SuggestionPolicy {
            limit: top_n,
            min_support: MIN_SUPPORT,
        },
    )
}

/// [`suggest`] with an explicit policy.
pub fn suggest_with(
    group: &GroupAvailability,
    day: WeekDay,
    policy: SuggestionPolicy,
) -> Vec<Suggestion> {
    let min_support = policy.min_support.max(MIN_SUPPORT);
    let mut tally: BTreeMap<&SlotId, (&ScheduledSlot, usize)> = BTreeMap::new();
    for selection in group.day_selections(day) {
        for (id, slot) in selection {
            tally.entry(id).or_insert((slot, 0)).1 += 1;
        }
    }

    let mut ranked: Vec<Suggestion> = tally
        .into_values()
        .filter(|(_, support)| *support >= min_support)
        .map(|(slot, support_count)| Suggestion {
            slot: slot.clone(),
            day,
            support_count,
        })
        .collect();
    ranked.sort_by_key(|s| (Reverse(s.support_count), s.slot.start_minutes, s.slot.id.clone()));
    ranked.truncate(policy.limit);

    debug!(%day, members = group.member_count(), suggestions = ranked.len(), "suggestions ranked");
    ranked
}

/// [`suggest_with`] for every day of the week, Monday first.
pub fn suggest_week(
    group: &GroupAvailability,
    policy: SuggestionPolicy,
) -> BTreeMap<WeekDay, Vec<Suggestion>> {
    WeekDay::ALL
        .into_iter()
        .map(|day| (day, suggest_with(group, day, policy)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, start: u16, end: u16) -> ScheduledSlot {
        ScheduledSlot {
            id: SlotId::from(id),
            name: format!("Slot {id}"),
            start_minutes: start,
            end_minutes: end,
        }
    }

    fn student(id: &str) -> StudentId {
        StudentId::from(id)
    }

    #[test]
    fn merge_is_sorted_and_deduplicated() {
        let mut group = GroupAvailability::new();
        group.insert(&student("a"), WeekDay::Monday, slot("2", 540, 660));
        group.insert(&student("a"), WeekDay::Monday, slot("1", 420, 540));
        group.insert(&student("b"), WeekDay::Monday, slot("1", 420, 540));

        let merged = merge_schedules(&group);
        let ids: Vec<_> = merged.day(WeekDay::Monday).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(merged.day(WeekDay::Tuesday).is_empty());
        assert_eq!(merged.iter().count(), 7);
    }

    #[test]
    fn merge_breaks_start_ties_by_id() {
        let mut group = GroupAvailability::new();
        group.insert(&student("a"), WeekDay::Friday, slot("z", 420, 480));
        group.insert(&student("b"), WeekDay::Friday, slot("m", 420, 500));
        let merged = merge_schedules(&group);
        let ids: Vec<_> = merged.day(WeekDay::Friday).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["m", "z"]);
    }

    #[test]
    fn member_without_selection_contributes_nothing() {
        let mut group = GroupAvailability::new();
        group.add_member(student("idle"));
        group.insert(&student("a"), WeekDay::Monday, slot("1", 420, 540));
        assert_eq!(group.member_count(), 2);
        assert_eq!(merge_schedules(&group).day(WeekDay::Monday).len(), 1);
        assert!(suggest(&group, WeekDay::Monday, 4).is_empty());
    }

    #[test]
    fn suggest_ranks_by_support_then_start() {
        let mut group = GroupAvailability::new();
        for s in ["a", "b", "c"] {
            group.insert(&student(s), WeekDay::Monday, slot("x", 600, 660));
        }
        group.insert(&student("a"), WeekDay::Monday, slot("y", 420, 480));
        group.insert(&student("d"), WeekDay::Monday, slot("y", 420, 480));
        group.insert(&student("d"), WeekDay::Monday, slot("w", 300, 360));
        group.insert(&student("b"), WeekDay::Monday, slot("v", 360, 400));
        group.insert(&student("c"), WeekDay::Monday, slot("v", 360, 400));

        let suggestions = suggest(&group, WeekDay::Monday, 4);
        let ranked: Vec<_> = suggestions
            .iter()
            .map(|s| (s.slot.id.as_str(), s.support_count))
            .collect();
        assert_eq!(ranked, [("x", 3), ("v", 2), ("y", 2)]);
        assert!(suggestions.iter().all(|s| s.day == WeekDay::Monday));
    }

    #[test]
    fn suggest_respects_limit() {
        let mut group = GroupAvailability::new();
        for (i, id) in ["1", "2", "3", "4", "5"].iter().enumerate() {
            let start = 420 + (i as u16) * 60;
            group.insert(&student("a"), WeekDay::Monday, slot(id, start, start + 60));
            group.insert(&student("b"), WeekDay::Monday, slot(id, start, start + 60));
        }
        assert_eq!(suggest(&group, WeekDay::Monday, 4).len(), 4);
        assert_eq!(suggest(&group, WeekDay::Monday, 2).len(), 2);
        assert!(suggest(&group, WeekDay::Monday, 0).is_empty());
    }

    #[test]
    fn policy_never_allows_single_member_support() {
        let mut group = GroupAvailability::new();
        group.insert(&student("a"), WeekDay::Monday, slot("1", 420, 540));
        let policy = SuggestionPolicy {
            limit: 4,
            min_support: 1,
        };
        assert!(suggest_with(&group, WeekDay::Monday, policy).is_empty());

        let config = ScheduleConfig {
            min_support: 0,
            ..ScheduleConfig::default()
        };
        assert_eq!(SuggestionPolicy::from_config(&config).min_support, 2);
    }

    #[test]
    fn higher_min_support_filters_more() {
        let mut group = GroupAvailability::new();
        for s in ["a", "b"] {
            group.insert(&student(s), WeekDay::Monday, slot("1", 420, 540));
        }
        let policy = SuggestionPolicy {
            limit: 4,
            min_support: 3,
        };
        assert!(suggest_with(&group, WeekDay::Monday, policy).is_empty());
    }

    #[test]
    fn suggest_week_covers_every_day() {
        let mut group = GroupAvailability::new();
        for s in ["a", "b"] {
            group.insert(&student(s), WeekDay::Sunday, slot("1", 420, 540));
        }
        let week = suggest_week(&group, SuggestionPolicy::default());
        assert_eq!(week.len(), 7);
        assert_eq!(week[&WeekDay::Sunday].len(), 1);
        assert!(week[&WeekDay::Monday].is_empty());
    }

    #[test]
    fn selections_lists_one_members_day() {
        let mut group = GroupAvailability::new();
        group.insert(&student("a"), WeekDay::Monday, slot("1", 420, 540));
        group.insert(&student("a"), WeekDay::Monday, slot("1", 420, 540));
        assert_eq!(group.selections(&student("a"), WeekDay::Monday).count(), 1);
        assert_eq!(group.selections(&student("zz"), WeekDay::Monday).count(), 0);
    }
}

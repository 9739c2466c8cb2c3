// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders shared by integration tests.

use capstone_core::records::{
    FreeTimeDayRecord, FreeTimeSlotRecord, SlotRecord, StudentFreeTimeRecord,
};
use capstone_core::{SessionContext, SlotId, StudentId};

pub const CAMPUS: &str = "campus-1";
pub const GROUP: &str = "group-1";

/// An active catalog entry.
pub fn slot(id: &str, name: &str, start_at: &str, end_at: &str) -> SlotRecord {
    SlotRecord {
        id: SlotId::from(id),
        name: name.to_string(),
        start_at: start_at.to_string(),
        end_at: end_at.to_string(),
        is_active: true,
    }
}

/// `Slot 1` 07:00-09:00 and `Slot 2` 09:00-11:00, ids `slot-1` and `slot-2`.
pub fn two_slot_catalog() -> Vec<SlotRecord> {
    vec![
        slot("slot-1", "Slot 1", "07:00", "09:00"),
        slot("slot-2", "Slot 2", "09:00", "11:00"),
    ]
}

/// Embeds catalog entries the way the free-time read feed does.
pub fn embedded(slot: &SlotRecord) -> FreeTimeSlotRecord {
    FreeTimeSlotRecord {
        id: slot.id.clone(),
        name_slot: slot.name.clone(),
        start_at: slot.start_at.clone(),
        end_at: slot.end_at.clone(),
    }
}

/// A student's feed entry from `(day label, slots)` pairs.
pub fn free_time(student: &str, days: &[(&str, &[&SlotRecord])]) -> StudentFreeTimeRecord {
    StudentFreeTimeRecord {
        student_id: StudentId::from(student),
        free_time_slots: days
            .iter()
            .map(|(day, slots)| FreeTimeDayRecord {
                day_of_week: (*day).to_string(),
                time_slots: slots.iter().map(|s| embedded(s)).collect(),
            })
            .collect(),
    }
}

/// A session of `student` in [`GROUP`] on [`CAMPUS`].
pub fn session(student: &str) -> SessionContext {
    SessionContext::new(student, GROUP, CAMPUS)
}

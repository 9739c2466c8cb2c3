// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory portal for deterministic testing.
//!
//! `InMemoryPortal` implements every store trait over plain maps. Tests seed
//! it directly, inject failures, and inspect what was written.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use capstone_core::records::{
    DayFreeTimeRecord, FreeTimeDayRecord, FreeTimeSlotRecord, MeetingRecord, MutationOutcome,
    NewSlotRecord, SlotRecord, StudentFreeTimeRecord,
};
use capstone_core::traits::{FreeTimeStore, MeetingStore, PortalAdapter, SlotCatalogStore};
use capstone_core::types::{CampusId, GroupId, HealthStatus, MeetingId, SlotId, StudentId};
use capstone_core::CapstoneError;

/// A portal backed by in-memory maps.
///
/// Written free time is stored by slot id and re-embedded from the catalogs
/// on read, as the real feed does.
pub struct InMemoryPortal {
    catalogs: Arc<Mutex<HashMap<CampusId, Vec<SlotRecord>>>>,
    free_time: Arc<Mutex<HashMap<GroupId, BTreeMap<StudentId, StudentFreeTimeRecord>>>>,
    meetings: Arc<Mutex<HashMap<GroupId, MeetingRecord>>>,
    fail_next_write: Arc<Mutex<Option<String>>>,
    unreachable: Arc<Mutex<bool>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryPortal {
    /// Create an empty portal.
    pub fn new() -> Self {
        Self {
            catalogs: Arc::new(Mutex::new(HashMap::new())),
            free_time: Arc::new(Mutex::new(HashMap::new())),
            meetings: Arc::new(Mutex::new(HashMap::new())),
            fail_next_write: Arc::new(Mutex::new(None)),
            unreachable: Arc::new(Mutex::new(false)),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Replace a campus catalog.
    pub async fn seed_catalog(&self, campus: &str, slots: Vec<SlotRecord>) {
        self.catalogs
            .lock()
            .await
            .insert(CampusId::from(campus), slots);
    }

    /// Store a feed entry as-is, bypassing the write path.
    pub async fn seed_free_time(&self, group: &str, record: StudentFreeTimeRecord) {
        self.free_time
            .lock()
            .await
            .entry(GroupId::from(group))
            .or_default()
            .insert(record.student_id.clone(), record);
    }

    pub async fn seed_meeting(&self, group: &str, record: MeetingRecord) {
        self.meetings.lock().await.insert(GroupId::from(group), record);
    }

    /// The next mutation reports `success: false` with `message`.
    pub async fn fail_next_write(&self, message: &str) {
        *self.fail_next_write.lock().await = Some(message.to_string());
    }

    /// While set, every call returns a `Remote` error.
    pub async fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().await = unreachable;
    }

    /// Number of mutations that reached the store, failed ones included.
    pub async fn write_count(&self) -> usize {
        *self.writes.lock().await
    }

    pub async fn catalog(&self, campus: &str) -> Vec<SlotRecord> {
        self.catalogs
            .lock()
            .await
            .get(&CampusId::from(campus))
            .cloned()
            .unwrap_or_default()
    }

    pub async fn stored_meeting(&self, group: &str) -> Option<MeetingRecord> {
        self.meetings.lock().await.get(&GroupId::from(group)).cloned()
    }

    async fn ensure_reachable(&self) -> Result<(), CapstoneError> {
        if *self.unreachable.lock().await {
            debug!("in-memory portal unreachable");
            return Err(CapstoneError::remote("in-memory portal unreachable"));
        }
        Ok(())
    }

    /// Counts a mutation and returns the injected failure, if any.
    async fn begin_write(&self) -> Result<Option<MutationOutcome>, CapstoneError> {
        self.ensure_reachable().await?;
        *self.writes.lock().await += 1;
        let injected = self.fail_next_write.lock().await.take();
        if let Some(message) = &injected {
            warn!(%message, "injected write failure");
        }
        Ok(injected.map(MutationOutcome::failed))
    }

    async fn embed(&self, id: &SlotId) -> Option<FreeTimeSlotRecord> {
        self.catalogs
            .lock()
            .await
            .values()
            .flatten()
            .find(|s| &s.id == id)
            .map(|s| FreeTimeSlotRecord {
                id: s.id.clone(),
                name_slot: s.name.clone(),
                start_at: s.start_at.clone(),
                end_at: s.end_at.clone(),
            })
    }
}

impl Default for InMemoryPortal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalAdapter for InMemoryPortal {
    fn name(&self) -> &str {
        "in-memory-portal"
    }

    async fn health_check(&self) -> Result<HealthStatus, CapstoneError> {
        if *self.unreachable.lock().await {
            return Ok(HealthStatus::Unhealthy("unreachable".into()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SlotCatalogStore for InMemoryPortal {
    async fn fetch_slots(&self, campus: &CampusId) -> Result<Vec<SlotRecord>, CapstoneError> {
        self.ensure_reachable().await?;
        Ok(self
            .catalogs
            .lock()
            .await
            .get(campus)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_slots(
        &self,
        campus: &CampusId,
        slots: &[NewSlotRecord],
    ) -> Result<MutationOutcome, CapstoneError> {
        if let Some(failed) = self.begin_write().await? {
            return Ok(failed);
        }
        let mut catalogs = self.catalogs.lock().await;
        let catalog = catalogs.entry(campus.clone()).or_default();
        catalog.extend(slots.iter().map(|s| SlotRecord {
            id: SlotId(format!("slot-{}", uuid::Uuid::new_v4())),
            name: s.name_slot.clone(),
            start_at: s.start_at.clone(),
            end_at: s.end_at.clone(),
            is_active: true,
        }));
        Ok(MutationOutcome::ok(format!("{} slots added", slots.len())))
    }

    async fn deactivate_slot(
        &self,
        campus: &CampusId,
        slot: &SlotId,
    ) -> Result<MutationOutcome, CapstoneError> {
        if let Some(failed) = self.begin_write().await? {
            return Ok(failed);
        }
        let mut catalogs = self.catalogs.lock().await;
        match catalogs
            .get_mut(campus)
            .and_then(|slots| slots.iter_mut().find(|s| &s.id == slot))
        {
            Some(record) => {
                record.is_active = false;
                Ok(MutationOutcome::ok("slot deactivated"))
            }
            None => Ok(MutationOutcome::failed(format!("slot {slot} not found"))),
        }
    }
}

#[async_trait]
impl FreeTimeStore for InMemoryPortal {
    async fn fetch_group_free_time(
        &self,
        group: &GroupId,
    ) -> Result<Vec<StudentFreeTimeRecord>, CapstoneError> {
        self.ensure_reachable().await?;
        Ok(self
            .free_time
            .lock()
            .await
            .get(group)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace_student_free_time(
        &self,
        group: &GroupId,
        student: &StudentId,
        days: &[DayFreeTimeRecord],
    ) -> Result<MutationOutcome, CapstoneError> {
        if let Some(failed) = self.begin_write().await? {
            return Ok(failed);
        }

        let mut replacement = Vec::with_capacity(days.len());
        for day in days {
            let mut time_slots = Vec::with_capacity(day.slots.len());
            for id in &day.slots {
                match self.embed(id).await {
                    Some(slot) => time_slots.push(slot),
                    None => return Ok(MutationOutcome::failed(format!("slot {id} not found"))),
                }
            }
            replacement.push(FreeTimeDayRecord {
                day_of_week: day.day_of_week.clone(),
                time_slots,
            });
        }

        let mut groups = self.free_time.lock().await;
        let record = groups
            .entry(group.clone())
            .or_default()
            .entry(student.clone())
            .or_insert_with(|| StudentFreeTimeRecord {
                student_id: student.clone(),
                free_time_slots: Vec::new(),
            });
        for day in replacement {
            record
                .free_time_slots
                .retain(|d| !d.day_of_week.eq_ignore_ascii_case(&day.day_of_week));
            if !day.time_slots.is_empty() {
                record.free_time_slots.push(day);
            }
        }
        Ok(MutationOutcome::ok("free time saved"))
    }
}

#[async_trait]
impl MeetingStore for InMemoryPortal {
    async fn fetch_meeting(&self, group: &GroupId) -> Result<Option<MeetingRecord>, CapstoneError> {
        self.ensure_reachable().await?;
        Ok(self.meetings.lock().await.get(group).cloned())
    }

    async fn put_meeting(
        &self,
        group: &GroupId,
        record: &MeetingRecord,
    ) -> Result<MeetingRecord, CapstoneError> {
        if let Some(failed) = self.begin_write().await? {
            return Err(CapstoneError::remote(failed.message));
        }
        let mut stored = record.clone();
        if stored.id.is_none() {
            stored.id = Some(MeetingId(format!("meeting-{}", uuid::Uuid::new_v4())));
        }
        self.meetings
            .lock()
            .await
            .insert(group.clone(), stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn added_slots_get_ids_and_are_active() {
        let portal = InMemoryPortal::new();
        let campus = CampusId::from("c");
        let outcome = portal
            .add_slots(
                &campus,
                &[NewSlotRecord {
                    name_slot: "Slot 1".into(),
                    start_at: "07:00".into(),
                    end_at: "09:00".into(),
                }],
            )
            .await
            .unwrap();
        assert!(outcome.success);

        let slots = portal.fetch_slots(&campus).await.unwrap();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].is_active);
        assert!(slots[0].id.as_str().starts_with("slot-"));
    }

    #[tokio::test]
    #[traced_test]
    async fn injected_failure_applies_once() {
        let portal = InMemoryPortal::new();
        portal.seed_catalog("c", fixtures::two_slot_catalog()).await;
        portal.fail_next_write("quota exceeded").await;

        let campus = CampusId::from("c");
        let first = portal
            .deactivate_slot(&campus, &SlotId::from("slot-1"))
            .await
            .unwrap();
        assert!(!first.success);
        assert_eq!(first.message, "quota exceeded");
        assert!(portal.catalog("c").await[0].is_active);

        let second = portal
            .deactivate_slot(&campus, &SlotId::from("slot-1"))
            .await
            .unwrap();
        assert!(second.success);
        assert!(!portal.catalog("c").await[0].is_active);
        assert_eq!(portal.write_count().await, 2);
        assert!(logs_contain("injected write failure"));
    }

    #[tokio::test]
    async fn free_time_write_replaces_days_and_embeds_slots() {
        let portal = InMemoryPortal::new();
        portal.seed_catalog("c", fixtures::two_slot_catalog()).await;
        let group = GroupId::from("g");
        let student = StudentId::from("s");

        let write = |ids: &[&str]| {
            vec![DayFreeTimeRecord {
                day_of_week: "Monday".into(),
                slots: ids.iter().map(|id| SlotId::from(*id)).collect(),
            }]
        };
        portal
            .replace_student_free_time(&group, &student, &write(&["slot-1", "slot-2"]))
            .await
            .unwrap();
        portal
            .replace_student_free_time(&group, &student, &write(&["slot-2"]))
            .await
            .unwrap();

        let feed = portal.fetch_group_free_time(&group).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].free_time_slots.len(), 1);
        assert_eq!(feed[0].free_time_slots[0].time_slots[0].name_slot, "Slot 2");
    }

    #[tokio::test]
    #[traced_test]
    async fn unreachable_portal_errors() {
        let portal = InMemoryPortal::new();
        portal.set_unreachable(true).await;
        assert!(matches!(
            portal.fetch_meeting(&GroupId::from("g")).await,
            Err(CapstoneError::Remote { .. })
        ));
        assert!(matches!(
            portal.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        assert!(logs_contain("in-memory portal unreachable"));
    }
}

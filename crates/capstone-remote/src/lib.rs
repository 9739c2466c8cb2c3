// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portal REST adapter for the capstone meeting scheduler.
//!
//! This crate implements [`SlotCatalogStore`], [`FreeTimeStore`], and
//! [`MeetingStore`] over the portal's JSON API:
//!
//! | Operation | Request |
//! |---|---|
//! | catalog feed | `GET /campuses/{campusId}/slots` |
//! | add slots | `POST /campuses/{campusId}/slots` |
//! | deactivate slot | `DELETE /campuses/{campusId}/slots/{id}` |
//! | group free time | `GET /groups/{groupId}/free-times` |
//! | save free time | `PUT /groups/{groupId}/students/{studentId}/free-times` |
//! | meeting | `GET` / `PUT /groups/{groupId}/meeting` |

pub mod client;

use async_trait::async_trait;
use capstone_config::PortalConfig;
use capstone_core::error::CapstoneError;
use capstone_core::records::{
    DayFreeTimeRecord, MeetingRecord, MutationOutcome, NewSlotRecord, SlotRecord,
    StudentFreeTimeRecord,
};
use capstone_core::traits::{FreeTimeStore, MeetingStore, PortalAdapter, SlotCatalogStore};
use capstone_core::types::{CampusId, GroupId, HealthStatus, SlotId, StudentId};
use reqwest::Method;
use tracing::{debug, info};

use crate::client::PortalHttpClient;

/// Portal adapter implementing every store trait over HTTP.
pub struct PortalClient {
    client: PortalHttpClient,
}

impl PortalClient {
    /// Creates a portal adapter from the `[portal]` config section.
    pub fn new(config: &PortalConfig) -> Result<Self, CapstoneError> {
        let client = PortalHttpClient::new(config)?;
        info!(
            base_url = %client.base_url(),
            max_retries = config.max_retries,
            "portal client initialized"
        );
        Ok(Self { client })
    }

    /// Creates an adapter with an existing transport.
    pub fn with_client(client: PortalHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PortalAdapter for PortalClient {
    fn name(&self) -> &str {
        "portal"
    }

    async fn health_check(&self) -> Result<HealthStatus, CapstoneError> {
        match self.client.probe().await {
            Ok(status) if status.is_server_error() => {
                Ok(HealthStatus::Degraded(format!("portal answered {status}")))
            }
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(err) => Ok(HealthStatus::Unhealthy(err.to_string())),
        }
    }
}

#[async_trait]
impl SlotCatalogStore for PortalClient {
    async fn fetch_slots(&self, campus: &CampusId) -> Result<Vec<SlotRecord>, CapstoneError> {
        let url = self.client.endpoint(&["campuses", campus.as_str(), "slots"]);
        let slots: Vec<SlotRecord> = self.client.get_json(url).await?;
        debug!(campus_id = %campus, count = slots.len(), "catalog fetched");
        Ok(slots)
    }

    async fn add_slots(
        &self,
        campus: &CampusId,
        slots: &[NewSlotRecord],
    ) -> Result<MutationOutcome, CapstoneError> {
        let url = self.client.endpoint(&["campuses", campus.as_str(), "slots"]);
        self.client.send_json(Method::POST, url, slots).await
    }

    async fn deactivate_slot(
        &self,
        campus: &CampusId,
        slot: &SlotId,
    ) -> Result<MutationOutcome, CapstoneError> {
        let url = self
            .client
            .endpoint(&["campuses", campus.as_str(), "slots", slot.as_str()]);
        self.client.delete_json(url).await
    }
}

#[async_trait]
impl FreeTimeStore for PortalClient {
    async fn fetch_group_free_time(
        &self,
        group: &GroupId,
    ) -> Result<Vec<StudentFreeTimeRecord>, CapstoneError> {
        let url = self.client.endpoint(&["groups", group.as_str(), "free-times"]);
        self.client.get_json(url).await
    }

    async fn replace_student_free_time(
        &self,
        group: &GroupId,
        student: &StudentId,
        days: &[DayFreeTimeRecord],
    ) -> Result<MutationOutcome, CapstoneError> {
        let url = self.client.endpoint(&[
            "groups",
            group.as_str(),
            "students",
            student.as_str(),
            "free-times",
        ]);
        self.client.send_json(Method::PUT, url, days).await
    }
}

#[async_trait]
impl MeetingStore for PortalClient {
    async fn fetch_meeting(&self, group: &GroupId) -> Result<Option<MeetingRecord>, CapstoneError> {
        let url = self.client.endpoint(&["groups", group.as_str(), "meeting"]);
        self.client.get_json_optional(url).await
    }

    async fn put_meeting(
        &self,
        group: &GroupId,
        record: &MeetingRecord,
    ) -> Result<MeetingRecord, CapstoneError> {
        let url = self.client.endpoint(&["groups", group.as_str(), "meeting"]);
        self.client.send_json(Method::PUT, url, record).await
    }
}

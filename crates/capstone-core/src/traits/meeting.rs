// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for a group's finalized meeting record.

use async_trait::async_trait;

use crate::error::CapstoneError;
use crate::records::MeetingRecord;
use crate::traits::adapter::PortalAdapter;
use crate::types::GroupId;

/// Read and write access to the single meeting record of a group.
#[async_trait]
pub trait MeetingStore: PortalAdapter {
    /// Returns the group's meeting record, or `None` when none was ever written.
    async fn fetch_meeting(&self, group: &GroupId) -> Result<Option<MeetingRecord>, CapstoneError>;

    /// Creates or overwrites the group's meeting record and returns what was stored.
    async fn put_meeting(
        &self,
        group: &GroupId,
        record: &MeetingRecord,
    ) -> Result<MeetingRecord, CapstoneError>;
}

// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for a campus's slot catalog.

use async_trait::async_trait;

use crate::error::CapstoneError;
use crate::records::{MutationOutcome, NewSlotRecord, SlotRecord};
use crate::traits::adapter::PortalAdapter;
use crate::types::{CampusId, SlotId};

/// Read feed and mutation sink for campus time slots.
///
/// Implementations hand payloads to storage atomically: a batch is either
/// stored entirely or not at all.
#[async_trait]
pub trait SlotCatalogStore: PortalAdapter {
    /// Returns every slot of the campus, active or not, in catalog order.
    async fn fetch_slots(&self, campus: &CampusId) -> Result<Vec<SlotRecord>, CapstoneError>;

    /// Stores a batch of already validated new slots.
    async fn add_slots(
        &self,
        campus: &CampusId,
        slots: &[NewSlotRecord],
    ) -> Result<MutationOutcome, CapstoneError>;

    /// Marks a slot inactive. Deactivating an inactive slot is not an error.
    async fn deactivate_slot(
        &self,
        campus: &CampusId,
        slot: &SlotId,
    ) -> Result<MutationOutcome, CapstoneError>;
}

// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of the schedule engine over the store ports.
//!
//! The planner owns no state between calls: every operation reads a fresh
//! snapshot from the stores, runs the pure engine on it, and writes back.
//! Caller-owned drafts and sets are never mutated, so a failed write leaves
//! them ready to retry.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use capstone_config::ScheduleConfig;
use capstone_core::records::MutationOutcome;
use capstone_core::{
    CapstoneError, FreeTimeStore, MeetingStore, SessionContext, SlotCatalogStore, SlotId, WeekDay,
};

use crate::availability::AvailabilitySet;
use crate::batch::{BatchReport, SlotBatch};
use crate::catalog::SlotCatalog;
use crate::consensus::{
    GroupAvailability, MergedSchedule, Suggestion, SuggestionPolicy, merge_schedules, suggest_week,
    suggest_with,
};
use crate::finalization::{FinalizationState, FinalizedMeeting, MeetingProposal, accept};
use crate::time::DayAliases;

/// Result of submitting a slot batch.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The store accepted every draft.
    Accepted { count: usize, message: String },
    /// At least one draft conflicts with the current catalog or another draft.
    Rejected(BatchReport),
}

/// Entry point for campus and group scheduling operations.
pub struct SchedulePlanner {
    catalog_store: Arc<dyn SlotCatalogStore>,
    free_time_store: Arc<dyn FreeTimeStore>,
    meeting_store: Arc<dyn MeetingStore>,
    policy: SuggestionPolicy,
    aliases: DayAliases,
}

impl SchedulePlanner {
    /// Builds a planner from its stores and the `[schedule]` config section.
    ///
    /// Fails only if a configured day alias targets an unknown day.
    pub fn new(
        catalog_store: Arc<dyn SlotCatalogStore>,
        free_time_store: Arc<dyn FreeTimeStore>,
        meeting_store: Arc<dyn MeetingStore>,
        config: &ScheduleConfig,
    ) -> Result<Self, CapstoneError> {
        Ok(Self {
            catalog_store,
            free_time_store,
            meeting_store,
            policy: SuggestionPolicy::from_config(config),
            aliases: DayAliases::from_map(&config.day_aliases)?,
        })
    }

    /// Shorthand for a single adapter that implements all three stores.
    pub fn with_portal<P>(portal: Arc<P>, config: &ScheduleConfig) -> Result<Self, CapstoneError>
    where
        P: SlotCatalogStore + FreeTimeStore + MeetingStore,
    {
        Self::new(portal.clone(), portal.clone(), portal, config)
    }

    pub fn policy(&self) -> SuggestionPolicy {
        self.policy
    }

    pub fn aliases(&self) -> &DayAliases {
        &self.aliases
    }

    // --- catalog ---

    /// Reads the campus catalog. Any unreadable slot fails the whole load.
    pub async fn load_catalog(&self, ctx: &SessionContext) -> Result<SlotCatalog, CapstoneError> {
        let records = self.catalog_store.fetch_slots(&ctx.campus_id).await?;
        let catalog = SlotCatalog::from_records(ctx.campus_id.clone(), &records)?;
        debug!(campus_id = %ctx.campus_id, slots = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Validates `batch` against the catalog as it is now and stores it.
    ///
    /// The catalog is re-read right before submission so slots added
    /// concurrently by someone else are taken into account.
    pub async fn submit_slots(
        &self,
        ctx: &SessionContext,
        batch: &SlotBatch,
    ) -> Result<SubmitOutcome, CapstoneError> {
        let catalog = self.load_catalog(ctx).await?;
        let records = match batch.submission(&catalog) {
            Ok(records) => records,
            Err(report) => return Ok(SubmitOutcome::Rejected(report)),
        };
        if records.is_empty() {
            return Ok(SubmitOutcome::Accepted {
                count: 0,
                message: String::new(),
            });
        }

        let outcome = self
            .catalog_store
            .add_slots(&ctx.campus_id, &records)
            .await?;
        let message = check_outcome(outcome, "add slots")?;
        info!(campus_id = %ctx.campus_id, count = records.len(), "slot batch stored");
        Ok(SubmitOutcome::Accepted {
            count: records.len(),
            message,
        })
    }

    /// Soft-deletes a slot of the caller's campus.
    pub async fn deactivate_slot(
        &self,
        ctx: &SessionContext,
        slot_id: &SlotId,
    ) -> Result<(), CapstoneError> {
        let catalog = self.load_catalog(ctx).await?;
        let slot = catalog
            .resolve(slot_id)
            .ok_or_else(|| CapstoneError::UnknownSlot {
                slot_id: slot_id.to_string(),
            })?;
        if !slot.is_active {
            debug!(campus_id = %ctx.campus_id, %slot_id, "slot already inactive");
            return Ok(());
        }

        let outcome = self
            .catalog_store
            .deactivate_slot(&ctx.campus_id, slot_id)
            .await?;
        check_outcome(outcome, "deactivate slot")?;
        info!(campus_id = %ctx.campus_id, %slot_id, "slot deactivated");
        Ok(())
    }

    // --- consensus ---

    /// Reads a snapshot of every member's free time.
    pub async fn group_availability(
        &self,
        ctx: &SessionContext,
    ) -> Result<GroupAvailability, CapstoneError> {
        let records = self
            .free_time_store
            .fetch_group_free_time(&ctx.group_id)
            .await?;
        Ok(GroupAvailability::from_records(&records, &self.aliases))
    }

    pub async fn merged_schedule(&self, ctx: &SessionContext) -> Result<MergedSchedule, CapstoneError> {
        let group = self.group_availability(ctx).await?;
        Ok(merge_schedules(&group))
    }

    /// Ranked consensus slots for one day, limited by the configured policy.
    pub async fn suggestions(
        &self,
        ctx: &SessionContext,
        day: WeekDay,
    ) -> Result<Vec<Suggestion>, CapstoneError> {
        let group = self.group_availability(ctx).await?;
        Ok(suggest_with(&group, day, self.policy))
    }

    /// [`SchedulePlanner::suggestions`] for every day from a single snapshot.
    pub async fn week_suggestions(
        &self,
        ctx: &SessionContext,
    ) -> Result<BTreeMap<WeekDay, Vec<Suggestion>>, CapstoneError> {
        let group = self.group_availability(ctx).await?;
        Ok(suggest_week(&group, self.policy))
    }

    // --- availability ---

    /// The caller's own selection; empty if they never saved one.
    pub async fn load_my_availability(
        &self,
        ctx: &SessionContext,
    ) -> Result<AvailabilitySet, CapstoneError> {
        let records = self
            .free_time_store
            .fetch_group_free_time(&ctx.group_id)
            .await?;
        Ok(records
            .iter()
            .find(|r| r.student_id == ctx.user_id)
            .map(|r| AvailabilitySet::from_record(r, &self.aliases))
            .unwrap_or_else(|| AvailabilitySet::new(ctx.user_id.clone())))
    }

    /// Replaces the caller's stored selection with `set`.
    ///
    /// Rejected with `MeetingLocked` once the group's meeting is final, and
    /// with `UnknownSlot` if a newly added selection is not an active catalog
    /// slot. Selections already stored are kept even if their slot has since
    /// been deactivated.
    pub async fn save_availability(
        &self,
        ctx: &SessionContext,
        set: &AvailabilitySet,
    ) -> Result<(), CapstoneError> {
        if set.student_id() != &ctx.user_id {
            warn!(owner = %set.student_id(), actor = %ctx.user_id, "availability owned by another student");
            return Err(CapstoneError::NotOwner {
                owner: set.student_id().to_string(),
                actor: ctx.user_id.to_string(),
            });
        }

        self.meeting_state(ctx).await?.ensure_editable(&ctx.group_id)?;

        let stored = self.load_my_availability(ctx).await?;
        let catalog = self.load_catalog(ctx).await?;
        if let Err(err) = set.validate_additions(&stored, &catalog) {
            warn!(group_id = %ctx.group_id, student_id = %ctx.user_id, error = %err, "availability rejected");
            return Err(err);
        }

        let outcome = self
            .free_time_store
            .replace_student_free_time(&ctx.group_id, &ctx.user_id, &set.to_write_records())
            .await?;
        check_outcome(outcome, "save free time")?;
        info!(
            group_id = %ctx.group_id,
            student_id = %ctx.user_id,
            selected = set.total_selected(),
            "availability saved"
        );
        Ok(())
    }

    // --- finalization ---

    /// The stored meeting record, if any, without judging completeness.
    pub async fn meeting(
        &self,
        ctx: &SessionContext,
    ) -> Result<Option<FinalizedMeeting>, CapstoneError> {
        let record = self.meeting_store.fetch_meeting(&ctx.group_id).await?;
        Ok(record.map(|r| FinalizedMeeting::from_record(ctx.group_id.clone(), &r, &self.aliases)))
    }

    pub async fn meeting_state(&self, ctx: &SessionContext) -> Result<FinalizationState, CapstoneError> {
        Ok(FinalizationState::from_record(self.meeting(ctx).await?))
    }

    /// Stores `proposal` as the group's meeting, overwriting any earlier one.
    pub async fn finalize(
        &self,
        ctx: &SessionContext,
        proposal: &MeetingProposal,
        meeting_link: &str,
    ) -> Result<FinalizedMeeting, CapstoneError> {
        let existing = self.meeting(ctx).await?;
        let meeting = accept(existing.as_ref(), ctx, proposal, meeting_link, Utc::now())?;
        let stored = self
            .meeting_store
            .put_meeting(&ctx.group_id, &meeting.to_record())
            .await?;
        Ok(FinalizedMeeting::from_record(
            ctx.group_id.clone(),
            &stored,
            &self.aliases,
        ))
    }
}

/// Turns a store-reported failure into an error, passing the message through.
fn check_outcome(outcome: MutationOutcome, operation: &str) -> Result<String, CapstoneError> {
    if outcome.success {
        Ok(outcome.message)
    } else {
        warn!(operation, message = %outcome.message, "store rejected mutation");
        Err(CapstoneError::remote(format!(
            "{operation} failed: {}",
            outcome.message
        )))
    }
}

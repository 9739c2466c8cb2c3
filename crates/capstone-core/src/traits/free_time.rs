// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for students' self-reported free time.

use async_trait::async_trait;

use crate::error::CapstoneError;
use crate::records::{DayFreeTimeRecord, MutationOutcome, StudentFreeTimeRecord};
use crate::traits::adapter::PortalAdapter;
use crate::types::{GroupId, StudentId};

/// Per-group free-time feed and per-student replacement writes.
#[async_trait]
pub trait FreeTimeStore: PortalAdapter {
    /// Returns the free time of every member of the group.
    async fn fetch_group_free_time(
        &self,
        group: &GroupId,
    ) -> Result<Vec<StudentFreeTimeRecord>, CapstoneError>;

    /// Replaces one student's free time, day by day.
    ///
    /// Days absent from `days` are left untouched by the store.
    async fn replace_student_free_time(
        &self,
        group: &GroupId,
        student: &StudentId,
        days: &[DayFreeTimeRecord],
    ) -> Result<MutationOutcome, CapstoneError>;
}

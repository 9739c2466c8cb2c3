// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every store adapter.

use async_trait::async_trait;

use crate::error::CapstoneError;
use crate::types::HealthStatus;

/// The base trait for adapters that reach the portal's system of record.
///
/// Every store (slot catalog, free time, meeting) extends this trait, which
/// provides identity and health check capabilities.
#[async_trait]
pub trait PortalAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, CapstoneError>;
}

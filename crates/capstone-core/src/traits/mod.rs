// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait definitions for the portal's external system of record.
//!
//! All stores extend the [`PortalAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod catalog;
pub mod free_time;
pub mod meeting;

pub use adapter::PortalAdapter;
pub use catalog::SlotCatalogStore;
pub use free_time::FreeTimeStore;
pub use meeting::MeetingStore;

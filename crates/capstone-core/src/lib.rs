// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the capstone meeting scheduler.
//!
//! This crate provides the identifiers, wire records, error type, and store
//! traits shared by the schedule engine and its adapters. Store adapters
//! implement the traits defined here.

pub mod error;
pub mod records;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CapstoneError;
pub use types::{
    CampusId, GroupId, HealthStatus, MeetingId, SessionContext, SlotId, StudentId, WeekDay,
};

// Re-export all store traits at crate root.
pub use traits::{FreeTimeStore, MeetingStore, PortalAdapter, SlotCatalogStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capstone_error_has_all_variants() {
        let _range = CapstoneError::InvalidRange {
            start: "9:00 AM".into(),
            end: "7:00 AM".into(),
        };
        let _label = CapstoneError::EmptyLabel;
        let _dup = CapstoneError::DuplicateName {
            name: "Slot A".into(),
        };
        let _overlap = CapstoneError::Overlap {
            name: "Slot B".into(),
            conflicting: "Slot A".into(),
        };
        let _unknown = CapstoneError::UnknownSlot {
            slot_id: "x".into(),
        };
        let _parse = CapstoneError::parse("25:00", "hour out of range");
        let _incomplete = CapstoneError::IncompleteMeeting {
            field: "meetingLink",
        };
        let _locked = CapstoneError::MeetingLocked {
            group_id: "g-1".into(),
        };
        let _owner = CapstoneError::NotOwner {
            owner: "alice".into(),
            actor: "bob".into(),
        };
        let _remote = CapstoneError::remote("503");
        let _config = CapstoneError::Config("test".into());
        let _internal = CapstoneError::Internal("test".into());
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(CapstoneError::EmptyLabel.is_validation());
        assert!(CapstoneError::parse("x", "y").is_validation());
        assert!(!CapstoneError::remote("down").is_validation());
        assert!(
            !CapstoneError::MeetingLocked {
                group_id: "g".into()
            }
            .is_validation()
        );
        let owner = CapstoneError::NotOwner {
            owner: "alice".into(),
            actor: "bob".into(),
        };
        assert!(!owner.is_validation());
        assert_eq!(owner.to_string(), "bob cannot change the availability of alice");
    }

    #[test]
    fn error_messages_name_the_offending_slot() {
        let err = CapstoneError::Overlap {
            name: "Slot B".into(),
            conflicting: "Slot A".into(),
        };
        assert_eq!(err.to_string(), "`Slot B` overlaps the existing slot `Slot A`");
    }

    #[test]
    fn all_store_traits_are_exported() {
        fn _assert_portal_adapter<T: PortalAdapter>() {}
        fn _assert_catalog_store<T: SlotCatalogStore>() {}
        fn _assert_free_time_store<T: FreeTimeStore>() {}
        fn _assert_meeting_store<T: MeetingStore>() {}
    }

    #[test]
    fn session_context_converts_plain_strings() {
        let ctx = SessionContext::new("stu-1", "grp-1", "campus-1");
        assert_eq!(ctx.user_id, StudentId::from("stu-1"));
        assert_eq!(ctx.group_id.to_string(), "grp-1");
        assert_eq!(ctx.campus_id.as_str(), "campus-1");
    }
}

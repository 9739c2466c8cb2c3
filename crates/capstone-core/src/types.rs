// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common identifiers and value types used across the scheduler crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a campus time slot.
    SlotId
);
string_id!(
    /// Identifier of a campus.
    CampusId
);
string_id!(
    /// Identifier of a student group.
    GroupId
);
string_id!(
    /// Identifier of a student (also the acting user id in a session).
    StudentId
);
string_id!(
    /// Identifier of a finalized meeting record.
    MeetingId
);

/// The acting user and the group/campus they are working in.
///
/// Passed explicitly into every planner operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: StudentId,
    pub group_id: GroupId,
    pub campus_id: CampusId,
}

impl SessionContext {
    pub fn new(
        user_id: impl Into<StudentId>,
        group_id: impl Into<GroupId>,
        campus_id: impl Into<CampusId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            group_id: group_id.into(),
            campus_id: campus_id.into(),
        }
    }
}

/// Canonical day of the week.
///
/// Serialized and displayed as the English name. `FromStr` only accepts the
/// English name (any case); locale aliases are resolved by the schedule
/// crate's day normalizer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// All days, Monday first.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];
}

/// Health status reported by store adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn week_day_parses_english_names_any_case() {
        assert_eq!(WeekDay::from_str("monday").unwrap(), WeekDay::Monday);
        assert_eq!(WeekDay::from_str("SUNDAY").unwrap(), WeekDay::Sunday);
        assert!(WeekDay::from_str("thứ hai").is_err());
    }

    #[test]
    fn week_day_all_is_monday_first_and_sorted() {
        assert_eq!(WeekDay::ALL.len(), 7);
        assert_eq!(WeekDay::ALL[0], WeekDay::Monday);
        let mut sorted = WeekDay::ALL;
        sorted.sort();
        assert_eq!(sorted, WeekDay::ALL);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&SlotId::from("s-1")).unwrap();
        assert_eq!(json, "\"s-1\"");
        let day = serde_json::to_string(&WeekDay::Friday).unwrap();
        assert_eq!(day, "\"Friday\"");
    }
}

// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-of-day and day-of-week parsing.
//!
//! Times are minutes since midnight (`0..1440`). Text input may be 24-hour
//! (`"07:30"`, `"07:30:00"`) or 12-hour (`"7:30 AM"`, `"7:30pm"`). Day names
//! may be English (any case, full or abbreviated) or Vietnamese, with or
//! without diacritics.

use std::collections::BTreeMap;
use std::str::FromStr;

use capstone_core::{CapstoneError, WeekDay};

/// Minutes in a day; valid clock values are strictly below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses `HH:MM`, `HH:MM:SS` or `H:MM AM|PM` into minutes since midnight.
///
/// Seconds are accepted and dropped. For 12-hour input, 12 AM is midnight and
/// 12 PM is noon; any other PM hour gains 12.
pub fn parse_clock_time(text: &str) -> Result<u16, CapstoneError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CapstoneError::parse(text, "empty time"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hour = number(text, parts.next(), "hour")?;
    let minute = number(text, parts.next(), "minute")?;
    if let Some(seconds) = parts.next() {
        if number(text, Some(seconds), "second")? > 59 {
            return Err(CapstoneError::parse(text, "second out of range"));
        }
    }
    if parts.next().is_some() {
        return Err(CapstoneError::parse(text, "too many `:` separators"));
    }

    let hour = match meridiem {
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(Meridiem::Pm) if hour != 12 => hour + 12,
        _ => hour,
    };

    if hour > 23 {
        return Err(CapstoneError::parse(text, "hour out of range"));
    }
    if minute > 59 {
        return Err(CapstoneError::parse(text, "minute out of range"));
    }
    Ok(hour * 60 + minute)
}

fn number(input: &str, part: Option<&str>, what: &str) -> Result<u16, CapstoneError> {
    let part = part.ok_or_else(|| CapstoneError::parse(input, format!("missing {what}")))?;
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CapstoneError::parse(input, format!("{what} is not a number")));
    }
    part.parse()
        .map_err(|_| CapstoneError::parse(input, format!("{what} is not a number")))
}

/// Display-only fallback: unparsable text reads as midnight.
///
/// Never use this where the value feeds validation.
pub fn minutes_or_zero(text: &str) -> u16 {
    parse_clock_time(text).unwrap_or(0)
}

/// Formats minutes since midnight as `H:MM AM|PM`. Values wrap at one day.
pub fn format_clock_time(minutes: u16) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let (hour, minute) = (minutes / 60, minutes % 60);
    let (hour, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{hour}:{minute:02} {suffix}")
}

/// Formats minutes since midnight as zero-padded `HH:MM`.
pub fn format_clock_time_24h(minutes: u16) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

// Compact keys: lowercase, diacritics removed, whitespace removed.
const BUILTIN_DAY_ALIASES: &[(&str, WeekDay)] = &[
    ("mon", WeekDay::Monday),
    ("thuhai", WeekDay::Monday),
    ("thu2", WeekDay::Monday),
    ("t2", WeekDay::Monday),
    ("tue", WeekDay::Tuesday),
    ("tues", WeekDay::Tuesday),
    ("thuba", WeekDay::Tuesday),
    ("thu3", WeekDay::Tuesday),
    ("t3", WeekDay::Tuesday),
    ("wed", WeekDay::Wednesday),
    ("thutu", WeekDay::Wednesday),
    ("thu4", WeekDay::Wednesday),
    ("t4", WeekDay::Wednesday),
    ("thu", WeekDay::Thursday),
    ("thur", WeekDay::Thursday),
    ("thurs", WeekDay::Thursday),
    ("thunam", WeekDay::Thursday),
    ("thu5", WeekDay::Thursday),
    ("t5", WeekDay::Thursday),
    ("fri", WeekDay::Friday),
    ("thusau", WeekDay::Friday),
    ("thu6", WeekDay::Friday),
    ("t6", WeekDay::Friday),
    ("sat", WeekDay::Saturday),
    ("thubay", WeekDay::Saturday),
    ("thu7", WeekDay::Saturday),
    ("t7", WeekDay::Saturday),
    ("sun", WeekDay::Sunday),
    ("chunhat", WeekDay::Sunday),
    ("cn", WeekDay::Sunday),
];

/// Resolves a day name to the canonical [`WeekDay`] using the built-in aliases.
pub fn normalize_week_day(text: &str) -> Result<WeekDay, CapstoneError> {
    let key = compact_day_key(text);
    builtin_day(&key).ok_or_else(|| CapstoneError::parse(text, "unrecognized day of week"))
}

fn builtin_day(key: &str) -> Option<WeekDay> {
    if key.is_empty() {
        return None;
    }
    BUILTIN_DAY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, day)| *day)
        .or_else(|| WeekDay::from_str(key).ok())
}

fn compact_day_key(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ'
        | 'ẫ' | 'ậ' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'đ' => 'd',
        other => other,
    }
}

/// Operator-supplied day aliases layered over the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayAliases {
    extra: BTreeMap<String, WeekDay>,
}

impl DayAliases {
    /// Builds the alias table from `alias -> English day name` pairs.
    pub fn from_map(aliases: &BTreeMap<String, String>) -> Result<Self, CapstoneError> {
        let mut extra = BTreeMap::new();
        for (alias, target) in aliases {
            let day = WeekDay::from_str(target.trim()).map_err(|_| {
                CapstoneError::Config(format!(
                    "day alias `{alias}` points at `{target}`, expected an English day name"
                ))
            })?;
            let key = compact_day_key(alias);
            if key.is_empty() {
                return Err(CapstoneError::Config("empty day alias".to_string()));
            }
            extra.insert(key, day);
        }
        Ok(Self { extra })
    }

    /// Resolves `text`, consulting configured aliases before the built-ins.
    pub fn normalize(&self, text: &str) -> Result<WeekDay, CapstoneError> {
        let key = compact_day_key(text);
        self.extra
            .get(&key)
            .copied()
            .or_else(|| builtin_day(&key))
            .ok_or_else(|| CapstoneError::parse(text, "unrecognized day of week"))
    }
}

//! Interpretation of user-supplied ban expirations.
//!
//! Accepted forms, surrounding whitespace ignored:
//!
//! * `never` (any case)
//! * an absolute UTC timestamp, `YYYY-MM-DDTHH:MM:SS`
//! * a relative offset from now, `+<count><unit>`, e.g. `+1day` or `+36 h`
//!
//! Everything else is rejected. Notably a bare `1day` is an error rather than
//! a guess at what was meant.

use std::fmt;

use time::{
    Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::BorrowedFormatItem, macros::format_description,
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const NEVER: &str = "never";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedExpiration {
    Never,
    At(OffsetDateTime),
}

impl ResolvedExpiration {
    pub fn from_deadline(deadline: Option<OffsetDateTime>) -> Self {
        deadline.map_or(Self::Never, Self::At)
    }

    /// `None` stands for "never expires" in storage.
    pub fn into_deadline(self) -> Option<OffsetDateTime> {
        match self {
            Self::Never => None,
            Self::At(instant) => Some(instant),
        }
    }
}

impl fmt::Display for ResolvedExpiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str(NEVER),
            Self::At(instant) => f.write_str(&format_instant(*instant)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpirationError {
    #[error("Invalid expiration timestamp or relative date '{raw}'")]
    Unrecognized { raw: String },

    #[error("Expiration '{raw}' is before the ban was set ({set_at})")]
    BeforeSetAt { raw: String, set_at: String },
}

impl ExpirationError {
    fn unrecognized(raw: &str) -> Self {
        Self::Unrecognized {
            raw: raw.to_string(),
        }
    }

    pub(crate) fn before_set_at(raw: &str, set_at: OffsetDateTime) -> Self {
        Self::BeforeSetAt {
            raw: raw.to_string(),
            set_at: format_instant(set_at),
        }
    }

    /// The input exactly as submitted.
    pub fn raw(&self) -> &str {
        match self {
            Self::Unrecognized { raw } | Self::BeforeSetAt { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl OffsetUnit {
    fn parse(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Self::Weeks),
            _ => None,
        }
    }

    fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 60 * 60,
            Self::Days => 24 * 60 * 60,
            Self::Weeks => 7 * 24 * 60 * 60,
        }
    }
}

/// Resolves `raw` against the reference instant `now`.
pub fn resolve(raw: &str, now: OffsetDateTime) -> Result<ResolvedExpiration, ExpirationError> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case(NEVER) {
        return Ok(ResolvedExpiration::Never);
    }

    if let Some(offset) = trimmed.strip_prefix('+') {
        return parse_offset(offset)
            .and_then(|offset| now.checked_add(offset))
            .map(ResolvedExpiration::At)
            .ok_or_else(|| ExpirationError::unrecognized(raw));
    }

    parse_instant(trimmed)
        .map(ResolvedExpiration::At)
        .ok_or_else(|| ExpirationError::unrecognized(raw))
}

/// Canonical, re-resolvable rendering of an instant.
pub fn format_instant(instant: OffsetDateTime) -> String {
    let utc = instant
        .checked_to_offset(UtcOffset::UTC)
        .unwrap_or(instant);
    utc.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| utc.to_string())
}

fn parse_instant(text: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn parse_offset(text: &str) -> Option<Duration> {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (count, suffix) = text.split_at(digits_end);

    if count.is_empty() {
        return None;
    }

    let count: i64 = count.parse().ok()?;
    let unit = OffsetUnit::parse(suffix.trim_start())?;
    let seconds = count.checked_mul(unit.seconds())?;

    Some(Duration::seconds(seconds))
}

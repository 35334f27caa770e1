//! # Civil Time Policy
//!
//! Business hours are defined in one civil timezone, whatever offset a caller
//! uses. The policy owns that timezone as an immutable value and answers two
//! questions: is an instant inside business hours, and how is an instant shown
//! back to callers.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::errors::{SchedulingError, SchedulingResult};

/// Timezone in which business hours are evaluated and results are rendered.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// First local hour that is inside business hours.
pub const OPENING_HOUR: u32 = 8;

/// First local hour that is outside business hours again.
pub const CLOSING_HOUR: u32 = 17;

/// Length of every bookable slot.
pub const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTimePolicy {
    timezone: Tz,
    opening_hour: u32,
    closing_hour: u32,
    slot_minutes: i64,
}

impl Default for CivilTimePolicy {
    fn default() -> Self {
        Self {
            timezone: REFERENCE_TIMEZONE,
            opening_hour: OPENING_HOUR,
            closing_hour: CLOSING_HOUR,
            slot_minutes: SLOT_MINUTES,
        }
    }
}

impl CivilTimePolicy {
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_minutes)
    }

    /// Returns true when `instant` falls Monday to Friday with a local hour in
    /// `[opening_hour, closing_hour)`.
    ///
    /// Only the hour is compared, so 16:45 local is still inside business
    /// hours even though a slot starting there ends after closing.
    pub fn is_business_hours(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.timezone);
        let weekday = local.weekday();
        weekday != Weekday::Sat
            && weekday != Weekday::Sun
            && local.hour() >= self.opening_hour
            && local.hour() < self.closing_hour
    }

    /// Returns true when the local minute of `instant` sits on a slot boundary.
    pub fn is_slot_aligned(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.timezone);
        i64::from(local.minute()) % self.slot_minutes == 0
    }

    /// Renders an instant as a wall clock in the reference timezone, keeping
    /// the offset that applied at that instant.
    pub fn to_display(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.timezone).fixed_offset()
    }

    /// Converts any offset-qualified timestamp into an absolute instant.
    pub fn to_reference<Z: chrono::TimeZone>(&self, timestamp: &DateTime<Z>) -> DateTime<Utc> {
        timestamp.with_timezone(&Utc)
    }

    /// Parses an RFC 3339 timestamp. A missing offset is a format error.
    pub fn parse_instant(&self, raw: &str) -> SchedulingResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|parsed| self.to_reference(&parsed))
            .map_err(|_| SchedulingError::invalid_timestamps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pacific(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        REFERENCE_TIMEZONE
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn opening_hour_is_inclusive_and_closing_hour_exclusive() {
        let policy = CivilTimePolicy::default();
        assert!(policy.is_business_hours(pacific(2019, 1, 24, 8, 0)));
        assert!(policy.is_business_hours(pacific(2019, 1, 24, 16, 30)));
        assert!(policy.is_business_hours(pacific(2019, 1, 24, 16, 45)));
        assert!(!policy.is_business_hours(pacific(2019, 1, 24, 17, 0)));
        assert!(!policy.is_business_hours(pacific(2019, 1, 24, 7, 59)));
    }

    #[test]
    fn weekends_are_closed() {
        let policy = CivilTimePolicy::default();
        for hour in 0..24 {
            assert!(!policy.is_business_hours(pacific(2019, 1, 20, hour, 0)));
            assert!(!policy.is_business_hours(pacific(2019, 1, 26, hour, 0)));
        }
    }

    #[test]
    fn weekday_is_taken_in_the_reference_timezone() {
        let policy = CivilTimePolicy::default();
        // Saturday 01:00 UTC is still Friday 17:00 in Los Angeles.
        let friday_evening = Utc.with_ymd_and_hms(2019, 1, 26, 1, 0, 0).unwrap();
        assert!(!policy.is_business_hours(friday_evening));
        // Saturday 00:30 UTC is Friday 16:30 in Los Angeles.
        let friday_afternoon = Utc.with_ymd_and_hms(2019, 1, 26, 0, 30, 0).unwrap();
        assert!(policy.is_business_hours(friday_afternoon));
    }

    #[test]
    fn alignment_uses_local_minutes() {
        let policy = CivilTimePolicy::default();
        assert!(policy.is_slot_aligned(pacific(2019, 1, 24, 9, 0)));
        assert!(policy.is_slot_aligned(pacific(2019, 1, 24, 9, 30)));
        assert!(!policy.is_slot_aligned(pacific(2019, 1, 24, 9, 15)));
    }

    #[test]
    fn parse_rejects_timestamps_without_offset() {
        let policy = CivilTimePolicy::default();
        assert!(policy.parse_instant("2019-01-24T09:00:00").is_err());
        assert!(policy.parse_instant("2019-01-24").is_err());
        assert!(policy.parse_instant("").is_err());
    }

    #[test]
    fn parse_accepts_utc_and_offsets_alike() {
        let policy = CivilTimePolicy::default();
        let utc = policy.parse_instant("2019-01-24T17:00:00Z").unwrap();
        let los_angeles = policy.parse_instant("2019-01-24T09:00:00-08:00").unwrap();
        let tokyo = policy.parse_instant("2019-01-25T02:00:00+09:00").unwrap();
        assert_eq!(utc, los_angeles);
        assert_eq!(utc, tokyo);
    }

    #[test]
    fn display_follows_daylight_saving() {
        let policy = CivilTimePolicy::default();
        let winter = policy.to_display(Utc.with_ymd_and_hms(2019, 1, 24, 17, 0, 0).unwrap());
        let summer = policy.to_display(Utc.with_ymd_and_hms(2019, 7, 24, 16, 0, 0).unwrap());
        assert_eq!(winter.to_rfc3339(), "2019-01-24T09:00:00-08:00");
        assert_eq!(summer.to_rfc3339(), "2019-07-24T09:00:00-07:00");
    }
}

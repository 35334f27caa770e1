//! # Slot Generator
//!
//! Walks a half-open range `[range_start, range_end)` in fixed steps and keeps
//! every step that is inside business hours and not already booked.
//!
//! The walk is anchored on `range_start` exactly as given. A caller passing a
//! misaligned range gets a misaligned grid back.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::{models::availability::AvailableSlot, policy::CivilTimePolicy};

/// Iterator over slot start instants from `cursor` up to, but excluding, `end`.
#[derive(Debug, Clone)]
pub struct SlotWalk {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl SlotWalk {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Self {
        Self {
            cursor: start,
            end,
            step,
        }
    }
}

impl Iterator for SlotWalk {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let current = self.cursor;
        self.cursor = current + self.step;
        Some(current)
    }
}

/// Produces the free slots of `[range_start, range_end)` in ascending order.
///
/// `booked` holds the start instants of existing appointments; a candidate is
/// dropped on an exact instant match.
pub fn free_slots(
    policy: &CivilTimePolicy,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    booked: &HashSet<DateTime<Utc>>,
) -> Vec<AvailableSlot> {
    let step = policy.slot_duration();

    SlotWalk::new(range_start, range_end, step)
        .filter(|start| policy.is_business_hours(*start) && !booked.contains(start))
        .map(|start| AvailableSlot {
            starts_at: policy.to_display(start),
            ends_at: policy.to_display(start + step),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::policy::REFERENCE_TIMEZONE;

    fn pacific(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        REFERENCE_TIMEZONE
            .with_ymd_and_hms(2019, 1, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn walk_is_half_open() {
        let step = Duration::minutes(30);
        let starts: Vec<_> = SlotWalk::new(pacific(24, 8, 0), pacific(24, 9, 0), step).collect();
        assert_eq!(starts, vec![pacific(24, 8, 0), pacific(24, 8, 30)]);
    }

    #[test]
    fn empty_or_inverted_range_yields_nothing() {
        let policy = CivilTimePolicy::default();
        let booked = HashSet::new();
        assert!(free_slots(&policy, pacific(24, 9, 0), pacific(24, 9, 0), &booked).is_empty());
        assert!(free_slots(&policy, pacific(24, 12, 0), pacific(24, 9, 0), &booked).is_empty());
    }

    #[test]
    fn full_day_has_eighteen_slots() {
        let policy = CivilTimePolicy::default();
        let slots = free_slots(&policy, pacific(24, 0, 0), pacific(25, 0, 0), &HashSet::new());
        assert_eq!(slots.len(), 18);
        assert_eq!(slots[0].starts_at.to_rfc3339(), "2019-01-24T08:00:00-08:00");
        assert_eq!(slots[17].starts_at.to_rfc3339(), "2019-01-24T16:30:00-08:00");
        assert_eq!(slots[17].ends_at.to_rfc3339(), "2019-01-24T17:00:00-08:00");
    }

    #[test]
    fn booked_instants_are_skipped() {
        let policy = CivilTimePolicy::default();
        let booked: HashSet<_> = [pacific(24, 9, 0), pacific(24, 16, 30)].into_iter().collect();
        let slots = free_slots(&policy, pacific(24, 8, 0), pacific(24, 17, 0), &booked);
        assert_eq!(slots.len(), 16);
        assert!(slots.iter().all(|slot| slot.starts_at.to_rfc3339() != "2019-01-24T09:00:00-08:00"));
    }

    #[test]
    fn misaligned_range_keeps_its_anchor() {
        let policy = CivilTimePolicy::default();
        let slots = free_slots(&policy, pacific(24, 8, 10), pacific(24, 9, 10), &HashSet::new());
        let starts: Vec<_> = slots.iter().map(|slot| slot.starts_at.to_rfc3339()).collect();
        assert_eq!(
            starts,
            vec!["2019-01-24T08:10:00-08:00", "2019-01-24T08:40:00-08:00"]
        );
    }

    #[test]
    fn slots_are_ascending() {
        let policy = CivilTimePolicy::default();
        let slots = free_slots(&policy, pacific(21, 0, 0), pacific(26, 0, 0), &HashSet::new());
        assert_eq!(slots.len(), 18 * 5);
        assert!(slots.windows(2).all(|pair| pair[0].starts_at < pair[1].starts_at));
    }
}

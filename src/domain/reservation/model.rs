//! Reservation domain entity and slot rules

use chrono::{Duration, NaiveDateTime};

use crate::shared::SlotViolation;

/// Longest bookable slot.
pub const MAX_SLOT_MINUTES: i64 = 30;

/// A `[start, end]` booking interval. Bounds are inclusive when compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Slot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks the slot against `now`, first failing rule wins.
    pub fn validate(&self, now: NaiveDateTime) -> Result<(), SlotViolation> {
        if self.start < now {
            return Err(SlotViolation::PastStart);
        }
        if self.start >= self.end {
            return Err(SlotViolation::InvertedInterval);
        }
        if self.duration() > Duration::minutes(MAX_SLOT_MINUTES) {
            return Err(SlotViolation::DurationExceeded);
        }
        Ok(())
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    /// Conflict rule: either endpoint of `self` lies inside `existing`.
    ///
    /// This is endpoint containment, not interval intersection. A candidate
    /// that strictly surrounds `existing` is not reported.
    pub fn touches(&self, existing: &Slot) -> bool {
        existing.contains(self.start) || existing.contains(self.end)
    }
}

/// Persisted reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i32,
    pub place_id: i32,
    pub user_id: i32,
    pub slot: Slot,
}

impl Reservation {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Reservation fields without the store-assigned id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub place_id: i32,
    pub user_id: i32,
    pub slot: Slot,
}

/// Conflict query: reservations on `place_id` OR by `user_id` whose
/// interval is touched by `slot`, skipping `exclude_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapProbe {
    pub place_id: i32,
    pub user_id: i32,
    pub slot: Slot,
    pub exclude_id: Option<i32>,
}

impl OverlapProbe {
    /// In-process form of the store query.
    pub fn matches(&self, candidate: &Reservation) -> bool {
        if self.exclude_id == Some(candidate.id) {
            return false;
        }
        let related = candidate.place_id == self.place_id || candidate.user_id == self.user_id;
        related && self.slot.touches(&candidate.slot)
    }
}

/// Reservation joined with its owner and place location, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetails {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub place_id: i32,
    pub place_number: i32,
    pub city: String,
    pub street: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Filter for detail listings. Empty filter selects everything.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    /// Keep only reservations ending at or after this instant.
    pub ends_at_or_after: Option<NaiveDateTime>,
}

// ── Tests ──────────────────────────────────────────────────────

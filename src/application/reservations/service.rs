//! Reservation lifecycle: validation, conflict checks and writes
//!
//! Every write goes through the same gate: slot rules against the clock,
//! then the conflict check, then the store. Writes touching the same place
//! are serialised inside the process so two requests cannot both pass the
//! conflict check for one place.

use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::conflict::ConflictDetector;
use crate::domain::{
    Clock, DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation,
    ReservationDetails, ReservationFilter, Slot, SlotViolation,
};
use crate::shared::Upserted;

/// Location of a place as users know it
#[derive(Debug, Clone)]
pub struct PlaceLocation {
    pub number: i32,
    pub city: String,
    pub street: String,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
    conflicts: ConflictDetector,
    place_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            conflicts: ConflictDetector::new(repos.clone()),
            repos,
            clock,
            place_locks: DashMap::new(),
        }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Book `slot` on a place for a user.
    pub async fn create(&self, place_id: i32, user_id: i32, slot: Slot) -> DomainResult<Reservation> {
        if !self.repos.places().exists(place_id).await? {
            return Err(DomainError::not_found("Smoking place", place_id));
        }

        let _guard = self.lock_place(place_id).await;
        self.admit(place_id, user_id, slot, None).await?;

        let record = NewReservation {
            place_id,
            user_id,
            slot,
        };
        let created = self.repos.reservations().insert(record, None).await?;
        self.record_created(&created);
        Ok(created)
    }

    /// PUT on a user's own reservation. The place is addressed by location.
    pub async fn replace_owned(
        &self,
        id: i32,
        user_id: i32,
        location: &PlaceLocation,
        slot: Slot,
    ) -> DomainResult<Upserted<Reservation>> {
        slot.validate(self.clock.now()).map_err(reject)?;

        let place_id = self
            .repos
            .places()
            .find_id_by_location(location.number, &location.city, &location.street)
            .await?
            .ok_or_else(|| DomainError::Validation("You entered the wrong address".to_string()))?;

        if let Some(existing) = self.repos.reservations().find_by_id(id).await? {
            if !existing.is_owned_by(user_id) {
                return Err(DomainError::Ownership { reservation_id: id });
            }
        }

        self.upsert(
            id,
            NewReservation {
                place_id,
                user_id,
                slot,
            },
            Overwrite::PlaceAndSlot,
        )
        .await
    }

    /// Unscoped PUT. Place and user must both exist.
    pub async fn admin_replace(
        &self,
        id: i32,
        place_id: i32,
        user_id: i32,
        slot: Slot,
    ) -> DomainResult<Upserted<Reservation>> {
        if !self.repos.places().exists(place_id).await? {
            return Err(DomainError::not_found("Smoking place", place_id));
        }
        if self.repos.users().get_user_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }

        self.upsert(
            id,
            NewReservation {
                place_id,
                user_id,
                slot,
            },
            Overwrite::Everything,
        )
        .await
    }

    /// Delete a reservation only when `user_id` owns it. Someone else's
    /// reservation reports as missing.
    pub async fn delete_owned(&self, id: i32, user_id: i32) -> DomainResult<()> {
        if !self.repos.reservations().delete_owned(id, user_id).await? {
            return Err(DomainError::not_found("Reservation", id));
        }
        info!(reservation_id = id, user_id, "Reservation deleted");
        Ok(())
    }

    pub async fn delete_any(&self, id: i32) -> DomainResult<()> {
        if !self.repos.reservations().delete(id).await? {
            return Err(DomainError::not_found("Reservation", id));
        }
        info!(reservation_id = id, "Reservation deleted by admin");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Reservations that have not ended yet
    pub async fn upcoming(&self) -> DomainResult<Vec<ReservationDetails>> {
        self.repos
            .reservations()
            .list_details(ReservationFilter {
                ends_at_or_after: Some(self.clock.now()),
                ..Default::default()
            })
            .await
    }

    pub async fn upcoming_for_user(&self, user_id: i32) -> DomainResult<Vec<ReservationDetails>> {
        self.repos
            .reservations()
            .list_details(ReservationFilter {
                user_id: Some(user_id),
                ends_at_or_after: Some(self.clock.now()),
                ..Default::default()
            })
            .await
    }

    /// Every reservation, past ones included
    pub async fn all(&self) -> DomainResult<Vec<ReservationDetails>> {
        self.repos
            .reservations()
            .list_details(ReservationFilter::default())
            .await
    }

    pub async fn get_for_user(&self, user_id: i32, id: i32) -> DomainResult<ReservationDetails> {
        self.first_detail(ReservationFilter {
            id: Some(id),
            user_id: Some(user_id),
            ..Default::default()
        })
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    pub async fn get(&self, id: i32) -> DomainResult<ReservationDetails> {
        self.first_detail(ReservationFilter {
            id: Some(id),
            ..Default::default()
        })
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    // ── Internals ───────────────────────────────────────────────

    async fn first_detail(
        &self,
        filter: ReservationFilter,
    ) -> DomainResult<Option<ReservationDetails>> {
        let rows = self.repos.reservations().list_details(filter).await?;
        Ok(rows.into_iter().next())
    }

    async fn lock_place(&self, place_id: i32) -> PlaceGuard<'_> {
        let lock = self.place_locks.entry(place_id).or_default().clone();
        PlaceGuard {
            locks: &self.place_locks,
            place_id,
            held: Some(lock.lock_owned().await),
        }
    }

    /// Slot rules then conflicts, first failure wins.
    async fn admit(
        &self,
        place_id: i32,
        user_id: i32,
        slot: Slot,
        exclude_id: Option<i32>,
    ) -> DomainResult<()> {
        slot.validate(self.clock.now()).map_err(reject)?;

        if let Some(existing) = self
            .conflicts
            .find_conflict(place_id, user_id, slot, exclude_id)
            .await?
        {
            debug!(
                place_id,
                user_id,
                conflicting_id = existing.id,
                "Reservation slot conflicts"
            );
            return Err(reject(SlotViolation::Conflict));
        }
        Ok(())
    }

    async fn upsert(
        &self,
        id: i32,
        record: NewReservation,
        overwrite: Overwrite,
    ) -> DomainResult<Upserted<Reservation>> {
        let _guard = self.lock_place(record.place_id).await;
        self.admit(record.place_id, record.user_id, record.slot, Some(id))
            .await?;

        let reservations = self.repos.reservations();
        if reservations.exists(id).await? {
            let updated = match overwrite {
                Overwrite::Everything => reservations.replace(id, record).await?,
                Overwrite::PlaceAndSlot => {
                    reservations
                        .update(id, record.place_id, record.slot)
                        .await?
                }
            };
            info!(reservation_id = id, place_id = updated.place_id, "Reservation replaced");
            Ok(Upserted::Updated(updated))
        } else {
            let created = reservations.insert(record, Some(id)).await?;
            self.record_created(&created);
            Ok(Upserted::Created(created))
        }
    }

    fn record_created(&self, reservation: &Reservation) {
        counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            place_id = reservation.place_id,
            user_id = reservation.user_id,
            start = %reservation.slot.start,
            end = %reservation.slot.end,
            "Reservation created"
        );
    }
}

/// Which fields a PUT on an existing reservation rewrites
#[derive(Debug, Clone, Copy)]
enum Overwrite {
    Everything,
    /// Owner stays as stored
    PlaceAndSlot,
}

/// Per-place write lock. The map entry goes away with the last holder so
/// the map only tracks places with writes in flight.
struct PlaceGuard<'a> {
    locks: &'a DashMap<i32, Arc<Mutex<()>>>,
    place_id: i32,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for PlaceGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());
        // entry() and remove_if() share the shard lock, so a waiter that
        // already cloned the Arc keeps the entry alive
        self.locks
            .remove_if(&self.place_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

fn reject(violation: SlotViolation) -> DomainError {
    counter!("reservation_rejections_total", "reason" => violation.as_str()).increment(1);
    DomainError::Slot(violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{at, seed_place, seed_user, TestEnv};
    use chrono::Duration;

    struct Fixture {
        env: TestEnv,
        service: ReservationService,
        user: i32,
        place: i32,
    }

    async fn fixture() -> Fixture {
        let env = TestEnv::new(at(9, 0)).await;
        let user = seed_user(&env, "alice").await;
        let place = seed_place(&env, "Lenina", 1).await;
        let service = ReservationService::new(env.repos.clone(), env.clock.clone());
        Fixture {
            env,
            service,
            user,
            place,
        }
    }

    fn lenina(number: i32) -> PlaceLocation {
        PlaceLocation {
            number,
            city: "Moscow".into(),
            street: "Lenina".into(),
        }
    }

    fn slot_err(result: DomainResult<impl std::fmt::Debug>) -> SlotViolation {
        match result {
            Err(DomainError::Slot(v)) => v,
            other => panic!("expected slot violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_books_a_valid_slot() {
        let f = fixture().await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();
        assert_eq!(r.place_id, f.place);
        assert!(f.env.repos.reservations().exists(r.id).await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_in_rule_order() {
        let f = fixture().await;
        let s = &f.service;

        let err = s.create(f.place, f.user, Slot::new(at(8, 0), at(7, 0))).await;
        assert_eq!(slot_err(err), SlotViolation::PastStart);

        let err = s.create(f.place, f.user, Slot::new(at(10, 0), at(10, 0))).await;
        assert_eq!(slot_err(err), SlotViolation::InvertedInterval);

        let err = s.create(f.place, f.user, Slot::new(at(10, 0), at(10, 31))).await;
        assert_eq!(slot_err(err), SlotViolation::DurationExceeded);

        assert!(f.service.upcoming().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_on_missing_place_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create(999, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn overlapping_booking_is_a_conflict() {
        let f = fixture().await;
        let bob = seed_user(&f.env, "bob").await;
        f.service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        let err = f
            .service
            .create(f.place, bob, Slot::new(at(10, 15), at(10, 45)))
            .await;
        assert_eq!(slot_err(err), SlotViolation::Conflict);

        let disjoint = f
            .service
            .create(f.place, bob, Slot::new(at(9, 30), at(9, 59)))
            .await
            .unwrap();
        assert_eq!(disjoint.user_id, bob);
    }

    #[tokio::test]
    async fn replace_with_own_interval_succeeds() {
        let f = fixture().await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        let out = f
            .service
            .replace_owned(r.id, f.user, &lenina(1), r.slot)
            .await
            .unwrap();
        assert!(!out.is_created());
        assert_eq!(out.into_inner().slot, r.slot);
    }

    #[tokio::test]
    async fn replace_owned_moves_place_and_keeps_owner() {
        let f = fixture().await;
        let second = seed_place(&f.env, "Lenina", 2).await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        let moved = Slot::new(at(12, 0), at(12, 25));
        let out = f
            .service
            .replace_owned(r.id, f.user, &lenina(2), moved)
            .await
            .unwrap();
        assert!(!out.is_created());

        let stored = f.env.repos.reservations().find_by_id(r.id).await.unwrap().unwrap();
        assert_eq!(stored.place_id, second);
        assert_eq!(stored.slot, moved);
        assert_eq!(stored.user_id, f.user);
    }

    #[tokio::test]
    async fn place_locks_are_released_after_writes() {
        let f = fixture().await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();
        f.service
            .replace_owned(r.id, f.user, &lenina(1), Slot::new(at(11, 0), at(11, 30)))
            .await
            .unwrap();
        let _ = f
            .service
            .create(f.place, f.user, Slot::new(at(11, 10), at(11, 20)))
            .await
            .unwrap_err();

        assert!(f.service.place_locks.is_empty());
    }

    #[tokio::test]
    async fn replace_unknown_id_creates_it() {
        let f = fixture().await;
        let out = f
            .service
            .replace_owned(55, f.user, &lenina(1), Slot::new(at(11, 0), at(11, 20)))
            .await
            .unwrap();
        assert!(out.is_created());
        assert_eq!(out.into_inner().id, 55);
    }

    #[tokio::test]
    async fn replace_with_wrong_location_is_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .replace_owned(1, f.user, &lenina(7), Slot::new(at(11, 0), at(11, 20)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You entered the wrong address");
    }

    #[tokio::test]
    async fn replace_of_foreign_reservation_is_forbidden() {
        let f = fixture().await;
        let bob = seed_user(&f.env, "bob").await;
        let r = f
            .service
            .create(f.place, bob, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        let err = f
            .service
            .replace_owned(r.id, f.user, &lenina(1), Slot::new(at(12, 0), at(12, 10)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Ownership { reservation_id } if reservation_id == r.id));
    }

    #[tokio::test]
    async fn delete_of_foreign_reservation_is_not_found() {
        let f = fixture().await;
        let bob = seed_user(&f.env, "bob").await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        let err = f.service.delete_owned(r.id, bob).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(f.env.repos.reservations().exists(r.id).await.unwrap());

        f.service.delete_owned(r.id, f.user).await.unwrap();
        assert!(!f.env.repos.reservations().exists(r.id).await.unwrap());
    }

    #[tokio::test]
    async fn admin_replace_checks_references() {
        let f = fixture().await;
        let slot = Slot::new(at(10, 0), at(10, 30));

        let err = f.service.admin_replace(1, 404, f.user, slot).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Smoking place", .. }));

        let err = f.service.admin_replace(1, f.place, 404, slot).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));

        let out = f.service.admin_replace(1, f.place, f.user, slot).await.unwrap();
        assert!(out.is_created());
        let out = f.service.admin_replace(1, f.place, f.user, slot).await.unwrap();
        assert!(!out.is_created());
    }

    #[tokio::test]
    async fn upcoming_skips_finished_reservations() {
        let f = fixture().await;
        f.service
            .create(f.place, f.user, Slot::new(at(9, 0), at(9, 20)))
            .await
            .unwrap();
        f.service
            .create(f.place, f.user, Slot::new(at(11, 0), at(11, 20)))
            .await
            .unwrap();

        f.env.clock.advance(Duration::hours(1));
        let upcoming = f.service.upcoming_for_user(f.user).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].start, at(11, 0));
        assert_eq!(upcoming[0].username, "alice");
        assert_eq!(upcoming[0].street, "Lenina");

        assert_eq!(f.service.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_for_user_hides_other_users_reservations() {
        let f = fixture().await;
        let bob = seed_user(&f.env, "bob").await;
        let r = f
            .service
            .create(f.place, f.user, Slot::new(at(10, 0), at(10, 30)))
            .await
            .unwrap();

        assert_eq!(f.service.get_for_user(f.user, r.id).await.unwrap().id, r.id);
        assert!(f.service.get_for_user(bob, r.id).await.is_err());
        assert_eq!(f.service.get(r.id).await.unwrap().user_id, f.user);
    }
}

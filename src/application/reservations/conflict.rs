//! Reservation conflict detection

use std::sync::Arc;

use crate::domain::{DomainResult, OverlapProbe, RepositoryProvider, Reservation, Slot};

/// Finds existing reservations that block a candidate slot.
///
/// A reservation blocks the candidate when it sits on the same place or
/// belongs to the same user and one of the candidate's endpoints falls
/// inside it (bounds inclusive).
pub struct ConflictDetector {
    repos: Arc<dyn RepositoryProvider>,
}

impl ConflictDetector {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn find_conflict(
        &self,
        place_id: i32,
        user_id: i32,
        slot: Slot,
        exclude_id: Option<i32>,
    ) -> DomainResult<Option<Reservation>> {
        let probe = OverlapProbe {
            place_id,
            user_id,
            slot,
            exclude_id,
        };
        self.repos.reservations().find_overlapping(&probe).await
    }

    pub async fn has_conflict(
        &self,
        place_id: i32,
        user_id: i32,
        slot: Slot,
        exclude_id: Option<i32>,
    ) -> DomainResult<bool> {
        Ok(self
            .find_conflict(place_id, user_id, slot, exclude_id)
            .await?
            .is_some())
    }
}

//! Point-in-time place occupancy

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::{Clock, DomainResult, RepositoryProvider};

/// Occupancy of a place at the moment it was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceStatus {
    Free,
    OccupiedUntil(NaiveDateTime),
}

impl fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::OccupiedUntil(end) => write!(f, "occupied until {}", end),
        }
    }
}

pub struct OccupancyResolver {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl OccupancyResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Occupied when a reservation on the place contains `now`, inclusive.
    pub async fn status(&self, place_id: i32) -> DomainResult<PlaceStatus> {
        let now = self.clock.now();
        let current = self.repos.reservations().occupying(place_id, now).await?;
        Ok(match current {
            Some(r) => PlaceStatus::OccupiedUntil(r.slot.end),
            None => PlaceStatus::Free,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{at, seed_place, seed_user, TestEnv};
    use crate::domain::{NewReservation, Slot};
    use chrono::Duration;

    #[test]
    fn status_renders_exact_strings() {
        assert_eq!(PlaceStatus::Free.to_string(), "free");
        assert_eq!(
            PlaceStatus::OccupiedUntil(at(10, 30)).to_string(),
            "occupied until 2030-05-01 10:30:00"
        );
    }

    #[tokio::test]
    async fn status_follows_the_clock() {
        let env = TestEnv::new(at(9, 0)).await;
        let user = seed_user(&env, "owner").await;
        let place = seed_place(&env, "Lenina", 1).await;
        env.repos
            .reservations()
            .insert(
                NewReservation {
                    place_id: place,
                    user_id: user,
                    slot: Slot::new(at(10, 0), at(10, 30)),
                },
                None,
            )
            .await
            .unwrap();

        let resolver = OccupancyResolver::new(env.repos.clone(), env.clock.clone());

        // future reservation does not count yet
        assert_eq!(resolver.status(place).await.unwrap(), PlaceStatus::Free);

        env.clock.set(at(10, 15));
        assert_eq!(
            resolver.status(place).await.unwrap(),
            PlaceStatus::OccupiedUntil(at(10, 30))
        );

        env.clock.set(at(10, 30));
        assert_eq!(
            resolver.status(place).await.unwrap(),
            PlaceStatus::OccupiedUntil(at(10, 30))
        );

        env.clock.advance(Duration::minutes(1));
        assert_eq!(resolver.status(place).await.unwrap(), PlaceStatus::Free);
    }
}

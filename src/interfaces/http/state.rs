//! Shared router state

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::application::{CatalogService, ReservationService, UserService};
use crate::interfaces::http::middleware::AuthState;
use crate::interfaces::http::modules::health::HealthState;

/// Services behind every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub reservations: Arc<ReservationService>,
    pub users: Arc<UserService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

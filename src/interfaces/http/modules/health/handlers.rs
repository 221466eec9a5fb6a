//! Liveness and readiness report

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::database::migrator::Migrator;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
    pub schema: SchemaHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
}

/// Migrations not yet applied, e.g. after starting with `--no-migrate`
#[derive(Debug, Serialize, ToSchema)]
pub struct SchemaHealth {
    pub status: HealthStatus,
    pub pending_migrations: Option<usize>,
}

async fn ping(db: &DatabaseConnection) -> ComponentHealth {
    let started = Instant::now();
    let probe = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(probe).await {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Ok,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            ComponentHealth {
                status: HealthStatus::Error,
                latency_ms: None,
            }
        }
    }
}

async fn check_schema(db: &DatabaseConnection) -> SchemaHealth {
    match Migrator::get_pending_migrations(db).await {
        Ok(pending) if pending.is_empty() => SchemaHealth {
            status: HealthStatus::Ok,
            pending_migrations: Some(0),
        },
        Ok(pending) => SchemaHealth {
            status: HealthStatus::Degraded,
            pending_migrations: Some(pending.len()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Cannot read migration state");
            SchemaHealth {
                status: HealthStatus::Error,
                pending_migrations: None,
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable and schema current", body = HealthResponse),
        (status = 503, description = "Database unreachable or migrations pending", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ping(&state.db).await;
    let schema = if database.status == HealthStatus::Ok {
        check_schema(&state.db).await
    } else {
        SchemaHealth {
            status: HealthStatus::Error,
            pending_migrations: None,
        }
    };

    let status = match (database.status, schema.status) {
        (HealthStatus::Ok, HealthStatus::Ok) => HealthStatus::Ok,
        (HealthStatus::Ok, _) => HealthStatus::Degraded,
        _ => HealthStatus::Error,
    };
    let code = match status {
        HealthStatus::Ok => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            schema,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{init_and_migrate, init_database, DatabaseConfig};

    fn state(db: DatabaseConnection) -> State<HealthState> {
        State(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        })
    }

    #[tokio::test]
    async fn migrated_database_is_healthy() {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();

        let (code, Json(body)) = health_check(state(db)).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, HealthStatus::Ok);
        assert_eq!(body.schema.pending_migrations, Some(0));
    }

    #[tokio::test]
    async fn unmigrated_database_is_degraded() {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();

        let (code, Json(body)) = health_check(state(db)).await;

        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, HealthStatus::Degraded);
        assert_eq!(body.database.status, HealthStatus::Ok);
        assert!(body.schema.pending_migrations.unwrap() > 0);
    }
}

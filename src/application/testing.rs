//! Shared fixtures for service and HTTP tests

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

use crate::domain::{CreateUserDto, FixedClock, RepositoryProvider, UserRole};
use crate::infrastructure::{init_and_migrate, DatabaseConfig, SeaOrmRepositoryProvider};

pub(crate) struct TestEnv {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: Arc<FixedClock>,
}

impl TestEnv {
    pub async fn new(now: NaiveDateTime) -> Self {
        let db = init_and_migrate(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory database");
        Self {
            repos: Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
            db,
            clock: Arc::new(FixedClock::new(now)),
        }
    }
}

/// `h:m` on the fixed test day
pub(crate) fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 5, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub(crate) async fn seed_user_with_role(env: &TestEnv, username: &str, role: UserRole) -> i32 {
    env.repos
        .users()
        .create_user(CreateUserDto {
            username: username.to_string(),
            password_hash: "not-a-hash".to_string(),
            name: username.to_string(),
            email: format!("{}@example.com", username),
            role,
        })
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_user(env: &TestEnv, username: &str) -> i32 {
    seed_user_with_role(env, username, UserRole::User).await
}

/// Place `number` on `street` in Moscow, creating the address on first use
pub(crate) async fn seed_place(env: &TestEnv, street: &str, number: i32) -> i32 {
    let addresses = env.repos.addresses().list().await.unwrap();
    let address_id = match addresses.into_iter().find(|a| a.street == street) {
        Some(a) => a.id,
        None => env
            .repos
            .addresses()
            .insert("Moscow", street, None)
            .await
            .unwrap()
            .id,
    };
    env.repos
        .places()
        .insert(address_id, number, None)
        .await
        .unwrap()
        .id
}

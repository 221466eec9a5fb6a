use async_trait::async_trait;

use super::{CreateUserDto, User, UserRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_role(&self, id: i32, role: UserRole) -> DomainResult<Option<User>>;

    /// Delete the user and their reservations atomically
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}

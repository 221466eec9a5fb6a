//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::{CreateUserDto, DomainResult, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::{reservation, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

impl From<user::UserRole> for UserRole {
    fn from(role: user::UserRole) -> Self {
        match role {
            user::UserRole::Admin => Self::Admin,
            user::UserRole::User => Self::User,
        }
    }
}

impl From<UserRole> for user::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            password_hash: m.password_hash,
            name: m.name,
            email: m.email,
            role: m.role.into(),
        }
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            username: Set(dto.username),
            password_hash: Set(dto.password_hash),
            name: Set(dto.name),
            email: Set(dto.email),
            role: Set(dto.role.into()),
            ..Default::default()
        };

        let saved = new_user.insert(&self.db).await.map_err(db_err)?;
        Ok(saved.into())
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(User::from))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn update_role(&self, id: i32, role: UserRole) -> DomainResult<Option<User>> {
        let Some(model) = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = model.into();
        active.role = Set(role.into());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(saved.into()))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        reservation::Entity::delete_many()
            .filter(reservation::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

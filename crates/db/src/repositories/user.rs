//! User repository for database operations.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::users;

/// User repository for lookups and attendance updates.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Updates a user's attendance flag.
    ///
    /// Returns `None` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_absence(
        &self,
        user_id: Uuid,
        is_absent: bool,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let mut active: users::ActiveModel = user.into();
        active.is_absent = Set(is_absent);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;
        Ok(Some(updated))
    }
}

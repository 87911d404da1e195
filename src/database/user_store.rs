// ==================== USER STORE ====================
// Contrato do document store consumido pelo loop de simulação e pela API.
// Implementações: MongoDB (produção) e InMemoryUserStore (testes / demo sem banco).

use crate::{
    database::{MongoDB, USERS_COLLECTION},
    models::{User, ACTIVE_MINUTES_FIELD},
    utils::AppError,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Upsert por id
    async fn save(&self, user: User) -> Result<User, AppError>;

    async fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, AppError> {
        let mut saved = Vec::with_capacity(users.len());
        for user in users {
            saved.push(self.save(user).await?);
        }
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Incremento atômico no servidor; falha com `NotFound` se o documento não existe
    async fn increment_counter(&self, id: &str, field: &str, delta: i64) -> Result<(), AppError>;

    /// Documentos com `field > min_exclusive`, ordenados por `field` desc e `id` asc
    async fn query_top_by_field_desc(
        &self,
        field: &str,
        min_exclusive: i64,
        limit: usize,
    ) -> Result<Vec<User>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Só o contador de minutos ativos é numérico/consultável
pub fn ensure_counter_field(field: &str) -> Result<(), AppError> {
    if field != ACTIVE_MINUTES_FIELD {
        return Err(AppError::InvalidRequest(format!("field '{}' is not a counter", field)));
    }
    Ok(())
}

/// `limit` zero no MongoDB significa "sem limite"; não aceito em nenhum backend
pub fn validate_limit(limit: usize) -> Result<(), AppError> {
    if limit == 0 {
        return Err(AppError::InvalidRequest("query limit must be at least 1".to_string()));
    }
    Ok(())
}

/// Valida um pedido de incremento antes de chegar ao store; o contador nunca diminui.
pub fn validate_increment(field: &str, delta: i64) -> Result<(), AppError> {
    ensure_counter_field(field)?;
    if delta <= 0 {
        return Err(AppError::InvalidRequest(format!(
            "counter delta must be positive, got {}",
            delta
        )));
    }
    Ok(())
}

#[async_trait]
impl UserStore for MongoDB {
    async fn save(&self, user: User) -> Result<User, AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        collection
            .replace_one(doc! { "_id": &user.id }, &user)
            .upsert(true)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);
        Ok(collection.find_one(doc! { "_id": id }).await?)
    }

    async fn increment_counter(&self, id: &str, field: &str, delta: i64) -> Result<(), AppError> {
        validate_increment(field, delta)?;

        let collection = self.collection::<User>(USERS_COLLECTION);

        let result = collection
            .update_one(doc! { "_id": id }, doc! { "$inc": { field: delta } })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("user '{}'", id)));
        }

        Ok(())
    }

    async fn query_top_by_field_desc(
        &self,
        field: &str,
        min_exclusive: i64,
        limit: usize,
    ) -> Result<Vec<User>, AppError> {
        ensure_counter_field(field)?;
        validate_limit(limit)?;

        let collection = self.collection::<User>(USERS_COLLECTION);

        let cursor = collection
            .find(doc! { field: { "$gt": min_exclusive } })
            .sort(doc! { field: -1, "_id": 1 })
            .limit(limit as i64)
            .await?;

        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_increment() {
        assert!(validate_increment(ACTIVE_MINUTES_FIELD, 1).is_ok());
        assert!(matches!(
            validate_increment(ACTIVE_MINUTES_FIELD, 0),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            validate_increment(ACTIVE_MINUTES_FIELD, -3),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            validate_increment("firstname", 1),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(50).is_ok());
        assert!(matches!(validate_limit(0), Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_increment_and_leader() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/activitytracker_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        db.save(User::new("mongo-test-a", "Ann", "Test")).await.unwrap();
        db.increment_counter("mongo-test-a", ACTIVE_MINUTES_FIELD, 1).await.unwrap();

        let user = db.find_by_id("mongo-test-a").await.unwrap().unwrap();
        assert_eq!(user.active_minutes, 1);

        let missing = db.increment_counter("mongo-test-missing", ACTIVE_MINUTES_FIELD, 1).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}

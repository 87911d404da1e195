// Store em memória com a mesma semântica do MongoDB: upsert por id,
// incremento atômico (sob o lock) e consulta top-N por campo.

use crate::{
    database::user_store::{ensure_counter_field, validate_increment, validate_limit, UserStore},
    models::User,
    utils::AppError,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AppError {
        AppError::DatabaseError("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.get(id).cloned())
    }

    async fn increment_counter(&self, id: &str, field: &str, delta: i64) -> Result<(), AppError> {
        validate_increment(field, delta)?;

        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", id)))?;

        user.active_minutes = user
            .active_minutes
            .checked_add(delta)
            .ok_or_else(|| AppError::InvalidRequest(format!("counter overflow for user '{}'", id)))?;
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

        let users = self.users.read().map_err(|_| Self::poisoned())?;

        // BTreeMap itera por id asc; sort estável preserva o desempate
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| u.active_minutes > min_exclusive)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.active_minutes.cmp(&a.active_minutes));
        matching.truncate(limit);

        Ok(matching)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ACTIVE_MINUTES_FIELD;
    use std::sync::Arc;

    async fn seeded() -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        store
            .save_all(vec![User::new("johnd", "John", "Doe"), User::new("daved", "Dave", "Doe")])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let store = seeded().await;
        store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 3).await.unwrap();

        store.save(User::new("johnd", "Johnny", "Doe")).await.unwrap();

        let john = store.find_by_id("johnd").await.unwrap().unwrap();
        assert_eq!(john.firstname, "Johnny");
        assert_eq!(john.active_minutes, 0);
    }

    #[tokio::test]
    async fn test_increment_missing_document_fails() {
        let store = seeded().await;
        let result = store.increment_counter("nobody", ACTIVE_MINUTES_FIELD, 1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(seeded().await);

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 1).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 1).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let john = store.find_by_id("johnd").await.unwrap().unwrap();
        assert_eq!(john.active_minutes, 2);
    }

    #[tokio::test]
    async fn test_query_top_orders_desc_with_id_tiebreak() {
        let store = seeded().await;
        store.save(User::new("annab", "Anna", "Bell")).await.unwrap();
        store.increment_counter("daved", ACTIVE_MINUTES_FIELD, 4).await.unwrap();
        store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 4).await.unwrap();
        store.increment_counter("annab", ACTIVE_MINUTES_FIELD, 2).await.unwrap();

        let top = store.query_top_by_field_desc(ACTIVE_MINUTES_FIELD, 0, 10).await.unwrap();
        let ids: Vec<&str> = top.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["daved", "johnd", "annab"]);

        let first = store.query_top_by_field_desc(ACTIVE_MINUTES_FIELD, 0, 1).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "daved");

        let above_three = store.query_top_by_field_desc(ACTIVE_MINUTES_FIELD, 3, 10).await.unwrap();
        assert_eq!(above_three.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_overflow_is_rejected_and_store_stays_usable() {
        let store = seeded().await;
        store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, i64::MAX).await.unwrap();

        let overflow = store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 1).await;
        assert!(matches!(overflow, Err(AppError::InvalidRequest(_))));

        let john = store.find_by_id("johnd").await.unwrap().unwrap();
        assert_eq!(john.active_minutes, i64::MAX);
        store.increment_counter("daved", ACTIVE_MINUTES_FIELD, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_rejects_zero_limit() {
        let store = seeded().await;
        store.increment_counter("johnd", ACTIVE_MINUTES_FIELD, 1).await.unwrap();

        let result = store.query_top_by_field_desc(ACTIVE_MINUTES_FIELD, 0, 0).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}

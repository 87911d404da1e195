use crate::database::UserStore;
use crate::models::User;
use crate::utils::AppError;

/// Os dois usuários da demo
pub fn demo_users() -> Vec<User> {
    vec![
        User::new("johnd", "John", "Doe"),
        User::new("daved", "Dave", "Doe"),
    ]
}

/// Upsert dos usuários da demo com activeMinutes zerado.
/// Retorna os ids que o simulador deve monitorar.
pub async fn seed_demo_users(store: &dyn UserStore) -> Result<Vec<String>, AppError> {
    log::info!("🌱 Seeding demo users...");

    let saved = store.save_all(demo_users()).await?;

    for user in &saved {
        log::info!("   ✅ {} {} ({})", user.firstname, user.lastname, user.id);
    }

    Ok(saved.into_iter().map(|u| u.id).collect())
}

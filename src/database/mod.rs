pub mod memory;
pub mod user_store;

pub use memory::InMemoryUserStore;
pub use user_store::UserStore;

use crate::models::ACTIVE_MINUTES_FIELD;
use mongodb::{Client, Collection, Database};
use std::error::Error;

/// Collection que guarda os documentos `User`
pub const USERS_COLLECTION: &str = "users";

/// Nome do banco quando a URI não traz um
const DEFAULT_DATABASE: &str = "activitytracker";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Loop de simulação + conexões de stream compartilham o mesmo pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = database_name_from_uri(uri);
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Index que atende a consulta do líder (maior activeMinutes, desempate por _id)
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let leader_index = IndexModel::builder()
            .keys(doc! { ACTIVE_MINUTES_FIELD: -1, "_id": 1 })
            .build();

        match users.create_index(leader_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(activeMinutes desc, _id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Extrai o nome do banco do último segmento da URI
/// (`mongodb://host:27017/activitytracker?retryWrites=true`)
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split("://").nth(1).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or(""))
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE)
        .to_string()
}

use serde::{Deserialize, Serialize};

/// Campo do contador de minutos ativos, como gravado no documento
pub const ACTIVE_MINUTES_FIELD: &str = "activeMinutes";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,  // Document key, imutável após criação
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub active_minutes: i64,
}

impl User {
    pub fn new(id: &str, firstname: &str, lastname: &str) -> Self {
        Self {
            id: id.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            active_minutes: 0,
        }
    }
}

/// Representação JSON exposta pela API (`id` em vez de `_id`)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub active_minutes: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            active_minutes: user.active_minutes,
        }
    }
}

use actix_web::{http::header, web, HttpResponse, Responder};
use futures::StreamExt;
use tokio::time::Duration;
use crate::{
    api::metrics,
    database::UserStore,
    models::{User, UserResponse},
    services::leader_service,
    utils::AppError,
};

/// Comentário SSE enviado quando o tick não tem líder (ou falhou).
/// Mantém a conexão viva e faz a desconexão do cliente ser percebida.
const KEEP_ALIVE: &[u8] = b": keep-alive\n\n";

/// Período de emissão do `/leaderStream`
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub interval: Duration,
}

#[utoipa::path(
    get,
    path = "/leader",
    tag = "Leader",
    responses(
        (status = 200, description = "User with the most active minutes", body = UserResponse),
        (status = 204, description = "Nobody has active minutes yet"),
        (status = 500, description = "Document store unavailable")
    )
)]
pub async fn get_leader(store: web::Data<dyn UserStore>) -> impl Responder {
    metrics::record_leader_query();

    match leader_service::find_leader(store.get_ref()).await {
        Ok(Some(user)) => {
            log::debug!("🏆 Leader: {} ({} active minutes)", user.id, user.active_minutes);
            HttpResponse::Ok().json(UserResponse::from(user))
        }
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(e) => {
            log::error!("❌ Error fetching leader: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/leaderStream",
    tag = "Leader",
    responses(
        (status = 200, description = "Server-sent events, one `data:` User JSON per interval while a leader exists", content_type = "text/event-stream", body = UserResponse)
    )
)]
pub async fn leader_stream(
    store: web::Data<dyn UserStore>,
    settings: web::Data<StreamSettings>,
) -> HttpResponse {
    metrics::record_stream_connection();
    log::info!("📡 Leader stream opened (interval: {}ms)", settings.interval.as_millis());

    let events = leader_service::leader_stream(store.into_inner(), settings.interval)
        .map(|tick| Ok::<_, actix_web::Error>(sse_event(tick)));

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(events)
}

fn sse_event(tick: Result<Option<User>, AppError>) -> web::Bytes {
    match tick {
        Ok(Some(user)) => match serde_json::to_string(&UserResponse::from(user)) {
            Ok(json) => web::Bytes::from(format!("data:{}\n\n", json)),
            Err(e) => {
                log::error!("❌ Failed to serialize leader: {}", e);
                web::Bytes::from_static(KEEP_ALIVE)
            }
        },
        Ok(None) => web::Bytes::from_static(KEEP_ALIVE),
        Err(e) => {
            log::warn!("⚠️  Leader stream tick skipped: {}", e);
            web::Bytes::from_static(KEEP_ALIVE)
        }
    }
}

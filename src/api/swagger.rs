use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Activity Tracker API",
        version = "1.0.0",
        description = "Demo activity tracker. A background simulator samples heart rates for the demo users every tick and counts a minute as active when the rate goes above 120 bpm.\n\n**Endpoints:**\n- Current leader (most active minutes)\n- Live leader stream (server-sent events)\n- Health and metrics",
    ),
    paths(
        // Leader
        crate::api::leader::get_leader,
        crate::api::leader::leader_stream,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Leader", description = "Who has the most active minutes, once or as a live stream."),
        (name = "Health", description = "Health check and counters for monitoring service status."),
    )
)]
pub struct ApiDoc;

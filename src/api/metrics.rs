use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static TICKS_TOTAL: AtomicU64 = AtomicU64::new(0);
static INCREMENTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static INCREMENT_ERRORS_TOTAL: AtomicU64 = AtomicU64::new(0);
static LEADER_QUERIES_TOTAL: AtomicU64 = AtomicU64::new(0);
static LEADER_STREAM_CONNECTIONS_TOTAL: AtomicU64 = AtomicU64::new(0);

pub fn record_tick() {
    TICKS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_increment() {
    INCREMENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_increment_error() {
    INCREMENT_ERRORS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_leader_query() {
    LEADER_QUERIES_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_stream_connection() {
    LEADER_STREAM_CONNECTIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub activity_ticks_total: u64,
    pub activity_increments_total: u64,
    pub activity_increment_errors_total: u64,
    pub leader_queries_total: u64,
    pub leader_stream_connections_total: u64,
}

impl MetricsResponse {
    pub fn snapshot() -> Self {
        Self {
            activity_ticks_total: TICKS_TOTAL.load(Ordering::Relaxed),
            activity_increments_total: INCREMENTS_TOTAL.load(Ordering::Relaxed),
            activity_increment_errors_total: INCREMENT_ERRORS_TOTAL.load(Ordering::Relaxed),
            leader_queries_total: LEADER_QUERIES_TOTAL.load(Ordering::Relaxed),
            leader_stream_connections_total: LEADER_STREAM_CONNECTIONS_TOTAL.load(Ordering::Relaxed),
        }
    }

    fn to_prometheus(&self) -> String {
        format!(
            "# HELP activity_ticks_total Simulation ticks completed\n\
             # TYPE activity_ticks_total counter\n\
             activity_ticks_total {}\n\
             \n\
             # HELP activity_increments_total Active minute increments applied\n\
             # TYPE activity_increments_total counter\n\
             activity_increments_total {}\n\
             \n\
             # HELP activity_increment_errors_total Active minute increments that failed\n\
             # TYPE activity_increment_errors_total counter\n\
             activity_increment_errors_total {}\n\
             \n\
             # HELP leader_queries_total One-shot leader queries served\n\
             # TYPE leader_queries_total counter\n\
             leader_queries_total {}\n\
             \n\
             # HELP leader_stream_connections_total Leader stream connections opened\n\
             # TYPE leader_stream_connections_total counter\n\
             leader_stream_connections_total {}\n",
            self.activity_ticks_total,
            self.activity_increments_total,
            self.activity_increment_errors_total,
            self.leader_queries_total,
            self.leader_stream_connections_total,
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Simulation and request counters (Prometheus text format)", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}

// ═══════════════════════════════════════════════════════════════════
// ACTIVITY SIMULATOR — Background job que simula batimentos cardíacos
// ═══════════════════════════════════════════════════════════════════
//
// A cada tick:
// - sorteia um batimento em [60, 175) para cada usuário monitorado
// - batimento > 120 conta como um minuto ativo: `$inc activeMinutes 1`
//
// As escritas de um tick rodam em task própria e em paralelo entre usuários,
// então um write lento nunca atrasa o próximo tick nem o outro usuário.
// Falha de um incremento só é logada; o loop segue até o shutdown.

use crate::{
    api::metrics,
    database::UserStore,
    models::ACTIVE_MINUTES_FIELD,
};
use futures::future::join_all;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};

pub const HEART_RATE_MIN: u32 = 60;
/// Exclusivo
pub const HEART_RATE_MAX: u32 = 175;
pub const ACTIVE_HEART_RATE_THRESHOLD: u32 = 120;

/// Ticks entre logs de resumo em nível info
const SUMMARY_EVERY_TICKS: u64 = 60;

/// Estado explícito do loop: ids monitorados + handle do store
#[derive(Clone)]
pub struct SimulationState {
    pub store: Arc<dyn UserStore>,
    pub tracked_user_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartRateReading {
    pub user_id: String,
    pub bpm: u32,
}

impl HeartRateReading {
    pub fn new(user_id: &str, bpm: u32) -> Self {
        Self { user_id: user_id.to_string(), bpm }
    }

    pub fn is_active(&self) -> bool {
        self.bpm > ACTIVE_HEART_RATE_THRESHOLD
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub sampled: usize,
    pub incremented: usize,
    pub failed: usize,
}

/// Uma leitura independente e uniforme por usuário
pub fn sample_readings<R: Rng>(tracked_user_ids: &[String], rng: &mut R) -> Vec<HeartRateReading> {
    tracked_user_ids
        .iter()
        .map(|id| HeartRateReading::new(id, rng.random_range(HEART_RATE_MIN..HEART_RATE_MAX)))
        .collect()
}

/// Aplica as leituras de um tick: incrementos concorrentes, falhas isoladas por usuário
pub async fn apply_readings(store: &dyn UserStore, readings: &[HeartRateReading]) -> TickReport {
    let increments = readings.iter().filter(|r| r.is_active()).map(|reading| async move {
        let result = store
            .increment_counter(&reading.user_id, ACTIVE_MINUTES_FIELD, 1)
            .await;
        (reading, result)
    });

    let mut report = TickReport {
        sampled: readings.len(),
        ..TickReport::default()
    };

    for (reading, result) in join_all(increments).await {
        match result {
            Ok(()) => {
                report.incremented += 1;
                metrics::record_increment();
                log::debug!("    💓 {} at {} bpm: +1 active minute", reading.user_id, reading.bpm);
            }
            Err(e) => {
                report.failed += 1;
                metrics::record_increment_error();
                log::error!("    ❌ Failed to increment active minutes for {}: {}", reading.user_id, e);
            }
        }
    }

    metrics::record_tick();
    report
}

/// Inicia o simulador em background; primeiro tick um período após o start
pub async fn start_activity_simulator(state: SimulationState, period: Duration) -> JoinHandle<()> {
    log::info!(
        "💓 Starting activity simulator ({} users, interval: {}ms)",
        state.tracked_user_ids.len(),
        period.as_millis()
    );

    tokio::spawn(async move {
        let mut rng = SmallRng::from_os_rng();
        let mut ticker = interval_at(Instant::now() + period, period);
        let mut tick: u64 = 0;

        loop {
            ticker.tick().await;
            tick += 1;

            let readings = sample_readings(&state.tracked_user_ids, &mut rng);
            let store = state.store.clone();

            tokio::spawn(async move {
                let report = apply_readings(store.as_ref(), &readings).await;

                if tick % SUMMARY_EVERY_TICKS == 0 {
                    log::info!(
                        "💓 Simulator tick #{}: {} sampled, {} incremented, {} errors",
                        tick, report.sampled, report.incremented, report.failed
                    );
                } else {
                    log::debug!(
                        "💓 Simulator tick #{}: {} sampled, {} incremented, {} errors",
                        tick, report.sampled, report.incremented, report.failed
                    );
                }
            });
        }
    })
}

/// Aguarda o fim da task do simulador; retorna (e loga) o erro se ela parou por panic
/// ou cancelamento. O loop não termina sozinho, então qualquer saída é anômala.
pub async fn report_exit(handle: JoinHandle<()>) -> Option<String> {
    match handle.await {
        Ok(()) => {
            log::warn!("⚠️  Activity simulator loop returned");
            None
        }
        Err(e) => {
            log::error!("❌ Activity simulator stopped: {}", e);
            Some(e.to_string())
        }
    }
}

/// Monitora a task do simulador em background
pub fn supervise(handle: JoinHandle<()>) {
    tokio::spawn(report_exit(handle));
}

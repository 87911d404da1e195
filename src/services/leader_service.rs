// ==================== LEADER QUERIES ====================
// Líder = usuário com maior activeMinutes acima de zero.
// Empate: menor id (ordem do índice users(activeMinutes desc, _id asc)).

use crate::{
    database::UserStore,
    models::{User, ACTIVE_MINUTES_FIELD},
    utils::AppError,
};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

pub async fn find_leader(store: &dyn UserStore) -> Result<Option<User>, AppError> {
    let mut top = store
        .query_top_by_field_desc(ACTIVE_MINUTES_FIELD, 0, 1)
        .await?;

    Ok(top.pop())
}

/// Stream infinito com um `find_leader()` por período.
///
/// A primeira emissão acontece um período após a inscrição. Ticks perdidos
/// enquanto o consumidor está lento são descartados: cada consulta é feita
/// no momento do poll, então o consumidor sempre recebe o líder mais recente.
/// O stream termina quando é dropado (desconexão do cliente).
pub fn leader_stream(
    store: Arc<dyn UserStore>,
    period: Duration,
) -> impl Stream<Item = Result<Option<User>, AppError>> {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    stream::unfold((store, ticker), |(store, mut ticker)| async move {
        ticker.tick().await;
        let leader = find_leader(store.as_ref()).await;
        Some((leader, (store, ticker)))
    })
}

// --- File: crates/services/barbershop_backend/src/realtime.rs ---

//! Server-Sent Events over the in-process change feed.

use crate::app_state::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use barbershop_common::ChangeEvent;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

pub const CHANGE_EVENT_NAME: &str = "change";

#[derive(Deserialize, Debug, Default)]
pub struct RealtimeQuery {
    /// Only stream changes to this table
    pub table: Option<String>,
}

pub(crate) fn table_filter(query: &RealtimeQuery) -> Option<String> {
    query
        .table
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub(crate) fn matches(filter: Option<&str>, event: &ChangeEvent) -> bool {
    filter.map_or(true, |t| t == event.table)
}

/// `GET /realtime?table=`: one `change` event per committed row change.
///
/// Slow clients that fall behind the channel capacity skip the missed events;
/// they are expected to re-fetch the affected list anyway.
pub async fn realtime_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RealtimeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let filter = table_filter(&query);
    debug!(
        "Realtime subscriber connected (table filter: {:?}, subscribers: {})",
        filter,
        state.feed.subscriber_count() + 1
    );

    let stream = BroadcastStream::new(state.feed.subscribe()).filter_map(move |result| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!("Realtime subscriber lagged: {}", e);
                return None;
            }
        };
        if !matches(filter.as_deref(), &event) {
            return None;
        }
        let payload = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        Some(Ok(Event::default()
            .event(CHANGE_EVENT_NAME)
            .id(event.record_id.clone())
            .data(payload)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbershop_common::ChangeAction;

    #[test]
    fn test_table_filter() {
        let event = ChangeEvent::new("appointments", ChangeAction::Insert, "a1", &());
        assert!(matches(None, &event));
        assert!(matches(Some("appointments"), &event));
        assert!(!matches(Some("barbers"), &event));

        let blank = RealtimeQuery {
            table: Some("  ".to_string()),
        };
        assert_eq!(table_filter(&blank), None);
        let named = RealtimeQuery {
            table: Some(" barbers ".to_string()),
        };
        assert_eq!(table_filter(&named).as_deref(), Some("barbers"));
    }
}

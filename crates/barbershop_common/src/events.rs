//! In-process change feed.
//!
//! Writers publish a [`ChangeEvent`] after each committed row change; the realtime
//! endpoint fans them out to subscribers, which typically re-fetch the affected list.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

pub const TABLE_APPOINTMENTS: &str = "appointments";
pub const TABLE_SERVICES: &str = "services";
pub const TABLE_BARBERS: &str = "barbers";
pub const TABLE_WORKING_HOURS: &str = "working_hours";
pub const TABLE_APPROVED_USERS: &str = "approved_users";
pub const TABLE_NOTIFICATIONS: &str = "notifications";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub action: ChangeAction,
    pub record_id: String,
    /// The row after the change (or before, for deletes).
    pub payload: Value,
    pub at: String,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(
        table: &str,
        action: ChangeAction,
        record_id: impl Into<String>,
        payload: &T,
    ) -> Self {
        Self {
            table: table.to_string(),
            action,
            record_id: record_id.into(),
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
            at: Utc::now().to_rfc3339(),
        }
    }
}

/// Broadcast handle shared through application state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event and returns how many subscribers received it.
    ///
    /// Having no subscribers is normal and returns 0.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!(
            "Change event {:?} on {} ({})",
            event.action, event.table, event.record_id
        );
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let feed = ChangeFeed::new(4);
        let delivered = feed.publish(ChangeEvent::new(
            TABLE_APPOINTMENTS,
            ChangeAction::Insert,
            "a1",
            &json!({"id": "a1"}),
        ));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let feed = ChangeFeed::new(4);
        let mut rx = feed.subscribe();
        feed.publish(ChangeEvent::new(
            TABLE_NOTIFICATIONS,
            ChangeAction::Update,
            "n1",
            &json!({"read": true}),
        ));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, TABLE_NOTIFICATIONS);
        assert_eq!(event.action, ChangeAction::Update);
        assert_eq!(event.payload["read"], true);
    }

    #[test]
    fn test_action_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ChangeAction::Delete).unwrap(),
            "\"DELETE\""
        );
    }
}

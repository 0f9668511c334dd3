//! SQL implementation of the notification repository

use crate::error::DbError;
use crate::repositories::notification::{
    DbNotification, NewNotification, Notification, NotificationRepository,
};
use crate::repository::{new_id, now_timestamp, SchemaInit};
use crate::DbClient;
use tracing::{debug, info};

pub(crate) const SELECT_NOTIFICATION: &str = r#"
    SELECT id, kind, title, message, COALESCE(email, '') AS email,
           COALESCE(appointment_id, '') AS appointment_id, read, created_at
    FROM notifications
"#;

#[derive(Debug, Clone)]
pub struct SqlNotificationRepository {
    db_client: DbClient,
}

impl SqlNotificationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl SchemaInit for SqlNotificationRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing notifications schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS notifications (
                    id TEXT PRIMARY KEY,
                    kind TEXT NOT NULL,
                    title TEXT NOT NULL,
                    message TEXT NOT NULL,
                    email TEXT,
                    appointment_id TEXT,
                    read INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Notifications schema initialized successfully");
        Ok(())
    }
}

impl NotificationRepository for SqlNotificationRepository {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, DbError> {
        let created = Notification {
            id: new_id(),
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            email: notification.email,
            appointment_id: notification.appointment_id,
            read: false,
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO notifications (id, kind, title, message, email, appointment_id, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            "#,
        )
        .bind(&created.id)
        .bind(created.kind.as_str())
        .bind(&created.title)
        .bind(&created.message)
        .bind(&created.email)
        .bind(&created.appointment_id)
        .bind(&created.created_at)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to insert notification", e))?;

        debug!("Notification created: {} ({})", created.id, created.kind.as_str());
        Ok(created)
    }

    async fn list_notifications(&self, unread_only: bool) -> Result<Vec<Notification>, DbError> {
        let query = if unread_only {
            format!("{} WHERE read = 0 ORDER BY created_at DESC, id", SELECT_NOTIFICATION)
        } else {
            format!("{} ORDER BY created_at DESC, id", SELECT_NOTIFICATION)
        };

        let rows = sqlx::query_as::<_, DbNotification>(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to list notifications", e))?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn find_notification(&self, id: &str) -> Result<Option<Notification>, DbError> {
        let query = format!("{} WHERE id = $1", SELECT_NOTIFICATION);
        let row = sqlx::query_as::<_, DbNotification>(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to find notification", e))?;

        row.map(Notification::try_from).transpose()
    }

    async fn mark_read(&self, id: &str) -> Result<Option<Notification>, DbError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to mark notification read", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_notification(id).await
    }

    async fn mark_all_read(&self) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE read = 0")
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to mark notifications read", e))?;

        info!("Marked {} notifications read", result.rows_affected());
        Ok(result.rows_affected())
    }
}

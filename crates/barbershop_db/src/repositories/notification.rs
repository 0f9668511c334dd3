//! Repository for admin notifications

use crate::error::DbError;
use crate::repositories::non_empty;
use crate::repository::SchemaInit;
use sqlx::FromRow;

pub use barbershop_common::models::{NewNotification, Notification, NotificationKind};

#[derive(Debug, Clone, FromRow)]
pub struct DbNotification {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub email: String,
    pub appointment_id: String,
    pub read: i64,
    pub created_at: String,
}

impl TryFrom<DbNotification> for Notification {
    type Error = DbError;

    fn try_from(db: DbNotification) -> Result<Self, Self::Error> {
        let kind = db
            .kind
            .parse::<NotificationKind>()
            .map_err(|e| DbError::DecodeError(e.to_string()))?;
        Ok(Self {
            id: db.id,
            kind,
            title: db.title,
            message: db.message,
            email: non_empty(db.email),
            appointment_id: non_empty(db.appointment_id),
            read: db.read != 0,
            created_at: db.created_at,
        })
    }
}

pub trait NotificationRepository: SchemaInit {
    fn create_notification(
        &self,
        notification: NewNotification,
    ) -> impl std::future::Future<Output = Result<Notification, DbError>> + Send;

    /// Newest first.
    fn list_notifications(
        &self,
        unread_only: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Notification>, DbError>> + Send;

    fn find_notification(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Notification>, DbError>> + Send;

    /// Returns `None` when the id is unknown. Marking an already read notification is a no-op.
    fn mark_read(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Notification>, DbError>> + Send;

    /// Returns the number of notifications that changed.
    fn mark_all_read(&self) -> impl std::future::Future<Output = Result<u64, DbError>> + Send;
}

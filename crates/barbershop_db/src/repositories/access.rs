//! Repository for email access requests (`approved_users`)

use crate::error::DbError;
use crate::repositories::non_empty;
use crate::repository::SchemaInit;
use sqlx::FromRow;

pub use barbershop_common::models::{AccessRecord, AccessStatus, Notification};

#[derive(Debug, Clone, FromRow)]
pub struct DbAccessRecord {
    pub email: String,
    pub name: String,
    pub status: String,
    pub requested_at: String,
    pub decided_at: String,
    pub decided_by: String,
}

impl TryFrom<DbAccessRecord> for AccessRecord {
    type Error = DbError;

    fn try_from(db: DbAccessRecord) -> Result<Self, Self::Error> {
        let status = db
            .status
            .parse::<AccessStatus>()
            .map_err(|e| DbError::DecodeError(e.to_string()))?;
        Ok(Self {
            email: db.email,
            name: non_empty(db.name),
            status,
            requested_at: db.requested_at,
            decided_at: non_empty(db.decided_at),
            decided_by: non_empty(db.decided_by),
        })
    }
}

/// What an access request did to the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRequestOutcome {
    pub record: AccessRecord,
    /// True when the request opened a new pending review (first request, or a
    /// re-request after rejection). Admins are notified only then.
    pub opened: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Applied(AccessRecord),
    /// The record already carried this decision.
    Unchanged(AccessRecord),
    NotFound,
    /// The record was already decided the other way.
    Conflict(AccessRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationApproval {
    Approved {
        record: AccessRecord,
        notification: Notification,
    },
    NotificationNotFound,
    /// The notification does not reference a user.
    MissingEmail,
    Conflict(AccessRecord),
}

pub trait AccessRepository: SchemaInit {
    /// Upsert a pending request. Approved emails are returned unchanged.
    fn request_access(
        &self,
        email: &str,
        name: Option<String>,
    ) -> impl std::future::Future<Output = Result<AccessRequestOutcome, DbError>> + Send;

    fn find_access(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AccessRecord>, DbError>> + Send;

    /// Newest request first.
    fn list_access(
        &self,
        status: Option<AccessStatus>,
    ) -> impl std::future::Future<Output = Result<Vec<AccessRecord>, DbError>> + Send;

    /// Record an approve/reject decision on a pending request.
    fn decide(
        &self,
        email: &str,
        decision: AccessStatus,
        decided_by: &str,
    ) -> impl std::future::Future<Output = Result<Decision, DbError>> + Send;

    /// Approve the user referenced by a notification and mark it read, in one transaction.
    fn approve_from_notification(
        &self,
        notification_id: &str,
        decided_by: &str,
    ) -> impl std::future::Future<Output = Result<NotificationApproval, DbError>> + Send;
}

//! SQL implementation of the access repository

use crate::error::DbError;
use crate::repositories::access::{
    AccessRecord, AccessRepository, AccessRequestOutcome, AccessStatus, DbAccessRecord, Decision,
    NotificationApproval,
};
use crate::repositories::notification::{DbNotification, Notification};
use crate::repositories::notification_sql::SELECT_NOTIFICATION;
use crate::repository::{now_timestamp, SchemaInit};
use crate::DbClient;
use tracing::{debug, info};

const SELECT_ACCESS: &str = r#"
    SELECT email, COALESCE(name, '') AS name, status, requested_at,
           COALESCE(decided_at, '') AS decided_at, COALESCE(decided_by, '') AS decided_by
    FROM approved_users
"#;

#[derive(Debug, Clone)]
pub struct SqlAccessRepository {
    db_client: DbClient,
}

impl SqlAccessRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn insert_pending(&self, email: &str, name: &Option<String>) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO approved_users (email, name, status, requested_at)
            VALUES ($1, $2, 'pending', $3)
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(now_timestamp())
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to insert access request", e))?;
        Ok(())
    }

    async fn require(&self, email: &str) -> Result<AccessRecord, DbError> {
        self.find_access(email)
            .await?
            .ok_or_else(|| DbError::QueryError(format!("access record {} vanished", email)))
    }
}

impl SchemaInit for SqlAccessRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing approved_users schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS approved_users (
                    email TEXT PRIMARY KEY,
                    name TEXT,
                    status TEXT NOT NULL DEFAULT 'pending',
                    requested_at TEXT NOT NULL,
                    decided_at TEXT,
                    decided_by TEXT
                )
                "#,
            )
            .await?;

        info!("Approved users schema initialized successfully");
        Ok(())
    }
}

impl AccessRepository for SqlAccessRepository {
    async fn request_access(
        &self,
        email: &str,
        name: Option<String>,
    ) -> Result<AccessRequestOutcome, DbError> {
        debug!("Access request for {}", email);

        match self.find_access(email).await? {
            None => match self.insert_pending(email, &name).await {
                Ok(()) => {
                    info!("New access request: {}", email);
                    Ok(AccessRequestOutcome {
                        record: self.require(email).await?,
                        opened: true,
                    })
                }
                // Lost a race with a concurrent request for the same email
                Err(DbError::UniqueViolation(_)) => Ok(AccessRequestOutcome {
                    record: self.require(email).await?,
                    opened: false,
                }),
                Err(e) => Err(e),
            },
            Some(record) if record.status == AccessStatus::Approved => {
                Ok(AccessRequestOutcome {
                    record,
                    opened: false,
                })
            }
            Some(record) if record.status == AccessStatus::Pending => {
                if name.is_some() && name != record.name {
                    sqlx::query("UPDATE approved_users SET name = $1 WHERE email = $2")
                        .bind(&name)
                        .bind(email)
                        .execute(self.db_client.pool())
                        .await
                        .map_err(|e| DbError::query("Failed to update access request", e))?;
                }
                Ok(AccessRequestOutcome {
                    record: self.require(email).await?,
                    opened: false,
                })
            }
            Some(_) => {
                sqlx::query(
                    r#"
                    UPDATE approved_users
                    SET status = 'pending', name = COALESCE($1, name), requested_at = $2,
                        decided_at = NULL, decided_by = NULL
                    WHERE email = $3
                    "#,
                )
                .bind(&name)
                .bind(now_timestamp())
                .bind(email)
                .execute(self.db_client.pool())
                .await
                .map_err(|e| DbError::query("Failed to reopen access request", e))?;

                info!("Access request reopened after rejection: {}", email);
                Ok(AccessRequestOutcome {
                    record: self.require(email).await?,
                    opened: true,
                })
            }
        }
    }

    async fn find_access(&self, email: &str) -> Result<Option<AccessRecord>, DbError> {
        let query = format!("{} WHERE email = $1", SELECT_ACCESS);
        let row = sqlx::query_as::<_, DbAccessRecord>(&query)
            .bind(email)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to find access record", e))?;

        row.map(AccessRecord::try_from).transpose()
    }

    async fn list_access(&self, status: Option<AccessStatus>) -> Result<Vec<AccessRecord>, DbError> {
        let rows = match status {
            Some(status) => {
                let query = format!(
                    "{} WHERE status = $1 ORDER BY requested_at DESC, email",
                    SELECT_ACCESS
                );
                sqlx::query_as::<_, DbAccessRecord>(&query)
                    .bind(status.as_str())
                    .fetch_all(self.db_client.pool())
                    .await
            }
            None => {
                let query = format!("{} ORDER BY requested_at DESC, email", SELECT_ACCESS);
                sqlx::query_as::<_, DbAccessRecord>(&query)
                    .fetch_all(self.db_client.pool())
                    .await
            }
        }
        .map_err(|e| DbError::query("Failed to list access records", e))?;

        rows.into_iter().map(AccessRecord::try_from).collect()
    }

    async fn decide(
        &self,
        email: &str,
        decision: AccessStatus,
        decided_by: &str,
    ) -> Result<Decision, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE approved_users SET status = $1, decided_at = $2, decided_by = $3
            WHERE email = $4 AND status = 'pending'
            "#,
        )
        .bind(decision.as_str())
        .bind(now_timestamp())
        .bind(decided_by)
        .bind(email)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to record access decision", e))?;

        let Some(record) = self.find_access(email).await? else {
            return Ok(Decision::NotFound);
        };

        if result.rows_affected() > 0 {
            info!("Access for {} set to {} by {}", email, decision, decided_by);
            Ok(Decision::Applied(record))
        } else if record.status == decision {
            Ok(Decision::Unchanged(record))
        } else {
            Ok(Decision::Conflict(record))
        }
    }

    async fn approve_from_notification(
        &self,
        notification_id: &str,
        decided_by: &str,
    ) -> Result<NotificationApproval, DbError> {
        let mut tx = self.db_client.begin().await?;

        let query = format!("{} WHERE id = $1", SELECT_NOTIFICATION);
        let notification = sqlx::query_as::<_, DbNotification>(&query)
            .bind(notification_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to load notification", e))?;

        let Some(notification) = notification else {
            tx.rollback().await.map_err(DbError::transaction)?;
            return Ok(NotificationApproval::NotificationNotFound);
        };
        if notification.email.trim().is_empty() {
            tx.rollback().await.map_err(DbError::transaction)?;
            return Ok(NotificationApproval::MissingEmail);
        }
        let email = notification.email.clone();

        let query = format!("{} WHERE email = $1", SELECT_ACCESS);
        let existing = sqlx::query_as::<_, DbAccessRecord>(&query)
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to load access record", e))?
            .map(AccessRecord::try_from)
            .transpose()?;

        let now = now_timestamp();
        match existing {
            Some(record) if record.status == AccessStatus::Rejected => {
                tx.rollback().await.map_err(DbError::transaction)?;
                return Ok(NotificationApproval::Conflict(record));
            }
            Some(record) if record.status == AccessStatus::Approved => {}
            Some(_) => {
                sqlx::query(
                    r#"
                    UPDATE approved_users SET status = 'approved', decided_at = $1, decided_by = $2
                    WHERE email = $3
                    "#,
                )
                .bind(&now)
                .bind(decided_by)
                .bind(&email)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::query("Failed to approve user", e))?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO approved_users (email, name, status, requested_at, decided_at, decided_by)
                    VALUES ($1, NULL, 'approved', $2, $3, $4)
                    "#,
                )
                .bind(&email)
                .bind(&notification.created_at)
                .bind(&now)
                .bind(decided_by)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::query("Failed to insert approved user", e))?;
            }
        }

        sqlx::query("UPDATE notifications SET read = 1 WHERE id = $1")
            .bind(notification_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to mark notification read", e))?;

        tx.commit().await.map_err(DbError::transaction)?;
        info!(
            "User {} approved from notification {} by {}",
            email, notification_id, decided_by
        );

        let record = self.require(&email).await?;
        let notification = Notification::try_from(DbNotification {
            read: 1,
            ..notification
        })?;
        Ok(NotificationApproval::Approved {
            record,
            notification,
        })
    }
}

//! Support tickets, chat messages and user roles

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::support::{SupportMessage, SupportTicket, TicketStatus},
};

/// Storage for tickets, messages and roles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportStore: Send + Sync {
    /// Insert a new ticket in `open` status
    async fn create_ticket(
        &self,
        user_id: Uuid,
        user_name: &str,
        user_email: &str,
        subject: &str,
    ) -> AppResult<SupportTicket>;

    /// Tickets, newest first
    async fn list_tickets(&self, status: Option<TicketStatus>) -> AppResult<Vec<SupportTicket>>;

    async fn get_ticket(&self, id: Uuid) -> AppResult<SupportTicket>;

    async fn update_ticket_status(&self, id: Uuid, status: TicketStatus) -> AppResult<SupportTicket>;

    async fn create_message(
        &self,
        ticket_id: Uuid,
        sender_id: Uuid,
        message: &str,
        is_admin: bool,
    ) -> AppResult<SupportMessage>;

    /// Messages of a ticket, oldest first
    async fn list_messages(&self, ticket_id: Uuid) -> AppResult<Vec<SupportMessage>>;

    async fn has_role(&self, user_id: Uuid, role: &str) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SupportRepository {
    pool: Pool<Postgres>,
}

impl SupportRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportStore for SupportRepository {
    async fn create_ticket(
        &self,
        user_id: Uuid,
        user_name: &str,
        user_email: &str,
        subject: &str,
    ) -> AppResult<SupportTicket> {
        let row = sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (id, user_id, user_name, user_email, subject, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(user_name)
        .bind(user_email)
        .bind(subject)
        .bind(TicketStatus::Open.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_tickets(&self, status: Option<TicketStatus>) -> AppResult<Vec<SupportTicket>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, SupportTicket>(
                    "SELECT * FROM support_tickets WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SupportTicket>(
                    "SELECT * FROM support_tickets ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn get_ticket(&self, id: Uuid) -> AppResult<SupportTicket> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    async fn update_ticket_status(&self, id: Uuid, status: TicketStatus) -> AppResult<SupportTicket> {
        sqlx::query_as::<_, SupportTicket>(
            "UPDATE support_tickets SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    async fn create_message(
        &self,
        ticket_id: Uuid,
        sender_id: Uuid,
        message: &str,
        is_admin: bool,
    ) -> AppResult<SupportMessage> {
        let row = sqlx::query_as::<_, SupportMessage>(
            r#"
            INSERT INTO support_messages (id, ticket_id, sender_id, message, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket_id)
        .bind(sender_id)
        .bind(message)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_messages(&self, ticket_id: Uuid) -> AppResult<Vec<SupportMessage>> {
        let rows = sqlx::query_as::<_, SupportMessage>(
            "SELECT * FROM support_messages WHERE ticket_id = $1 ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn has_role(&self, user_id: Uuid, role: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

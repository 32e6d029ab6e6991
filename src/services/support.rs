//! Support tickets and chat

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::realtime::{RealtimeHub, SupportEvent, Subscription, Topic};
use crate::{
    error::{AppError, AppResult},
    models::{
        support::{CreateMessage, CreateTicket, SupportMessage, SupportTicket, TicketQuery, TicketStatus},
        user::ADMIN_ROLE,
        UserClaims,
    },
    repository::support::SupportStore,
};

#[derive(Clone)]
pub struct SupportService {
    repository: Arc<dyn SupportStore>,
    hub: RealtimeHub,
}

impl SupportService {
    pub fn new(repository: Arc<dyn SupportStore>, hub: RealtimeHub) -> Self {
        Self { repository, hub }
    }

    pub fn hub(&self) -> &RealtimeHub {
        &self.hub
    }

    /// Check that the support database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    pub async fn is_admin(&self, user_id: Uuid) -> AppResult<bool> {
        self.repository.has_role(user_id, ADMIN_ROLE).await
    }

    async fn require_admin(&self, claims: &UserClaims) -> AppResult<()> {
        if self.is_admin(claims.user_id()).await? {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator role required".to_string()))
        }
    }

    /// The ticket and the caller's admin flag, if the caller opened it or is an administrator
    async fn accessible_ticket(&self, claims: &UserClaims, ticket_id: Uuid) -> AppResult<(SupportTicket, bool)> {
        let ticket = self.repository.get_ticket(ticket_id).await?;
        let is_admin = self.is_admin(claims.user_id()).await?;
        if ticket.user_id != claims.user_id() && !is_admin {
            return Err(AppError::Authorization("Not allowed to access this ticket".to_string()));
        }
        Ok((ticket, is_admin))
    }

    pub async fn open_ticket(&self, claims: &UserClaims, data: &CreateTicket) -> AppResult<SupportTicket> {
        data.validate()?;
        let ticket = self
            .repository
            .create_ticket(claims.user_id(), data.name.trim(), data.email.trim(), &data.subject)
            .await?;
        tracing::info!(id = %ticket.id, user = %ticket.user_id, "Support ticket opened");
        self.hub.publish(SupportEvent::TicketChanged(ticket.clone()));
        Ok(ticket)
    }

    pub async fn list_tickets(&self, claims: &UserClaims, query: &TicketQuery) -> AppResult<Vec<SupportTicket>> {
        self.require_admin(claims).await?;
        self.repository.list_tickets(query.status).await
    }

    pub async fn get_ticket(&self, claims: &UserClaims, ticket_id: Uuid) -> AppResult<SupportTicket> {
        let (ticket, _) = self.accessible_ticket(claims, ticket_id).await?;
        Ok(ticket)
    }

    pub async fn update_status(
        &self,
        claims: &UserClaims,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> AppResult<SupportTicket> {
        self.require_admin(claims).await?;
        let ticket = self.repository.update_ticket_status(ticket_id, status).await?;
        tracing::info!(id = %ticket.id, status = %ticket.status, "Support ticket status changed");
        self.hub.publish(SupportEvent::TicketChanged(ticket.clone()));
        Ok(ticket)
    }

    /// Move the ticket to the next status of the panel cycle
    pub async fn advance_status(&self, claims: &UserClaims, ticket_id: Uuid) -> AppResult<SupportTicket> {
        self.require_admin(claims).await?;
        let current = self.repository.get_ticket(ticket_id).await?;
        self.update_status(claims, ticket_id, current.status.advance()).await
    }

    pub async fn post_message(
        &self,
        claims: &UserClaims,
        ticket_id: Uuid,
        data: &CreateMessage,
    ) -> AppResult<SupportMessage> {
        if data.message.trim().is_empty() {
            return Err(AppError::Validation("Message must not be empty".to_string()));
        }
        let (_, is_admin) = self.accessible_ticket(claims, ticket_id).await?;

        let message = self
            .repository
            .create_message(ticket_id, claims.user_id(), &data.message, is_admin)
            .await?;
        self.hub.publish(SupportEvent::MessageInserted(message.clone()));
        Ok(message)
    }

    pub async fn list_messages(&self, claims: &UserClaims, ticket_id: Uuid) -> AppResult<Vec<SupportMessage>> {
        self.accessible_ticket(claims, ticket_id).await?;
        self.repository.list_messages(ticket_id).await
    }

    /// Live feed of new messages on one ticket
    pub async fn subscribe_messages(&self, claims: &UserClaims, ticket_id: Uuid) -> AppResult<Subscription> {
        self.accessible_ticket(claims, ticket_id).await?;
        Ok(self.hub.subscribe(Topic::TicketMessages(ticket_id)))
    }

    /// Live feed of ticket changes for the admin panel
    pub async fn subscribe_tickets(&self, claims: &UserClaims) -> AppResult<Subscription> {
        self.require_admin(claims).await?;
        Ok(self.hub.subscribe(Topic::Tickets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::support::MockSupportStore;
    use chrono::Utc;

    fn claims(user_id: Uuid) -> UserClaims {
        UserClaims::new(user_id, None, 3600)
    }

    fn ticket(owner: Uuid, status: TicketStatus) -> SupportTicket {
        SupportTicket {
            id: Uuid::new_v4(),
            user_id: owner,
            user_name: "Paula".to_string(),
            user_email: "paula@example.com".to_string(),
            subject: "Relatório de vencidos vazio".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    /// Store holding one ticket, where only `admin` has the admin role
    fn store_with(existing: SupportTicket, admin: Uuid) -> MockSupportStore {
        let mut store = MockSupportStore::new();
        store
            .expect_get_ticket()
            .returning(move |_| Ok(existing.clone()));
        store
            .expect_has_role()
            .returning(move |user_id, _| Ok(user_id == admin));
        store
    }

    fn service(store: MockSupportStore) -> SupportService {
        SupportService::new(Arc::new(store), RealtimeHub::default())
    }

    fn text(message: &str) -> CreateMessage {
        CreateMessage {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_message_rejected_before_storage() {
        let service = service(MockSupportStore::new());
        for blank in ["", "   ", "\n\t"] {
            let result = service
                .post_message(&claims(Uuid::new_v4()), Uuid::new_v4(), &text(blank))
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_invalid_ticket_form_rejected() {
        let service = service(MockSupportStore::new());
        let form = CreateTicket {
            name: "Paula".to_string(),
            email: "not-an-email".to_string(),
            subject: "Ajuda".to_string(),
        };
        let result = service.open_ticket(&claims(Uuid::new_v4()), &form).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_admin_operations_forbidden_for_users() {
        let owner = Uuid::new_v4();
        let existing = ticket(owner, TicketStatus::Open);
        let ticket_id = existing.id;
        let service = service(store_with(existing, Uuid::new_v4()));
        let user = claims(owner);

        let listed = service.list_tickets(&user, &TicketQuery::default()).await;
        assert!(matches!(listed, Err(AppError::Authorization(_))));

        let updated = service.update_status(&user, ticket_id, TicketStatus::Closed).await;
        assert!(matches!(updated, Err(AppError::Authorization(_))));

        let advanced = service.advance_status(&user, ticket_id).await;
        assert!(matches!(advanced, Err(AppError::Authorization(_))));

        assert!(matches!(
            service.subscribe_tickets(&user).await,
            Err(AppError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_owner_reads_and_posts() {
        let owner = Uuid::new_v4();
        let existing = ticket(owner, TicketStatus::Open);
        let ticket_id = existing.id;

        let mut store = store_with(existing, Uuid::new_v4());
        store
            .expect_create_message()
            .withf(move |id, sender, _, is_admin| *id == ticket_id && *sender == owner && !*is_admin)
            .times(1)
            .returning(|ticket_id, sender_id, message, is_admin| {
                Ok(SupportMessage {
                    id: Uuid::new_v4(),
                    ticket_id,
                    sender_id,
                    message: message.to_string(),
                    is_admin,
                    created_at: Utc::now(),
                })
            });
        store.expect_list_messages().returning(|_| Ok(Vec::new()));
        let service = service(store);
        let user = claims(owner);

        assert_eq!(service.get_ticket(&user, ticket_id).await.unwrap().id, ticket_id);
        assert!(service.list_messages(&user, ticket_id).await.unwrap().is_empty());

        let mut feed = service.subscribe_messages(&user, ticket_id).await.unwrap();
        let message = service
            .post_message(&user, ticket_id, &text(" Olá, equipe "))
            .await
            .unwrap();
        assert_eq!(message.message, " Olá, equipe ");
        assert!(!message.is_admin);
        assert!(matches!(feed.recv().await, Some(SupportEvent::MessageInserted(_))));
    }

    #[tokio::test]
    async fn test_other_users_cannot_access_ticket() {
        let existing = ticket(Uuid::new_v4(), TicketStatus::Open);
        let ticket_id = existing.id;
        let service = service(store_with(existing, Uuid::new_v4()));
        let stranger = claims(Uuid::new_v4());

        assert!(matches!(
            service.get_ticket(&stranger, ticket_id).await,
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            service.list_messages(&stranger, ticket_id).await,
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            service.post_message(&stranger, ticket_id, &text("oi")).await,
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            service.subscribe_messages(&stranger, ticket_id).await,
            Err(AppError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_replies_and_advances() {
        let admin = Uuid::new_v4();
        let existing = ticket(Uuid::new_v4(), TicketStatus::Open);
        let ticket_id = existing.id;

        let mut store = store_with(existing.clone(), admin);
        store
            .expect_create_message()
            .withf(|_, _, _, is_admin| *is_admin)
            .times(1)
            .returning(|ticket_id, sender_id, message, is_admin| {
                Ok(SupportMessage {
                    id: Uuid::new_v4(),
                    ticket_id,
                    sender_id,
                    message: message.to_string(),
                    is_admin,
                    created_at: Utc::now(),
                })
            });
        store
            .expect_update_ticket_status()
            .withf(|_, status| *status == TicketStatus::InProgress)
            .times(1)
            .returning(move |_, status| {
                let mut changed = existing.clone();
                changed.status = status;
                Ok(changed)
            });
        let service = service(store);
        let staff = claims(admin);

        let reply = service
            .post_message(&staff, ticket_id, &text("Estamos verificando"))
            .await
            .unwrap();
        assert!(reply.is_admin);

        let mut feed = service.subscribe_tickets(&staff).await.unwrap();
        let advanced = service.advance_status(&staff, ticket_id).await.unwrap();
        assert_eq!(advanced.status, TicketStatus::InProgress);
        match feed.recv().await {
            Some(SupportEvent::TicketChanged(changed)) => assert_eq!(changed.id, ticket_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

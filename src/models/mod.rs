//! Data models for EPI Control

pub mod assignment;
pub mod employee;
pub mod epi;
pub mod report;
pub mod support;
pub mod user;

use serde::{de::DeserializeOwned, Serialize};

// Re-export commonly used types
pub use assignment::Assignment;
pub use employee::Employee;
pub use epi::Epi;
pub use support::{SupportMessage, SupportTicket, TicketStatus};
pub use user::UserClaims;

/// A record kept in a persisted inventory collection
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Key of the collection in the key-value store
    const KEY: &'static str;

    fn id(&self) -> &str;
}

use super::order::{OrderId, OrderIdSet};
use super::payment::{PaymentLink, PaymentStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Source of the current session's bearer token.
///
/// Never fails: an empty string means no session.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> String;
}

#[async_trait]
pub trait PaymentStatusLookup: Send + Sync {
    async fn payment_status(&self, order_id: OrderId, token: &str) -> Result<PaymentStatus>;
}

#[async_trait]
pub trait PaymentLinkCreator: Send + Sync {
    async fn create_link(&self, order_ids: &OrderIdSet, token: &str) -> Result<PaymentLink>;
}

pub type TokenSourceBox = Box<dyn TokenSource>;
pub type PaymentStatusLookupBox = Box<dyn PaymentStatusLookup>;
pub type PaymentLinkCreatorBox = Box<dyn PaymentLinkCreator>;

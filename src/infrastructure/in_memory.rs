use crate::domain::order::{OrderId, OrderIdSet};
use crate::domain::payment::{PaymentLink, PaymentStatus};
use crate::domain::ports::{PaymentLinkCreator, PaymentStatusLookup, TokenSource};
use crate::error::{ConfirmError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A token source that always returns the same value.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// A source representing a signed-out session.
    pub fn absent() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> String {
        self.token.clone()
    }
}

/// A thread-safe in-memory stand-in for the payment backend.
///
/// Statuses can be updated while a flow is running, which is how webhook lag
/// is simulated. Clones share the same state.
#[derive(Default, Clone)]
pub struct InMemoryPaymentBackend {
    statuses: Arc<RwLock<HashMap<OrderId, PaymentStatus>>>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryPaymentBackend {
    /// Creates a new, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_status(&self, order_id: OrderId, status: PaymentStatus) {
        let mut statuses = self.statuses.write().await;
        statuses.insert(order_id, status);
    }

    /// Number of status lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentStatusLookup for InMemoryPaymentBackend {
    async fn payment_status(&self, order_id: OrderId, token: &str) -> Result<PaymentStatus> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if token.is_empty() {
            return Err(ConfirmError::ApiError {
                status: 401,
                message: "Unauthorized".to_string(),
            });
        }
        let statuses = self.statuses.read().await;
        statuses
            .get(&order_id)
            .cloned()
            .ok_or_else(|| ConfirmError::ApiError {
                status: 404,
                message: format!("Payment not found for order {order_id}"),
            })
    }
}

#[async_trait]
impl PaymentLinkCreator for InMemoryPaymentBackend {
    async fn create_link(&self, order_ids: &OrderIdSet, token: &str) -> Result<PaymentLink> {
        if token.is_empty() {
            return Err(ConfirmError::ApiError {
                status: 401,
                message: "Unauthorized".to_string(),
            });
        }
        let mut statuses = self.statuses.write().await;
        for id in order_ids.iter() {
            statuses.entry(*id).or_insert_with(PaymentStatus::pending);
        }
        Ok(PaymentLink {
            checkout_url: format!("memory://checkout/{order_ids}"),
            qr_code: None,
            order_code: order_ids
                .first()
                .and_then(|id| i64::try_from(id.value()).ok()),
            amount: None,
        })
    }
}

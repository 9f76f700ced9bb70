use crate::domain::order::OrderIdSet;
use crate::domain::payment::PaymentLink;
use crate::domain::ports::{PaymentLinkCreatorBox, TokenSourceBox};
use crate::error::{ConfirmError, Result};
use tracing::{info, instrument};

/// Starts a hosted payment for a batch of orders.
pub struct PaymentInitiation {
    tokens: TokenSourceBox,
    links: PaymentLinkCreatorBox,
}

impl PaymentInitiation {
    pub fn new(tokens: TokenSourceBox, links: PaymentLinkCreatorBox) -> Self {
        Self { tokens, links }
    }

    /// Requests a checkout link covering every order in `order_ids`.
    #[instrument(name = "initiate_payment", skip(self, order_ids), fields(order_ids = %order_ids))]
    pub async fn start(&self, order_ids: &OrderIdSet) -> Result<PaymentLink> {
        if order_ids.is_empty() {
            return Err(ConfirmError::ValidationError(
                "At least one order is required".to_string(),
            ));
        }
        let token = self.tokens.token().await;
        if token.is_empty() {
            return Err(ConfirmError::NotAuthenticated);
        }
        let link = self.links.create_link(order_ids, &token).await?;
        info!(checkout_url = %link.checkout_url, "payment link created");
        Ok(link)
    }
}

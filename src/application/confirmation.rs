use crate::domain::order::OrderIdSet;
use crate::domain::outcome::{ConfirmationOutcome, FailureReason};
use crate::domain::ports::{PaymentStatusLookupBox, TokenSourceBox};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How many status lookups to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Result of the last lookup that did not confirm the payment.
enum Pending {
    Unconfirmed,
    Errored(String),
}

/// Resolves the outcome of a payment provider's success redirect.
///
/// The backend learns about the payment through an asynchronous webhook, so
/// a first lookup may still see the payment as pending. The flow retries after
/// a fixed delay and, if the backend still has not caught up, lets the user
/// proceed with a warning rather than reporting a failure.
pub struct PaymentConfirmationFlow {
    tokens: TokenSourceBox,
    lookup: PaymentStatusLookupBox,
    retry: RetryPolicy,
}

impl PaymentConfirmationFlow {
    pub fn new(tokens: TokenSourceBox, lookup: PaymentStatusLookupBox) -> Self {
        Self::with_retry(tokens, lookup, RetryPolicy::default())
    }

    pub fn with_retry(
        tokens: TokenSourceBox,
        lookup: PaymentStatusLookupBox,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            tokens,
            lookup,
            retry,
        }
    }

    /// Runs the confirmation for the raw `orderIds` parameter.
    ///
    /// Always terminates with an outcome; failures are reported as
    /// `ConfirmationOutcome::Failed`, never as errors.
    #[instrument(name = "confirm_payment", skip(self))]
    pub async fn run(&self, raw_order_ids: Option<&str>) -> ConfirmationOutcome {
        let outcome = self.resolve(raw_order_ids).await;
        match &outcome {
            ConfirmationOutcome::Failed(reason) => warn!(%reason, "payment confirmation failed"),
            other => info!(outcome = ?other, "payment confirmation finished"),
        }
        outcome
    }

    async fn resolve(&self, raw_order_ids: Option<&str>) -> ConfirmationOutcome {
        let Some(raw) = raw_order_ids else {
            return ConfirmationOutcome::Failed(FailureReason::MissingReference);
        };
        let order_ids = OrderIdSet::parse(raw);
        // One payment record covers the whole batch and is keyed by its first order.
        let Some(order_id) = order_ids.first() else {
            return ConfirmationOutcome::Failed(FailureReason::InvalidReference);
        };

        let token = self.tokens.token().await;
        if token.is_empty() {
            return ConfirmationOutcome::Failed(FailureReason::NotAuthenticated);
        }

        let mut pending = Pending::Unconfirmed;
        for attempt in 1..=self.retry.max_attempts.max(1) {
            if attempt > 1 {
                debug!(
                    delay_ms = self.retry.delay.as_millis() as u64,
                    "waiting for payment webhook"
                );
                tokio::time::sleep(self.retry.delay).await;
            }
            match self.lookup.payment_status(order_id, &token).await {
                Ok(status) if status.is_confirmed() => {
                    debug!(attempt, %order_id, "payment confirmed");
                    return ConfirmationOutcome::Verified;
                }
                Ok(status) => {
                    debug!(
                        attempt,
                        %order_id,
                        status = %status.status,
                        "payment not confirmed yet"
                    );
                    pending = Pending::Unconfirmed;
                }
                Err(e) => {
                    warn!(attempt, %order_id, error = %e, "payment status lookup failed");
                    pending = Pending::Errored(e.to_string());
                }
            }
        }

        match pending {
            Pending::Unconfirmed => ConfirmationOutcome::VerifiedWithWarning,
            Pending::Errored(message) => {
                ConfirmationOutcome::Failed(FailureReason::Lookup(message))
            }
        }
    }
}

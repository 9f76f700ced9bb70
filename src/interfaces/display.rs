use crate::application::cancellation::PaymentCancellation;
use crate::domain::order::OrderIdSet;
use crate::domain::outcome::ConfirmationOutcome;
use std::fmt;

/// A display-ready screen: what the user sees after a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: String,
    pub detail: String,
    pub orders: Option<String>,
    pub caution: Option<String>,
    /// Navigation escape hatches as `(label, route)`.
    pub actions: Vec<(String, String)>,
}

/// `#12, #13`
pub fn order_labels(order_ids: &OrderIdSet) -> String {
    order_ids
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn orders_line(order_ids: &OrderIdSet) -> Option<String> {
    (!order_ids.is_empty()).then(|| order_labels(order_ids))
}

fn action(label: &str, route: impl Into<String>) -> (String, String) {
    (label.to_string(), route.into())
}

impl View {
    pub fn confirmation(outcome: &ConfirmationOutcome, order_ids: &OrderIdSet) -> Self {
        let cancel_context = PaymentCancellation::new(order_ids.clone());
        match outcome {
            ConfirmationOutcome::Verified => Self {
                title: "Payment successful".to_string(),
                detail: "Thank you, your payment has been received.".to_string(),
                orders: orders_line(order_ids),
                caution: None,
                actions: vec![action("Home", cancel_context.home_route())],
            },
            ConfirmationOutcome::VerifiedWithWarning => Self {
                title: "Payment successful".to_string(),
                detail: "Thank you, your payment has been received.".to_string(),
                orders: orders_line(order_ids),
                caution: Some(
                    "Payment confirmation is still being processed. Your order status may take a moment to update."
                        .to_string(),
                ),
                actions: vec![
                    action("View orders", cancel_context.orders_route()),
                    action("Home", cancel_context.home_route()),
                ],
            },
            ConfirmationOutcome::Failed(reason) => Self {
                title: "Payment could not be confirmed".to_string(),
                detail: reason.to_string(),
                orders: orders_line(order_ids),
                caution: None,
                actions: vec![
                    action("Retry payment", cancel_context.retry_route()),
                    action("Back to orders", cancel_context.orders_route()),
                    action("Home", cancel_context.home_route()),
                ],
            },
        }
    }

    pub fn cancellation(cancel: &PaymentCancellation) -> Self {
        Self {
            title: "Payment cancelled".to_string(),
            detail: "You cancelled the payment. Your order is still awaiting payment.".to_string(),
            orders: orders_line(cancel.order_ids()),
            caution: None,
            actions: vec![
                action("Retry payment", cancel.retry_route()),
                action("View orders", cancel.orders_route()),
                action("Home", cancel.home_route()),
            ],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.detail)?;
        if let Some(orders) = &self.orders {
            writeln!(f, "Orders: {orders}")?;
        }
        if let Some(caution) = &self.caution {
            writeln!(f, "Warning: {caution}")?;
        }
        for (label, route) in &self.actions {
            writeln!(f, "  {label}: {route}")?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// Backend status value that marks a settled payment.
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Payment state reported by the backend for one order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub paid_at: Option<String>,
}

impl PaymentStatus {
    pub fn new(status: impl Into<String>, paid_at: Option<String>) -> Self {
        Self {
            status: status.into(),
            paid_at,
        }
    }

    pub fn completed() -> Self {
        Self::new(STATUS_COMPLETED, None)
    }

    pub fn pending() -> Self {
        Self::new("PENDING", None)
    }

    /// A payment counts as confirmed once the status is `COMPLETED` or a
    /// payment timestamp has been recorded, whichever the webhook wrote first.
    pub fn is_confirmed(&self) -> bool {
        self.status == STATUS_COMPLETED || self.paid_at.is_some()
    }
}

/// Hosted checkout link returned when a payment is initiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub checkout_url: String,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub order_code: Option<i64>,
    #[serde(default)]
    pub amount: Option<i64>,
}

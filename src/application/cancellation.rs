use crate::domain::order::OrderIdSet;

const ORDERS_ROUTE: &str = "/dashboard/orders";
const HOME_ROUTE: &str = "/dashboard";

/// Context recovered from a payment provider's cancel redirect.
///
/// Unlike confirmation, a missing or empty `orderIds` parameter is not an
/// error here; it only means there is nothing specific to resume.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentCancellation {
    order_ids: OrderIdSet,
}

impl PaymentCancellation {
    pub fn new(order_ids: OrderIdSet) -> Self {
        Self { order_ids }
    }

    pub fn from_param(raw_order_ids: Option<&str>) -> Self {
        Self::new(raw_order_ids.map(OrderIdSet::parse).unwrap_or_default())
    }

    pub fn order_ids(&self) -> &OrderIdSet {
        &self.order_ids
    }

    /// Where to send the user to pay again for the same orders.
    pub fn retry_route(&self) -> String {
        if self.order_ids.is_empty() {
            ORDERS_ROUTE.to_string()
        } else {
            format!("{ORDERS_ROUTE}?retry=true&ids={}", self.order_ids)
        }
    }

    pub fn orders_route(&self) -> String {
        if self.order_ids.is_empty() {
            ORDERS_ROUTE.to_string()
        } else {
            format!("{ORDERS_ROUTE}?ids={}", self.order_ids)
        }
    }

    pub fn home_route(&self) -> &'static str {
        HOME_ROUTE
    }
}

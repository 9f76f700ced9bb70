use crate::error::ConfirmError;
use std::fmt;

/// Name of the query parameter the payment provider echoes back on redirect.
pub const ORDER_IDS_PARAM: &str = "orderIds";

/// A positive order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(value: u64) -> Result<Self, ConfirmError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(ConfirmError::ValidationError(
                "Order id must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for OrderId {
    type Error = ConfirmError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for u64 {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered order identifiers taken from an untrusted `orderIds` parameter.
///
/// Tokens that are not positive integers are dropped; duplicates are kept and
/// the original order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderIdSet(Vec<OrderId>);

impl OrderIdSet {
    /// Parses a comma-separated list such as `"12, 13"`.
    ///
    /// Pure: the same input always yields the same set.
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split(',')
            .filter_map(|token| token.trim().parse::<u64>().ok())
            .filter_map(|value| OrderId::new(value).ok())
            .collect();
        Self(ids)
    }

    pub fn first(&self) -> Option<OrderId> {
        self.0.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderId> {
        self.0.iter()
    }
}

/// Renders back into the wire form, e.g. `12,13`.
impl fmt::Display for OrderIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

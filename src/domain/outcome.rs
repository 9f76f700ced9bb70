use std::fmt;

/// Why a confirmation could not be established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The redirect carried no `orderIds` parameter.
    MissingReference,
    /// The parameter was present but held no valid ids.
    InvalidReference,
    /// No session token; retrying cannot help.
    NotAuthenticated,
    /// The status lookup failed on its final attempt.
    Lookup(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference => f.write_str("missing order reference"),
            Self::InvalidReference => f.write_str("invalid order reference"),
            Self::NotAuthenticated => f.write_str("not authenticated"),
            Self::Lookup(message) => f.write_str(message),
        }
    }
}

/// Terminal result of a payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Verified,
    /// The backend has not caught up yet. The user proceeds with a caution note.
    VerifiedWithWarning,
    Failed(FailureReason),
}

impl ConfirmationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

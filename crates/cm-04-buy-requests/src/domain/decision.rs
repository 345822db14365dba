use shared_types::BuyRequestStatus;

/// A seller's answer to a pending buy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// Status the request moves to.
    pub fn target(&self) -> BuyRequestStatus {
        match self {
            Self::Accept => BuyRequestStatus::Accepted,
            Self::Reject => BuyRequestStatus::Rejected,
        }
    }

    /// Verb used in error and log messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

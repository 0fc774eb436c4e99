use crate::location::Location;
use crate::world::LiveRef;
use thiserror::Error;

/// Precondition failures of the public operations. None of these are fatal;
/// the caller retries on a later tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no anchor: base has no primary spawn")]
    NoAnchor,
    #[error("anchor {0} is not buildable")]
    InvalidAnchor(Location),
    #[error("no plan for tier {tier}")]
    NoPlan { tier: u8 },
    #[error("unknown base {0}")]
    UnknownBase(String),
}

/// Why the world refused a build marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("marker limit reached")]
    Full,
    #[error("invalid target")]
    InvalidTarget,
    #[error("placement failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("object {0} no longer exists")]
    NotFound(LiveRef),
    #[error("world error: {0}")]
    Other(String),
}

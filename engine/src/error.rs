use thiserror::Error;

use crate::registry::{PairingId, SessionId};

/// Precondition failures of the duel API. Resolution itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error("invalid action: \"{0}\"")]
    InvalidAction(String),
    #[error("session {0} is not in a duel")]
    NotPaired(SessionId),
    #[error("session {0} is already engaged in another duel")]
    AlreadyPaired(SessionId),
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error("session {0} cannot challenge itself")]
    SelfChallenge(SessionId),
    #[error("duel {0} has already ended")]
    AlreadyEnded(PairingId),
    #[error("unknown duel {0}")]
    UnknownPairing(PairingId),
}

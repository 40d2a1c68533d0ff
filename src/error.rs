use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallSdkError {
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Bad message: {0}")]
    BadMessage(String),

    #[error("Unsupported message: {0}")]
    UnsupportedMessage(&'static str),

    #[error("Bad participant state: {0}")]
    BadParticipantState(&'static str),

    #[error("Local protocol violation: {0}")]
    LocalProtocolViolation(&'static str),

    #[error("Existing pending media keys")]
    ExistingPendingMediaKeys,

    #[error("Invalid participant id {id}: must be below {max}")]
    InvalidParticipantId { id: u32, max: u32 },

    #[error("Participant not found")]
    ParticipantNotFound,

    #[error("No shared secret for identity {0}")]
    UnknownIdentity(String),

    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CallSdkError>;

use crate::crypto::symmetric::generate_random_bytes;
use crate::error::{CallSdkError, Result};

/// Upper bound on numeric call slots handed out by the SFU.
pub const MAX_CALL_PARTICIPANTS: u32 = 256;
pub const CALL_COOKIE_SIZE: usize = 16;

/// Numeric call slot assigned by the SFU. Identifies a seat in one call,
/// not a long-term identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(u32);

impl ParticipantId {
    /// An id at or above [`MAX_CALL_PARTICIPANTS`] is a configuration error
    /// on the caller's side, not a recoverable protocol condition.
    pub fn new(id: u32) -> Result<Self> {
        if id >= MAX_CALL_PARTICIPANTS {
            return Err(CallSdkError::InvalidParticipantId {
                id,
                max: MAX_CALL_PARTICIPANTS,
            });
        }
        Ok(Self(id))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Participant call cookie: the per-session nonce salt paired with a
/// sequence number to build box nonces. Chosen once per participant-session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallCookie(pub(crate) [u8; CALL_COOKIE_SIZE]);

impl CallCookie {
    pub fn generate() -> Self {
        let mut cookie = [0u8; CALL_COOKIE_SIZE];
        let random = generate_random_bytes(CALL_COOKIE_SIZE);
        cookie.copy_from_slice(&random);
        Self(cookie)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CALL_COOKIE_SIZE {
            return Err(CallSdkError::InvalidKeyLength {
                expected: CALL_COOKIE_SIZE,
                actual: bytes.len(),
            });
        }
        let mut cookie = [0u8; CALL_COOKIE_SIZE];
        cookie.copy_from_slice(bytes);
        Ok(Self(cookie))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPosition {
    Front,
    Back,
}

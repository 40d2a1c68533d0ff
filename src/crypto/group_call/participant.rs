use crate::crypto::provider::{CallCrypto, EphemeralKeyPair, PUBLIC_KEY_SIZE};
use crate::error::{CallSdkError, Result};

use super::keys::{LocalKeyState, MediaKeys};
use super::sequence::SequenceNumber;
use super::types::{CallCookie, CameraPosition, ParticipantId};

/// Remote data learned from a Hello message.
#[derive(Clone, Debug)]
pub struct RemoteHello {
    pub pck: [u8; PUBLIC_KEY_SIZE],
    pub pcck: CallCookie,
    pub identity: String,
    pub nickname: String,
}

/// Remote data available once the handshake is complete.
#[derive(Debug)]
pub struct AuthenticatedRemote {
    pub hello: RemoteHello,
    /// Media keys the remote disclosed during Auth.
    pub media_keys: Vec<MediaKeys>,
    pub audio_muted: bool,
    pub video_muted: bool,
}

/// Handshake progress for one remote participant. Each state owns exactly
/// the fields that are valid in it, so e.g. the remote's media keys cannot
/// be read before `Done`.
#[derive(Debug)]
pub enum HandshakeState {
    /// We are established and a brand-new participant is joining; the
    /// newcomer speaks first.
    AwaitNewParticipantHello,
    /// We are the newcomer awaiting an already-established participant's
    /// Hello (our own Hello was sent when the remote was added).
    AwaitExistingParticipantHello,
    /// Hello exchanged; awaiting the remote's Auth.
    AwaitAuth(RemoteHello),
    /// Terminal: the remote is fully authenticated.
    Done(AuthenticatedRemote),
}

impl HandshakeState {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// One remote call slot, from SFU-reported join until departure. Owns the
/// ephemeral key pair and cookie this side uses toward the remote, plus the
/// two per-direction sequence numbers.
pub struct RemoteParticipant {
    pub(crate) id: ParticipantId,
    pub(crate) keypair: EphemeralKeyPair,
    pub(crate) cookie: CallCookie,
    pub(crate) outgoing: SequenceNumber,
    /// Mirror of the remote's outgoing counter, advanced in lock-step with
    /// accepted messages; used only to reconstruct decrypt nonces.
    pub(crate) incoming: SequenceNumber,
    pub(crate) state: HandshakeState,
}

impl RemoteParticipant {
    pub(crate) fn new(
        id: ParticipantId,
        crypto: &dyn CallCrypto,
        is_existing_participant: bool,
    ) -> Self {
        let state = if is_existing_participant {
            HandshakeState::AwaitExistingParticipantHello
        } else {
            HandshakeState::AwaitNewParticipantHello
        };
        Self {
            id,
            keypair: crypto.generate_keypair(),
            cookie: CallCookie::generate(),
            outgoing: SequenceNumber::new(),
            incoming: SequenceNumber::new(),
            state,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn handshake_state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_done()
    }

    /// The Hello-learned remote data, available from `AwaitAuth` onward.
    pub(crate) fn remote_hello(&self) -> Result<&RemoteHello> {
        match &self.state {
            HandshakeState::AwaitAuth(hello) => Ok(hello),
            HandshakeState::Done(authed) => Ok(&authed.hello),
            _ => Err(CallSdkError::BadParticipantState(
                "remote keys not yet learned from Hello",
            )),
        }
    }

    pub(crate) fn authenticated(&self) -> Result<&AuthenticatedRemote> {
        match &self.state {
            HandshakeState::Done(authed) => Ok(authed),
            _ => Err(CallSdkError::BadParticipantState(
                "handshake not complete for this participant",
            )),
        }
    }

    pub(crate) fn authenticated_mut(&mut self) -> Result<&mut AuthenticatedRemote> {
        match &mut self.state {
            HandshakeState::Done(authed) => Ok(authed),
            _ => Err(CallSdkError::BadParticipantState(
                "handshake not complete for this participant",
            )),
        }
    }
}

/// This device's view of itself within one call.
pub struct LocalParticipant {
    pub(crate) id: ParticipantId,
    pub(crate) identity: String,
    pub(crate) nickname: String,
    pub(crate) keys: LocalKeyState,
    pub(crate) audio_muted: bool,
    pub(crate) video_muted: bool,
    pub(crate) camera_position: CameraPosition,
}

impl LocalParticipant {
    pub(crate) fn new(id: ParticipantId, identity: String, nickname: String) -> Self {
        Self {
            id,
            identity,
            nickname,
            keys: LocalKeyState::new(),
            audio_muted: true,
            video_muted: true,
            camera_position: CameraPosition::Front,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn media_keys(&self) -> &LocalKeyState {
        &self.keys
    }

    pub fn audio_muted(&self) -> bool {
        self.audio_muted
    }

    pub fn video_muted(&self) -> bool {
        self.video_muted
    }

    pub fn camera_position(&self) -> CameraPosition {
        self.camera_position
    }
}

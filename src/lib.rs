//! End-to-end encrypted signaling and media key management for SFU-mediated
//! group calls.
//!
//! Participants holding long-term identity keys establish pairwise
//! authenticated, forward-secret channels over an untrusted SFU for
//! capture-state notifications and distribution/rotation of the group media
//! encryption key (PCMK). The SFU only ever sees ciphertext.
//!
//! The crate is transport-agnostic and does no I/O: the caller owns the data
//! channel and SFU signaling, feeds inbound [`proto`] envelopes into
//! [`handle_outer_envelope`](crypto::handle_outer_envelope) and sends
//! whatever envelopes the operations return. All state for one call lives in
//! a [`GroupCallState`](crypto::GroupCallState) that must be driven from a
//! single logical execution context (one actor or event loop per call).

pub mod crypto;
pub mod error;
pub mod proto;

pub use error::{CallSdkError, Result};

pub use crypto::{
    add_received_media_key, add_remote_participant, adopt_pending_media_keys, create_group_call,
    derive_box_key, handle_outer_envelope, ratchet_media_keys, remove_remote_participant,
    rotate_media_keys, set_camera, set_camera_position, set_microphone, sfu_envelope,
    AuthenticatedRemote, CallCookie, CallCrypto, CameraPosition, EphemeralKeyPair, FrameCrypto,
    GroupCallState, GroupMembership, HandleOutcome, HandshakeState, LocalKeyState,
    LocalParticipant, MediaKeys, ParticipantId, ReceivedKeyRegistry, RemoteHello,
    RemoteParticipant, ResponseAction, SequenceNumber, X25519Provider, CALL_COOKIE_SIZE,
    MAX_CALL_PARTICIPANTS, MEDIA_KEY_SIZE, PUBLIC_KEY_SIZE, RESERVED_MEDIA_KEY_VERSION,
};

pub mod group_call;
pub mod provider;
pub mod symmetric;

pub use provider::{
    derive_box_key, CallCrypto, EphemeralKeyPair, FrameCrypto, GroupMembership, X25519Provider,
    PUBLIC_KEY_SIZE,
};

pub use symmetric::{generate_random_bytes, hkdf_expand_to_key, KEY_SIZE, NONCE_SIZE};

pub use group_call::{
    add_received_media_key, add_remote_participant, adopt_pending_media_keys, build_nonce,
    create_group_call, handle_outer_envelope, ratchet_media_keys, remove_remote_participant,
    rotate_media_keys, set_camera, set_camera_position, set_microphone, sfu_envelope,
    AuthenticatedRemote, CallCookie, CameraPosition, GroupCallState, HandleOutcome,
    HandshakeState, LocalKeyState, LocalParticipant, MediaKeys, ParticipantId,
    ReceivedKeyRegistry, RemoteHello, RemoteParticipant, ResponseAction, SequenceNumber,
    CALL_COOKIE_SIZE, MAX_CALL_PARTICIPANTS, MEDIA_KEY_SIZE, RESERVED_MEDIA_KEY_VERSION,
};

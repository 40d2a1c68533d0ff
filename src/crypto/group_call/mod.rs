mod dispatch;
mod envelope;
mod handshake;
mod keys;
mod operations;
mod participant;
mod sequence;
mod state;
mod types;


pub use dispatch::{sfu_envelope, ResponseAction};
pub use keys::{
    add_received_media_key, LocalKeyState, MediaKeys, ReceivedKeyRegistry, MEDIA_KEY_SIZE,
    RESERVED_MEDIA_KEY_VERSION,
};
pub use operations::{
    add_remote_participant, adopt_pending_media_keys, create_group_call, handle_outer_envelope,
    ratchet_media_keys, remove_remote_participant, rotate_media_keys, set_camera,
    set_camera_position, set_microphone, HandleOutcome,
};
pub use participant::{
    AuthenticatedRemote, HandshakeState, LocalParticipant, RemoteHello, RemoteParticipant,
};
pub use sequence::{build_nonce, SequenceNumber};
pub use state::GroupCallState;
pub use types::{
    CallCookie, CameraPosition, ParticipantId, CALL_COOKIE_SIZE, MAX_CALL_PARTICIPANTS,
};

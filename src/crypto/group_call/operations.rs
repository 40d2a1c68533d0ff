use std::collections::HashMap;

use tracing::warn;
use zeroize::Zeroizing;

use crate::crypto::provider::{CallCrypto, GroupMembership};
use crate::crypto::symmetric::hkdf_expand_to_key;
use crate::error::{CallSdkError, Result};
use crate::proto::participant_to_participant::{
    capture_device, capture_state, envelope, CaptureDevice, CaptureState, Envelope, OuterEnvelope,
    Unit,
};

use super::dispatch::{dispatch_envelope, ResponseAction};
use super::envelope::encrypt_post_handshake;
use super::handshake::{build_own_hello, process_handshake_message};
use super::participant::{LocalParticipant, RemoteParticipant};
use super::state::GroupCallState;
use super::types::{CameraPosition, ParticipantId};

const GCHK_INFO: &[u8] = b"veilcall.gchk";

/// Result of handling one inbound outer envelope.
pub struct HandleOutcome {
    /// Encrypted replies to put on the data channel, in order.
    pub replies: Vec<OuterEnvelope>,
    /// Side effect required by a post-handshake message, if any.
    pub action: ResponseAction,
    /// Set when this message completed the sender's handshake; the remote is
    /// now usable for capture-state and rekey traffic.
    pub promoted: Option<ParticipantId>,
}

impl HandleOutcome {
    fn dropped() -> Self {
        Self {
            replies: Vec::new(),
            action: ResponseAction::None,
            promoted: None,
        }
    }
}

/// Failures that mean "drop the message, change nothing" rather than a
/// caller error.
fn is_droppable(error: &CallSdkError) -> bool {
    matches!(
        error,
        CallSdkError::Decryption(_)
            | CallSdkError::BadMessage(_)
            | CallSdkError::UnsupportedMessage(_)
            | CallSdkError::UnknownIdentity(_)
    )
}

/// Create the call session state for this device. The group call key is the
/// value shared out-of-band with all participants; only the handshake key is
/// derived from it here.
pub fn create_group_call(
    id: ParticipantId,
    identity: impl Into<String>,
    nickname: impl Into<String>,
    group_call_key: &[u8],
) -> GroupCallState {
    let identity = identity.into();
    let nickname = nickname.into();
    let nickname = if nickname.is_empty() {
        identity.clone()
    } else {
        nickname
    };
    GroupCallState {
        local: LocalParticipant::new(id, identity, nickname),
        remotes: HashMap::new(),
        gchk: Zeroizing::new(*hkdf_expand_to_key(group_call_key, GCHK_INFO)),
    }
}

/// Track a remote slot the SFU reported. `is_existing_participant` selects
/// the starting state: for an already-established remote we are the newcomer
/// and must open the round, so the initial Hello to send is returned.
pub fn add_remote_participant(
    state: &mut GroupCallState,
    crypto: &dyn CallCrypto,
    id: ParticipantId,
    is_existing_participant: bool,
) -> Result<Option<OuterEnvelope>> {
    if id == state.local.id {
        return Err(CallSdkError::BadParticipantState(
            "cannot track the local id as a remote",
        ));
    }
    if state.remotes.contains_key(&id) {
        return Err(CallSdkError::BadParticipantState(
            "participant already tracked",
        ));
    }

    let remote = RemoteParticipant::new(id, crypto, is_existing_participant);
    let hello = if is_existing_participant {
        let encrypted = super::envelope::encrypt_hello(
            &state.gchk,
            build_own_hello(&state.local, &remote),
            crypto.padding(),
        )?;
        Some(OuterEnvelope {
            sender: state.local.id.as_u32(),
            receiver: id.as_u32(),
            encrypted_data: encrypted,
        })
    } else {
        None
    };

    state.remotes.insert(id, remote);
    Ok(hello)
}

/// Discard a remote's protocol state after the SFU reported its departure.
/// An in-flight handshake is abandoned, not negotiated closed. The caller
/// runs [`rotate_media_keys`] afterwards per the leave protocol.
pub fn remove_remote_participant(state: &mut GroupCallState, id: ParticipantId) -> Result<()> {
    state
        .remotes
        .remove(&id)
        .map(|_| ())
        .ok_or(CallSdkError::ParticipantNotFound)
}

/// Feed one inbound outer envelope through the handshake machine or the
/// post-handshake dispatcher, depending on the sender's state.
///
/// Undecryptable, malformed, unsupported, or misrouted messages are dropped
/// (logged, state unchanged, empty outcome). Errors that indicate caller
/// misuse or a local protocol violation are surfaced.
pub fn handle_outer_envelope(
    state: &mut GroupCallState,
    crypto: &dyn CallCrypto,
    membership: &dyn GroupMembership,
    outer: &OuterEnvelope,
) -> Result<HandleOutcome> {
    if outer.receiver != state.local.id.as_u32() {
        warn!(
            sender = outer.sender,
            receiver = outer.receiver,
            "dropping envelope addressed to another participant"
        );
        return Ok(HandleOutcome::dropped());
    }

    let Ok(sender) = ParticipantId::new(outer.sender) else {
        warn!(sender = outer.sender, "dropping envelope with out-of-range sender id");
        return Ok(HandleOutcome::dropped());
    };
    let Some(remote) = state.remotes.get_mut(&sender) else {
        warn!(sender = outer.sender, "dropping envelope from untracked participant");
        return Ok(HandleOutcome::dropped());
    };

    if remote.is_authenticated() {
        let result = super::envelope::decrypt_post_handshake(remote, &outer.encrypted_data)
            .and_then(|received| dispatch_envelope(remote, received));
        match result {
            Ok(action) => Ok(HandleOutcome {
                replies: Vec::new(),
                action,
                promoted: None,
            }),
            Err(error) if is_droppable(&error) => {
                warn!(sender = outer.sender, %error, "dropping post-handshake envelope");
                Ok(HandleOutcome::dropped())
            }
            Err(error) => Err(error),
        }
    } else {
        let result = process_handshake_message(
            remote,
            &state.local,
            &state.gchk,
            crypto,
            membership,
            &outer.encrypted_data,
        );
        match result {
            Ok(output) => Ok(HandleOutcome {
                replies: output
                    .replies
                    .into_iter()
                    .map(|encrypted_data| OuterEnvelope {
                        sender: state.local.id.as_u32(),
                        receiver: sender.as_u32(),
                        encrypted_data,
                    })
                    .collect(),
                action: ResponseAction::None,
                promoted: output.promoted.then_some(sender),
            }),
            Err(error) if is_droppable(&error) => {
                warn!(sender = outer.sender, %error, "dropping handshake message");
                Ok(HandleOutcome::dropped())
            }
            Err(error) => Err(error),
        }
    }
}

/// Encrypt one envelope content individually for every authenticated remote.
fn broadcast(
    remotes: &mut HashMap<ParticipantId, RemoteParticipant>,
    local_id: ParticipantId,
    crypto: &dyn CallCrypto,
    content: envelope::Content,
) -> Result<Vec<OuterEnvelope>> {
    let mut targets: Vec<&mut RemoteParticipant> = remotes
        .values_mut()
        .filter(|r| r.is_authenticated())
        .collect();
    targets.sort_by_key(|r| r.id());

    let mut out = Vec::with_capacity(targets.len());
    for remote in targets {
        let receiver = remote.id();
        let message = Envelope {
            padding: crypto.padding(),
            content: Some(content.clone()),
        };
        let encrypted_data = encrypt_post_handshake(remote, &message)?;
        out.push(OuterEnvelope {
            sender: local_id.as_u32(),
            receiver: receiver.as_u32(),
            encrypted_data,
        });
    }
    Ok(out)
}

fn capture_content(camera: bool, on: bool) -> envelope::Content {
    let device_state = if on {
        capture_device::State::On(Unit {})
    } else {
        capture_device::State::Off(Unit {})
    };
    let device = CaptureDevice {
        state: Some(device_state),
    };
    let capture = if camera {
        capture_state::Device::Camera(device)
    } else {
        capture_state::Device::Microphone(device)
    };
    envelope::Content::CaptureState(CaptureState {
        device: Some(capture),
    })
}

/// Announce the local microphone state to all authenticated remotes.
pub fn set_microphone(
    state: &mut GroupCallState,
    crypto: &dyn CallCrypto,
    on: bool,
) -> Result<Vec<OuterEnvelope>> {
    state.local.audio_muted = !on;
    broadcast(
        &mut state.remotes,
        state.local.id,
        crypto,
        capture_content(false, on),
    )
}

/// Announce the local camera state to all authenticated remotes.
pub fn set_camera(
    state: &mut GroupCallState,
    crypto: &dyn CallCrypto,
    on: bool,
) -> Result<Vec<OuterEnvelope>> {
    state.local.video_muted = !on;
    broadcast(
        &mut state.remotes,
        state.local.id,
        crypto,
        capture_content(true, on),
    )
}

pub fn set_camera_position(state: &mut GroupCallState, position: CameraPosition) {
    state.local.camera_position = position;
}

/// Begin a rekey round (the leave protocol): create the pending PCMK and
/// return its encrypted per-remote deliveries. Fails with
/// [`CallSdkError::ExistingPendingMediaKeys`] while a rotation is in flight;
/// in that case the pending key is marked stale and the caller retries after
/// [`adopt_pending_media_keys`].
pub fn rotate_media_keys(
    state: &mut GroupCallState,
    crypto: &dyn CallCrypto,
) -> Result<Vec<OuterEnvelope>> {
    let rekey = state.local.keys.rotate()?.to_proto();
    broadcast(
        &mut state.remotes,
        state.local.id,
        crypto,
        envelope::Content::Rekey(rekey),
    )
}

/// Promote the pending PCMK to current once all remotes acknowledged (or a
/// timer fired; the policy is the caller's). Returns whether the adopted key
/// was stale, in which case another rotation must start immediately.
pub fn adopt_pending_media_keys(state: &mut GroupCallState) -> Result<bool> {
    state.local.keys.adopt()
}

/// Forward-secret advancement of the current PCMK within its epoch.
pub fn ratchet_media_keys(state: &mut GroupCallState) -> Result<()> {
    state.local.keys.ratchet()
}

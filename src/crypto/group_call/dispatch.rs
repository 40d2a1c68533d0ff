use tracing::debug;

use crate::error::{CallSdkError, Result};
use crate::proto::participant_to_participant::{capture_device, capture_state, envelope, Envelope};
use crate::proto::participant_to_sfu;

use super::keys::MediaKeys;
use super::participant::RemoteParticipant;
use super::types::ParticipantId;

/// External side effect required after handling a post-handshake envelope.
#[derive(Debug, Clone)]
pub enum ResponseAction {
    /// Subscribe to the participant's video at the SFU.
    SubscribeVideo(ParticipantId),
    /// Unsubscribe from the participant's video at the SFU.
    UnsubscribeVideo(ParticipantId),
    /// Subscribe to the participant's audio at the SFU.
    SubscribeAudio(ParticipantId),
    /// The participant delivered a media key during a rekey round.
    MediaKeyReceived {
        participant: ParticipantId,
        media_keys: MediaKeys,
    },
    /// Nothing to do (mute updates without SFU traffic, dropped content).
    None,
}

/// Map a decrypted post-handshake envelope to its response action, updating
/// the remote's capture state along the way. Pure protocol logic; the caller
/// performs the SFU side effects.
pub(crate) fn dispatch_envelope(
    remote: &mut RemoteParticipant,
    received: Envelope,
) -> Result<ResponseAction> {
    let id = remote.id();
    let authed = remote.authenticated_mut()?;

    match received.content {
        Some(envelope::Content::CaptureState(capture)) => match capture.device {
            Some(capture_state::Device::Camera(device)) => match device.state {
                Some(capture_device::State::On(_)) => {
                    authed.video_muted = false;
                    Ok(ResponseAction::SubscribeVideo(id))
                }
                Some(capture_device::State::Off(_)) => {
                    authed.video_muted = true;
                    Ok(ResponseAction::UnsubscribeVideo(id))
                }
                None => Err(CallSdkError::BadMessage(
                    "capture state with empty camera state".to_string(),
                )),
            },
            Some(capture_state::Device::Microphone(device)) => match device.state {
                Some(capture_device::State::On(_)) => {
                    authed.audio_muted = false;
                    Ok(ResponseAction::SubscribeAudio(id))
                }
                // Audio subscription is kept across mutes; only the state
                // changes.
                Some(capture_device::State::Off(_)) => {
                    authed.audio_muted = true;
                    Ok(ResponseAction::None)
                }
                None => Err(CallSdkError::BadMessage(
                    "capture state with empty microphone state".to_string(),
                )),
            },
            None => Err(CallSdkError::BadMessage(
                "capture state without a device".to_string(),
            )),
        },

        Some(envelope::Content::Rekey(key)) => {
            let media_keys = MediaKeys::from_proto(&key)?;
            authed.media_keys.push(media_keys.clone());
            Ok(ResponseAction::MediaKeyReceived {
                participant: id,
                media_keys,
            })
        }

        Some(envelope::Content::EncryptedAdminEnvelope(_)) => {
            debug!(participant = id.as_u32(), "dropping admin envelope (unsupported)");
            Ok(ResponseAction::None)
        }

        Some(envelope::Content::HoldState(_)) => {
            debug!(participant = id.as_u32(), "dropping hold state (unsupported)");
            Ok(ResponseAction::None)
        }

        None => {
            debug!(participant = id.as_u32(), "dropping envelope without content");
            Ok(ResponseAction::None)
        }
    }
}

/// Materialize the SFU request for an action, if it needs one.
pub fn sfu_envelope(action: &ResponseAction) -> Option<participant_to_sfu::Envelope> {
    use participant_to_sfu::{
        envelope::Content, Envelope, MediaKind, SubscribeParticipantMedia,
        UnsubscribeParticipantMedia,
    };

    let content = match action {
        ResponseAction::SubscribeVideo(id) => Content::Subscribe(SubscribeParticipantMedia {
            participant_id: id.as_u32(),
            media: MediaKind::Video as i32,
        }),
        ResponseAction::UnsubscribeVideo(id) => Content::Unsubscribe(UnsubscribeParticipantMedia {
            participant_id: id.as_u32(),
            media: MediaKind::Video as i32,
        }),
        ResponseAction::SubscribeAudio(id) => Content::Subscribe(SubscribeParticipantMedia {
            participant_id: id.as_u32(),
            media: MediaKind::Audio as i32,
        }),
        ResponseAction::MediaKeyReceived { .. } | ResponseAction::None => return None,
    };
    Some(Envelope {
        content: Some(content),
    })
}

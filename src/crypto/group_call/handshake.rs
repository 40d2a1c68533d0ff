//! Per-participant handshake state machine.
//!
//! Exactly one inbound message kind is legal per state; anything else leaves
//! the state untouched and surfaces as a dropped message. A remote is
//! promoted to authenticated by the `AwaitAuth -> Done` transition.

use crate::crypto::provider::{CallCrypto, GroupMembership, PUBLIC_KEY_SIZE};
use crate::crypto::symmetric::KEY_SIZE;
use crate::error::{CallSdkError, Result};
use crate::proto::handshake::{Auth, Hello};

use super::envelope::{decrypt_auth, decrypt_hello, encrypt_auth, encrypt_hello};
use super::keys::MediaKeys;
use super::participant::{
    AuthenticatedRemote, HandshakeState, LocalParticipant, RemoteHello, RemoteParticipant,
};
use super::types::CallCookie;

/// Result of feeding one handshake message into the machine: the encrypted
/// replies to send, in order, and whether the remote just reached `Done`.
pub(crate) struct HandshakeOutput {
    pub replies: Vec<Vec<u8>>,
    pub promoted: bool,
}

/// Our Hello toward one remote: the ephemeral key and cookie this side uses
/// to talk to that remote.
pub(crate) fn build_own_hello(local: &LocalParticipant, remote: &RemoteParticipant) -> Hello {
    Hello {
        identity: local.identity.clone(),
        nickname: local.nickname.clone(),
        pck: remote.keypair.public.to_vec(),
        pcck: remote.cookie.as_bytes().to_vec(),
    }
}

/// Our Auth toward one remote: echoes the remote's pck/pcck and discloses
/// the local media keys (current, plus pending if a rotation is in flight).
fn build_own_auth(local: &LocalParticipant, remote_hello: &RemoteHello) -> Auth {
    let mut media_keys = vec![local.keys.current().to_proto()];
    if let Some(pending) = local.keys.pending() {
        media_keys.push(pending.to_proto());
    }
    Auth {
        pck: remote_hello.pck.to_vec(),
        pcck: remote_hello.pcck.as_bytes().to_vec(),
        media_keys,
    }
}

/// Steps shared by both Hello transitions: record the remote's keys and
/// identity, verify group membership, apply the nickname fallback.
fn learn_hello(hello: Hello, membership: &dyn GroupMembership) -> Result<RemoteHello> {
    let pck: [u8; PUBLIC_KEY_SIZE] = hello
        .pck
        .as_slice()
        .try_into()
        .map_err(|_| CallSdkError::BadMessage("hello carries a malformed pck".to_string()))?;
    let pcck = CallCookie::from_bytes(&hello.pcck)
        .map_err(|_| CallSdkError::BadMessage("hello carries a malformed pcck".to_string()))?;

    if !membership.is_member(&hello.identity) {
        return Err(CallSdkError::BadMessage(format!(
            "hello sender {} is not a member of the call's group",
            hello.identity
        )));
    }

    let nickname = if hello.nickname.is_empty() {
        hello.identity.clone()
    } else {
        hello.nickname
    };

    Ok(RemoteHello {
        pck,
        pcck,
        identity: hello.identity,
        nickname,
    })
}

pub(crate) fn process_handshake_message(
    remote: &mut RemoteParticipant,
    local: &LocalParticipant,
    gchk: &[u8; KEY_SIZE],
    crypto: &dyn CallCrypto,
    membership: &dyn GroupMembership,
    data: &[u8],
) -> Result<HandshakeOutput> {
    match &remote.state {
        HandshakeState::AwaitNewParticipantHello => {
            let remote_hello = learn_hello(decrypt_hello(gchk, data)?, membership)?;
            let gcnhak = crypto
                .auth_key(&remote_hello.identity)
                .ok_or_else(|| CallSdkError::UnknownIdentity(remote_hello.identity.clone()))?;

            let auth = build_own_auth(local, &remote_hello);
            remote.state = HandshakeState::AwaitAuth(remote_hello);

            // Reply order matters: our Hello first, then Auth.
            let hello_reply = encrypt_hello(gchk, build_own_hello(local, remote), crypto.padding())?;
            let auth_reply = encrypt_auth(remote, &gcnhak, auth, crypto.padding())?;
            Ok(HandshakeOutput {
                replies: vec![hello_reply, auth_reply],
                promoted: false,
            })
        }

        HandshakeState::AwaitExistingParticipantHello => {
            let remote_hello = learn_hello(decrypt_hello(gchk, data)?, membership)?;

            // A Hello carrying our own keys back at us is a loopback or a
            // misconfigured sender, never a legitimate peer.
            if remote_hello.pck == remote.keypair.public || remote_hello.pcck == remote.cookie {
                return Err(CallSdkError::BadMessage(
                    "hello reflects our own pck/pcck".to_string(),
                ));
            }

            let gcnhak = crypto
                .auth_key(&remote_hello.identity)
                .ok_or_else(|| CallSdkError::UnknownIdentity(remote_hello.identity.clone()))?;

            let auth = build_own_auth(local, &remote_hello);
            remote.state = HandshakeState::AwaitAuth(remote_hello);

            // Our Hello already went out when this remote was added.
            let auth_reply = encrypt_auth(remote, &gcnhak, auth, crypto.padding())?;
            Ok(HandshakeOutput {
                replies: vec![auth_reply],
                promoted: false,
            })
        }

        HandshakeState::AwaitAuth(hello) => {
            let identity = hello.identity.clone();
            let gcnhak = crypto
                .auth_key(&identity)
                .ok_or(CallSdkError::UnknownIdentity(identity))?;
            let auth = decrypt_auth(remote, &gcnhak, data)?;

            // The Auth payload must echo exactly the pck/pcck we announced.
            if auth.pck.as_slice() != remote.keypair.public
                || auth.pcck.as_slice() != remote.cookie.as_bytes()
            {
                return Err(CallSdkError::BadMessage(
                    "auth does not echo our pck/pcck".to_string(),
                ));
            }

            let media_keys = auth
                .media_keys
                .iter()
                .map(MediaKeys::from_proto)
                .collect::<Result<Vec<_>>>()?;

            let previous =
                std::mem::replace(&mut remote.state, HandshakeState::AwaitNewParticipantHello);
            let HandshakeState::AwaitAuth(hello) = previous else {
                return Err(CallSdkError::BadParticipantState(
                    "handshake state changed underneath auth processing",
                ));
            };
            remote.state = HandshakeState::Done(AuthenticatedRemote {
                hello,
                media_keys,
                audio_muted: true,
                video_muted: true,
            });
            Ok(HandshakeOutput {
                replies: Vec::new(),
                promoted: true,
            })
        }

        HandshakeState::Done(_) => Err(CallSdkError::BadParticipantState(
            "handshake already complete",
        )),
    }
}

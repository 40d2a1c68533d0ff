//! The three crypto envelope layers.
//!
//! Hello: symmetric under the GCHK with a random, cleartext-prepended nonce
//! (no per-participant relationship exists yet). Auth: a GCNHAK inner box
//! (long-term identity binding) nested in an ephemeral outer box. Post
//! handshake: the ephemeral outer box alone. Outer nonces are never sent;
//! they are `sender cookie || sender counter`, reconstructed by the receiver
//! from the Hello-learned cookie and a mirror counter.

use prost::Message;

use crate::crypto::provider::derive_box_key;
use crate::crypto::symmetric::{open, open_prepended, seal, seal_prepended, KEY_SIZE};
use crate::error::{CallSdkError, Result};
use crate::proto::handshake::{auth_envelope, hello_envelope, Auth, AuthEnvelope, Hello, HelloEnvelope};
use crate::proto::participant_to_participant::Envelope;

use super::participant::RemoteParticipant;
use super::sequence::build_nonce;

/// Seal under the established per-participant box: our ephemeral secret, the
/// remote's `pck`, and our `pcck || next(outgoing)` as nonce.
fn box_seal(remote: &mut RemoteParticipant, plaintext: &[u8]) -> Result<Vec<u8>> {
    let their_pck = remote.remote_hello()?.pck;
    let key = derive_box_key(&remote.keypair.secret, &their_pck);
    let nonce = build_nonce(&remote.cookie, remote.outgoing.next());
    seal(&key, &nonce, plaintext)
}

/// Open the per-participant box. The nonce is rebuilt from the remote's
/// cookie and the mirror counter; the mirror only advances once the tag
/// verifies, so a dropped forgery leaves the counter untouched.
fn box_open(remote: &mut RemoteParticipant, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let hello = remote.remote_hello()?;
    let their_pck = hello.pck;
    let their_pcck = hello.pcck.clone();

    let key = derive_box_key(&remote.keypair.secret, &their_pck);
    let nonce = build_nonce(&their_pcck, remote.incoming.peek());
    let plaintext = open(&key, &nonce, ciphertext)?;
    remote.incoming.next();
    Ok(plaintext)
}

pub(crate) fn encrypt_hello(
    gchk: &[u8; KEY_SIZE],
    hello: Hello,
    padding: Vec<u8>,
) -> Result<Vec<u8>> {
    let envelope = HelloEnvelope {
        padding,
        content: Some(hello_envelope::Content::Hello(hello)),
    };
    seal_prepended(gchk, &envelope.encode_to_vec())
}

pub(crate) fn decrypt_hello(gchk: &[u8; KEY_SIZE], data: &[u8]) -> Result<Hello> {
    let plaintext = open_prepended(gchk, data)?;
    let envelope = HelloEnvelope::decode(plaintext.as_slice())
        .map_err(|e| CallSdkError::Decryption(format!("Undecodable hello envelope: {}", e)))?;
    match envelope.content {
        Some(hello_envelope::Content::Hello(hello)) => Ok(hello),
        Some(hello_envelope::Content::GuestHello(_)) => {
            Err(CallSdkError::UnsupportedMessage("guest hello"))
        }
        None => Err(CallSdkError::BadMessage("empty hello envelope".to_string())),
    }
}

pub(crate) fn encrypt_auth(
    remote: &mut RemoteParticipant,
    gcnhak: &[u8; KEY_SIZE],
    auth: Auth,
    padding: Vec<u8>,
) -> Result<Vec<u8>> {
    let envelope = AuthEnvelope {
        padding,
        content: Some(auth_envelope::Content::Auth(auth)),
    };
    let inner = seal_prepended(gcnhak, &envelope.encode_to_vec())?;
    box_seal(remote, &inner)
}

pub(crate) fn decrypt_auth(
    remote: &mut RemoteParticipant,
    gcnhak: &[u8; KEY_SIZE],
    data: &[u8],
) -> Result<Auth> {
    let inner = box_open(remote, data)?;
    let plaintext = open_prepended(gcnhak, &inner)?;
    let envelope = AuthEnvelope::decode(plaintext.as_slice())
        .map_err(|e| CallSdkError::Decryption(format!("Undecodable auth envelope: {}", e)))?;
    match envelope.content {
        Some(auth_envelope::Content::Auth(auth)) => Ok(auth),
        Some(auth_envelope::Content::GuestAuth(_)) => {
            Err(CallSdkError::UnsupportedMessage("guest auth"))
        }
        None => Err(CallSdkError::BadMessage("empty auth envelope".to_string())),
    }
}

pub(crate) fn encrypt_post_handshake(
    remote: &mut RemoteParticipant,
    envelope: &Envelope,
) -> Result<Vec<u8>> {
    remote.authenticated()?;
    box_seal(remote, &envelope.encode_to_vec())
}

pub(crate) fn decrypt_post_handshake(
    remote: &mut RemoteParticipant,
    data: &[u8],
) -> Result<Envelope> {
    remote.authenticated()?;
    let plaintext = box_open(remote, data)?;
    Envelope::decode(plaintext.as_slice())
        .map_err(|e| CallSdkError::Decryption(format!("Undecodable envelope: {}", e)))
}

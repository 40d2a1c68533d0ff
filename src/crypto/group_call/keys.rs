use std::collections::HashMap;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::provider::FrameCrypto;
use crate::crypto::symmetric::{generate_random_bytes, hkdf_expand_to_key, KEY_SIZE};
use crate::error::{CallSdkError, Result};
use crate::proto;

pub const MEDIA_KEY_SIZE: usize = KEY_SIZE;

/// `u8::MAX` is reserved as an out-of-range sentinel for epoch and ratchet
/// counter; a legitimately observed 255 is a protocol violation.
pub const RESERVED_MEDIA_KEY_VERSION: u8 = u8::MAX;

const PCMK_RATCHET_INFO: &[u8] = b"veilcall.pcmk.ratchet";

/// Participant call media key: the symmetric key protecting media frames for
/// one participant, versioned by epoch (full rekey) and ratchet counter
/// (forward-secret advancement within an epoch).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MediaKeys {
    pcmk: [u8; MEDIA_KEY_SIZE],
    #[zeroize(skip)]
    epoch: u8,
    #[zeroize(skip)]
    ratchet_counter: u8,
}

impl std::fmt::Debug for MediaKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MediaKeys(***, epoch {}, ratchet {})",
            self.epoch, self.ratchet_counter
        )
    }
}

impl MediaKeys {
    /// Fresh random key at epoch 0, created at local participant join.
    pub fn generate() -> Self {
        Self::fresh(0)
    }

    fn fresh(epoch: u8) -> Self {
        let mut pcmk = [0u8; MEDIA_KEY_SIZE];
        pcmk.copy_from_slice(&generate_random_bytes(MEDIA_KEY_SIZE));
        Self {
            pcmk,
            epoch,
            ratchet_counter: 0,
        }
    }

    pub(crate) fn from_raw(pcmk: [u8; MEDIA_KEY_SIZE], epoch: u8, ratchet_counter: u8) -> Self {
        Self {
            pcmk,
            epoch,
            ratchet_counter,
        }
    }

    pub fn pcmk(&self) -> &[u8; MEDIA_KEY_SIZE] {
        &self.pcmk
    }

    pub fn epoch(&self) -> u8 {
        self.epoch
    }

    pub fn ratchet_counter(&self) -> u8 {
        self.ratchet_counter
    }

    /// The key replacing this one after a full rekey round: fresh random
    /// material, epoch advanced by one (255 wraps to 0), ratchet reset.
    pub(crate) fn successor(&self) -> Self {
        let epoch = if self.epoch == u8::MAX {
            0
        } else {
            self.epoch + 1
        };
        Self::fresh(epoch)
    }

    /// Forward-secret advancement within the same epoch: the key material is
    /// re-derived from the current key, the ratchet counter increments.
    pub(crate) fn ratcheted(&self) -> Result<Self> {
        if self.ratchet_counter >= RESERVED_MEDIA_KEY_VERSION - 1 {
            return Err(CallSdkError::LocalProtocolViolation(
                "ratchet counter exhausted, full rekey required",
            ));
        }
        let derived = hkdf_expand_to_key(&self.pcmk, PCMK_RATCHET_INFO);
        Ok(Self {
            pcmk: *derived,
            epoch: self.epoch,
            ratchet_counter: self.ratchet_counter + 1,
        })
    }

    pub fn to_proto(&self) -> proto::MediaKey {
        proto::MediaKey {
            epoch: u32::from(self.epoch),
            ratchet_counter: u32::from(self.ratchet_counter),
            pcmk: self.pcmk.to_vec(),
        }
    }

    /// Decode a wire media key. The reserved sentinel value is rejected as a
    /// local protocol violation; values that do not fit the version byte at
    /// all are a malformed message.
    pub fn from_proto(key: &proto::MediaKey) -> Result<Self> {
        if key.epoch > u32::from(u8::MAX) || key.ratchet_counter > u32::from(u8::MAX) {
            return Err(CallSdkError::BadMessage(
                "media key version out of range".to_string(),
            ));
        }
        if key.epoch == u32::from(RESERVED_MEDIA_KEY_VERSION)
            || key.ratchet_counter == u32::from(RESERVED_MEDIA_KEY_VERSION)
        {
            return Err(CallSdkError::LocalProtocolViolation(
                "media key uses the reserved version sentinel",
            ));
        }
        if key.pcmk.len() != MEDIA_KEY_SIZE {
            return Err(CallSdkError::InvalidKeyLength {
                expected: MEDIA_KEY_SIZE,
                actual: key.pcmk.len(),
            });
        }
        let mut pcmk = [0u8; MEDIA_KEY_SIZE];
        pcmk.copy_from_slice(&key.pcmk);
        Ok(Self {
            pcmk,
            epoch: key.epoch as u8,
            ratchet_counter: key.ratchet_counter as u8,
        })
    }
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct PendingMediaKeys {
    keys: MediaKeys,
    #[zeroize(skip)]
    stale: bool,
}

/// The local participant's media key lifecycle: one current key always, at
/// most one pending key mid-rotation, plus the staleness flag consulted at
/// adoption time.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LocalKeyState {
    current: MediaKeys,
    pending: Option<PendingMediaKeys>,
}

impl LocalKeyState {
    pub fn new() -> Self {
        Self {
            current: MediaKeys::generate(),
            pending: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_current(current: MediaKeys) -> Self {
        Self {
            current,
            pending: None,
        }
    }

    pub fn current(&self) -> &MediaKeys {
        &self.current
    }

    pub fn pending(&self) -> Option<&MediaKeys> {
        self.pending.as_ref().map(|p| &p.keys)
    }

    pub fn pending_is_stale(&self) -> Option<bool> {
        self.pending.as_ref().map(|p| p.stale)
    }

    /// Begin a rekey round. If a rotation is already pending it is marked
    /// stale and the call fails; the caller retries after the pending key is
    /// adopted.
    pub fn rotate(&mut self) -> Result<&MediaKeys> {
        if let Some(pending) = &mut self.pending {
            pending.stale = true;
            return Err(CallSdkError::ExistingPendingMediaKeys);
        }
        let pending = self.pending.insert(PendingMediaKeys {
            keys: self.current.successor(),
            stale: false,
        });
        Ok(&pending.keys)
    }

    /// Replace the current key with the pending one. Returns whether the
    /// adopted key went stale while pending; if so, the caller must start
    /// another rotation immediately.
    pub fn adopt(&mut self) -> Result<bool> {
        let pending = self.pending.take().ok_or(CallSdkError::BadParticipantState(
            "no pending media keys to adopt",
        ))?;
        self.current = pending.keys.clone();
        Ok(pending.stale)
    }

    /// Ratchet the current key forward within its epoch.
    pub fn ratchet(&mut self) -> Result<()> {
        self.current = self.current.ratcheted()?;
        Ok(())
    }
}

impl Default for LocalKeyState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`FrameCrypto`] sink keyed by `(epoch, ratchet_counter)`, so
/// delayed frames encrypted under a slightly older ratchet state remain
/// decryptable during a rotation window.
#[derive(Default)]
pub struct ReceivedKeyRegistry {
    keys: HashMap<(u8, u8), [u8; MEDIA_KEY_SIZE]>,
}

impl ReceivedKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, epoch: u8, ratchet_counter: u8) -> Option<&[u8; MEDIA_KEY_SIZE]> {
        self.keys.get(&(epoch, ratchet_counter))
    }
}

impl FrameCrypto for ReceivedKeyRegistry {
    fn add_decryption_key(&mut self, epoch: u8, ratchet_counter: u8, pcmk: &[u8; KEY_SIZE]) {
        self.keys.insert((epoch, ratchet_counter), *pcmk);
    }
}

/// Validate a received media key and register it with the frame decryptor.
pub fn add_received_media_key(
    key: &proto::MediaKey,
    decryptor: &mut dyn FrameCrypto,
) -> Result<()> {
    let keys = MediaKeys::from_proto(key)?;
    decryptor.add_decryption_key(keys.epoch(), keys.ratchet_counter(), keys.pcmk());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_succession_wraps_at_sentinel() {
        let at_max = MediaKeys::from_raw([1u8; MEDIA_KEY_SIZE], 255, 3);
        assert_eq!(at_max.successor().epoch(), 0);

        let mid = MediaKeys::from_raw([1u8; MEDIA_KEY_SIZE], 200, 3);
        let next = mid.successor();
        assert_eq!(next.epoch(), 201);
        assert_eq!(next.ratchet_counter(), 0);
        assert_ne!(next.pcmk(), mid.pcmk());
    }

    #[test]
    fn ratchet_rederives_key_and_bumps_counter() {
        let keys = MediaKeys::from_raw([2u8; MEDIA_KEY_SIZE], 5, 0);
        let ratcheted = keys.ratcheted().unwrap();
        assert_eq!(ratcheted.epoch(), 5);
        assert_eq!(ratcheted.ratchet_counter(), 1);
        assert_ne!(ratcheted.pcmk(), keys.pcmk());

        // Deterministic: the same input always ratchets to the same key.
        assert_eq!(keys.ratcheted().unwrap().pcmk(), ratcheted.pcmk());
    }

    #[test]
    fn ratchet_refuses_to_reach_sentinel() {
        let keys = MediaKeys::from_raw([2u8; MEDIA_KEY_SIZE], 5, 253);
        assert_eq!(keys.ratcheted().unwrap().ratchet_counter(), 254);

        let at_edge = MediaKeys::from_raw([2u8; MEDIA_KEY_SIZE], 5, 254);
        assert!(matches!(
            at_edge.ratcheted(),
            Err(CallSdkError::LocalProtocolViolation(_))
        ));
    }

    #[test]
    fn only_one_pending_rotation() {
        let mut state = LocalKeyState::new();
        let first_epoch = state.current().epoch();

        state.rotate().unwrap();
        assert_eq!(state.pending().unwrap().epoch(), first_epoch + 1);
        assert_eq!(state.pending_is_stale(), Some(false));

        assert!(matches!(
            state.rotate(),
            Err(CallSdkError::ExistingPendingMediaKeys)
        ));
        assert_eq!(state.pending_is_stale(), Some(true));

        let was_stale = state.adopt().unwrap();
        assert!(was_stale);
        assert_eq!(state.current().epoch(), first_epoch + 1);
        assert!(state.pending().is_none());
    }

    #[test]
    fn adopt_without_pending_is_a_state_error() {
        let mut state = LocalKeyState::new();
        assert!(matches!(
            state.adopt(),
            Err(CallSdkError::BadParticipantState(_))
        ));
    }

    #[test]
    fn rotate_at_epoch_sentinel_wraps_to_zero() {
        let mut state =
            LocalKeyState::with_current(MediaKeys::from_raw([3u8; MEDIA_KEY_SIZE], 255, 0));
        state.rotate().unwrap();
        assert_eq!(state.pending().unwrap().epoch(), 0);
    }

    #[test]
    fn received_key_registry_rejects_sentinel_and_stores_the_rest() {
        let mut registry = ReceivedKeyRegistry::new();

        let good = proto::MediaKey {
            epoch: 7,
            ratchet_counter: 3,
            pcmk: vec![9u8; MEDIA_KEY_SIZE],
        };
        add_received_media_key(&good, &mut registry).unwrap();
        assert_eq!(registry.get(7, 3), Some(&[9u8; MEDIA_KEY_SIZE]));
        assert_eq!(registry.get(7, 4), None);

        for bad in [
            proto::MediaKey {
                epoch: 255,
                ratchet_counter: 0,
                pcmk: vec![9u8; MEDIA_KEY_SIZE],
            },
            proto::MediaKey {
                epoch: 0,
                ratchet_counter: 255,
                pcmk: vec![9u8; MEDIA_KEY_SIZE],
            },
        ] {
            assert!(matches!(
                add_received_media_key(&bad, &mut registry),
                Err(CallSdkError::LocalProtocolViolation(_))
            ));
        }

        let oversized = proto::MediaKey {
            epoch: 300,
            ratchet_counter: 0,
            pcmk: vec![9u8; MEDIA_KEY_SIZE],
        };
        assert!(matches!(
            add_received_media_key(&oversized, &mut registry),
            Err(CallSdkError::BadMessage(_))
        ));
    }
}

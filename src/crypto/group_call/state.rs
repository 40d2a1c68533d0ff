use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::crypto::symmetric::KEY_SIZE;
use crate::error::{CallSdkError, Result};

use super::keys::MediaKeys;
use super::participant::{LocalParticipant, RemoteParticipant};
use super::types::ParticipantId;

/// All mutable protocol state for one call. Confined to a single logical
/// serial execution context: operations take `&mut` and never interleave.
pub struct GroupCallState {
    pub(crate) local: LocalParticipant,
    pub(crate) remotes: HashMap<ParticipantId, RemoteParticipant>,
    /// Group call handshake key, derived once from the shared group call key.
    pub(crate) gchk: Zeroizing<[u8; KEY_SIZE]>,
}

impl GroupCallState {
    pub fn local(&self) -> &LocalParticipant {
        &self.local
    }

    pub fn remote(&self, id: ParticipantId) -> Option<&RemoteParticipant> {
        self.remotes.get(&id)
    }

    pub fn remotes(&self) -> impl Iterator<Item = &RemoteParticipant> {
        self.remotes.values()
    }

    pub fn participant_count(&self) -> usize {
        self.remotes.len() + 1
    }

    pub fn authenticated_ids(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self
            .remotes
            .values()
            .filter(|r| r.is_authenticated())
            .map(RemoteParticipant::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Media keys the remote disclosed so far (Auth plus later rekeys).
    /// Fails before the remote reaches `Done`.
    pub fn remote_media_keys(&self, id: ParticipantId) -> Result<&[MediaKeys]> {
        let remote = self
            .remotes
            .get(&id)
            .ok_or(CallSdkError::ParticipantNotFound)?;
        Ok(remote.authenticated()?.media_keys.as_slice())
    }
}

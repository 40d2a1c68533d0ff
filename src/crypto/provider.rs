use std::collections::HashMap;

use rand::{rngs::OsRng, Rng};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret as X25519Secret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::symmetric::{generate_random_bytes, hkdf_expand_to_key, KEY_SIZE};

pub const PUBLIC_KEY_SIZE: usize = 32;

const BOX_KEY_INFO: &[u8] = b"veilcall.box";
const GCNHAK_INFO: &[u8] = b"veilcall.gcnhak";

/// Ephemeral Curve25519 key pair, generated once per participant-session.
/// Never persisted; dropped (and zeroized) with the call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EphemeralKeyPair {
    #[zeroize(skip)]
    pub public: [u8; PUBLIC_KEY_SIZE],
    pub secret: [u8; KEY_SIZE],
}

impl EphemeralKeyPair {
    pub fn generate() -> Self {
        let secret = X25519Secret::random_from_rng(OsRng);
        let public = X25519Public::from(&secret);
        Self {
            public: *public.as_bytes(),
            secret: secret.to_bytes(),
        }
    }
}

/// Derive the symmetric box key for one ephemeral pair relationship:
/// `HKDF(DH(own_secret, their_public))`. Both sides derive the same key.
pub fn derive_box_key(
    own_secret: &[u8; KEY_SIZE],
    their_public: &[u8; PUBLIC_KEY_SIZE],
) -> Zeroizing<[u8; KEY_SIZE]> {
    let secret = X25519Secret::from(*own_secret);
    let shared = secret.diffie_hellman(&X25519Public::from(*their_public));
    hkdf_expand_to_key(shared.as_bytes(), BOX_KEY_INFO)
}

/// Capabilities the call core needs from the surrounding application:
/// long-term identity key agreement and outbound padding policy.
///
/// Passed explicitly into the call session; the core never reaches for
/// ambient crypto state.
pub trait CallCrypto {
    /// Fresh ephemeral key pair for a participant-session.
    fn generate_keypair(&self) -> EphemeralKeyPair {
        EphemeralKeyPair::generate()
    }

    /// GCNHAK for the given identity: the per-pair authentication key derived
    /// from the long-term shared secret, independent of ephemeral material.
    /// `None` when the identity is unknown to this device.
    fn auth_key(&self, identity: &str) -> Option<Zeroizing<[u8; KEY_SIZE]>>;

    fn random_bytes(&self, len: usize) -> Vec<u8> {
        generate_random_bytes(len)
    }

    /// Random-length padding appended to outbound envelopes so ciphertext
    /// sizes do not leak message kinds.
    fn padding(&self) -> Vec<u8> {
        let len = OsRng.gen_range(0..=255usize);
        generate_random_bytes(len)
    }
}

/// Membership oracle: whether an identity belongs to the group this call is
/// associated with. Backed by the application's group state.
pub trait GroupMembership {
    fn is_member(&self, identity: &str) -> bool;
}

/// Sink for PCMK material handed to the media frame decryptor, keyed by
/// `(epoch, ratchet_counter)`.
pub trait FrameCrypto {
    fn add_decryption_key(&mut self, epoch: u8, ratchet_counter: u8, pcmk: &[u8; KEY_SIZE]);
}

/// Production [`CallCrypto`]: our long-term X25519 secret plus a directory of
/// known long-term public keys, indexed by identity string.
pub struct X25519Provider {
    secret: X25519Secret,
    public: X25519Public,
    contacts: HashMap<String, [u8; PUBLIC_KEY_SIZE]>,
}

impl X25519Provider {
    pub fn new(long_term_secret: [u8; KEY_SIZE]) -> Self {
        let secret = X25519Secret::from(long_term_secret);
        let public = X25519Public::from(&secret);
        Self {
            secret,
            public,
            contacts: HashMap::new(),
        }
    }

    pub fn generate() -> Self {
        Self::new(X25519Secret::random_from_rng(OsRng).to_bytes())
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *self.public.as_bytes()
    }

    pub fn add_contact(&mut self, identity: impl Into<String>, public: [u8; PUBLIC_KEY_SIZE]) {
        self.contacts.insert(identity.into(), public);
    }
}

impl CallCrypto for X25519Provider {
    fn auth_key(&self, identity: &str) -> Option<Zeroizing<[u8; KEY_SIZE]>> {
        let contact = self.contacts.get(identity)?;
        let shared = self.secret.diffie_hellman(&X25519Public::from(*contact));
        Some(hkdf_expand_to_key(shared.as_bytes(), GCNHAK_INFO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_key_agrees_for_both_sides() {
        let a = EphemeralKeyPair::generate();
        let b = EphemeralKeyPair::generate();

        let ab = derive_box_key(&a.secret, &b.public);
        let ba = derive_box_key(&b.secret, &a.public);
        assert_eq!(*ab, *ba);
    }

    #[test]
    fn auth_key_agrees_and_requires_known_identity() {
        let mut alice = X25519Provider::generate();
        let mut bob = X25519Provider::generate();
        alice.add_contact("bob", bob.public_key());
        bob.add_contact("alice", alice.public_key());

        let k1 = alice.auth_key("bob").unwrap();
        let k2 = bob.auth_key("alice").unwrap();
        assert_eq!(*k1, *k2);

        assert!(alice.auth_key("mallory").is_none());
    }
}

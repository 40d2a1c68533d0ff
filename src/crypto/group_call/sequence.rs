use crate::crypto::symmetric::NONCE_SIZE;

use super::types::{CallCookie, CALL_COOKIE_SIZE};

/// Monotonic nonce counter for one direction of one participant pair.
///
/// There is deliberately no way to decrement or reset: a (cookie, counter)
/// pair must be used for at most one encryption, ever.
#[derive(Debug, Default)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub fn new() -> Self {
        Self(0)
    }

    /// Returns the current value and advances the counter.
    pub fn next(&mut self) -> u64 {
        let value = self.0;
        self.0 += 1;
        value
    }

    /// The value [`next`](Self::next) would return, without committing it.
    /// Used on the decrypt path to build the nonce before the message is
    /// known to be authentic; the counter only advances once the box opens.
    pub fn peek(&self) -> u64 {
        self.0
    }
}

/// 24-byte box nonce: `cookie || little_endian(counter)`.
pub fn build_nonce(cookie: &CallCookie, counter: u64) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[..CALL_COOKIE_SIZE].copy_from_slice(cookie.as_bytes());
    nonce[CALL_COOKIE_SIZE..].copy_from_slice(&counter.to_le_bytes());
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_increasing_from_zero() {
        let mut seq = SequenceNumber::new();
        let values: Vec<u64> = (0..100).map(|_| seq.next()).collect();
        for (i, v) in values.iter().enumerate() {
            assert_eq!(*v, i as u64);
        }
    }

    #[test]
    fn peek_does_not_advance() {
        let mut seq = SequenceNumber::new();
        assert_eq!(seq.peek(), 0);
        assert_eq!(seq.peek(), 0);
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.peek(), 1);
    }

    #[test]
    fn nonce_layout() {
        let cookie = CallCookie::from_bytes(&[0xaa; CALL_COOKIE_SIZE]).unwrap();
        let nonce = build_nonce(&cookie, 0x0102_0304_0506_0708);
        assert_eq!(&nonce[..CALL_COOKIE_SIZE], &[0xaa; CALL_COOKIE_SIZE]);
        assert_eq!(
            &nonce[CALL_COOKIE_SIZE..],
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }
}

//! Time and randomness collaborator, injected so the connection state
//! machine can be driven deterministically in tests without a real clock
//! or socket.

use std::ops::Sub;
use std::time::Duration;

/// Everything the core state machine needs from the outside world besides
/// bytes on a socket. A production binary implements this with real
/// `Instant`s; tests implement it with a `Duration`-counter mock.
pub trait Environment {
    type Instant: Copy + Ord + Send + Sync + Sub<Self::Instant, Output = Duration>;

    fn now(&self) -> Self::Instant;

    /// Fills `buf` with random bytes, used for PSK-rotation nonces and
    /// session identifiers.
    fn random_bytes(&self, buf: &mut [u8]);

    fn random_u64(&self) -> u64 {
        let mut buf = [0u8; 8];
        self.random_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }
}

//! Production [`Environment`] using system time and OS-backed RNG.

use std::time::Instant;

use esphome_core::Environment;
use rand::RngCore;

#[derive(Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn random_bytes(&self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn time_advances() {
        let env = SystemEnv::new();
        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = env.now();
        assert!(t2 > t1);
    }

    #[test]
    fn random_bytes_fill_buffer() {
        let env = SystemEnv::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        env.random_bytes(&mut a);
        env.random_bytes(&mut b);
        assert_ne!(a, b);
    }
}

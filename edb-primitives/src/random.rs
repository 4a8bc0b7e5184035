//! Access to the process-wide CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;

/// Draw `n` cryptographically secure random bytes from the OS entropy
/// pool.
///
/// `OsRng` has no internal state to share across calls beyond the kernel's
/// own entropy pool, so this is safe to call concurrently from multiple
/// threads.
#[must_use]
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_has_requested_length() {
        assert_eq!(random_bytes(32).len(), 32);
        assert_eq!(random_bytes(0).len(), 0);
    }

    #[test]
    fn random_bytes_is_not_constant() {
        // Overwhelmingly unlikely to collide for 32 bytes of real entropy.
        assert_ne!(random_bytes(32), random_bytes(32));
    }
}

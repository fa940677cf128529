use ring::rand::{SecureRandom, SystemRandom};

use crate::errors::{DataservError, Result};

/// Cryptographically secure byte source for contract seeds
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes
    ///
    /// # Errors
    ///
    /// Returns `Generation` when the platform cannot supply entropy.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// Operating-system CSPRNG
#[derive(Debug, Clone)]
pub struct SystemEntropy {
    rng: SystemRandom,
}

impl SystemEntropy {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SystemEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .fill(dest)
            .map_err(|_| DataservError::Generation {
                reason: "system random source unavailable".to_string(),
            })
    }
}

impl<E: EntropySource + ?Sized> EntropySource for std::sync::Arc<E> {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_entropy_fills_distinct_buffers() {
        let entropy = SystemEntropy::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        entropy.fill(&mut a).unwrap();
        entropy.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}

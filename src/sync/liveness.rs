//! Cooperative liveness tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag marking whether the owning client is still alive.
///
/// In-flight requests are not interrupted on disposal; instead every
/// state application checks the token first and drops the result if the
/// client has been disposed. All clones observe the same revocation.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl LivenessToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the owner is still alive.
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Revoke the token. Idempotent.
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_live() {
        assert!(LivenessToken::new().is_live());
    }

    #[test]
    fn revoke_is_visible_to_clones() {
        let token = LivenessToken::new();
        let clone = token.clone();

        token.revoke();

        assert!(!token.is_live());
        assert!(!clone.is_live());
    }

    #[test]
    fn revoke_is_idempotent() {
        let token = LivenessToken::new();
        token.revoke();
        token.revoke();
        assert!(!token.is_live());
    }
}

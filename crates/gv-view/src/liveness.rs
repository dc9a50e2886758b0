//! Liveness token for soft cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag marking whether the owner of a computation is still active.
///
/// In-flight work cannot be aborted; instead every place that would publish
/// a result checks the token first.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl LivenessToken {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the owner as gone. Irreversible.
    pub fn cancel(&self) {
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
    fn test_cancel_is_seen_by_clones() {
        let token = LivenessToken::new();
        let clone = token.clone();
        assert!(clone.is_alive());
        token.cancel();
        assert!(!clone.is_alive());
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationToken(u64);

/// Hands out tokens; only the most recently issued one is current.
/// Issuing again or calling [`GenerationGuard::invalidate`] makes every
/// earlier token stale.
#[derive(Debug, Clone, Default)]
pub struct GenerationGuard {
    latest: Arc<AtomicU64>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> GenerationToken {
        GenerationToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// A finished request, tagged with the token it was issued under.
#[derive(Debug)]
pub struct Completed<T> {
    pub token: GenerationToken,
    pub result: T,
}

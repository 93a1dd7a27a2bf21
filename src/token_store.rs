//! In-memory access token slot shared by every clone of a client

use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe access token store
///
/// Holds at most one bearer token. The token is only ever replaced
/// wholesale, never mutated in place, and is never persisted.
#[derive(Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// Create an empty token store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token unconditionally
    pub fn set(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Current token, if any
    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Drop the stored token
    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is_present(&self) -> bool {
        self.token.read().is_some()
    }
}

// Tokens never show up in logs.
impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("present", &self.is_present())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_store() {
        let store = TokenStore::new();
        assert!(store.get().is_none());

        store.set(Some("access_token_123".to_string()));
        assert_eq!(store.get().as_deref(), Some("access_token_123"));
        assert!(store.is_present());

        // Replacement is unconditional
        store.set(Some("access_token_456".to_string()));
        assert_eq!(store.get().as_deref(), Some("access_token_456"));

        store.clear();
        assert!(!store.is_present());
    }

    #[test]
    fn test_token_store_clones_share_slot() {
        let store = TokenStore::new();
        let other = store.clone();

        other.set(Some("shared".to_string()));
        assert_eq!(store.get().as_deref(), Some("shared"));
    }

    #[test]
    fn test_token_store_debug_hides_token() {
        let store = TokenStore::new();
        store.set(Some("secret".to_string()));

        let rendered = format!("{store:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("present: true"));
    }
}

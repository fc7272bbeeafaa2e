//! In-memory bearer sessions. Only SHA-256 hashes of tokens are kept.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use sha2::{Digest, Sha256};

pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Expired entries are swept once the map grows past this.
const CLEANUP_THRESHOLD: usize = 1000;

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug)]
struct SessionEntry {
    owner_key: String,
    expires: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Start a session for `owner_key` and return its bearer token.
    pub fn issue(&mut self, owner_key: &str) -> String {
        if self.sessions.len() > CLEANUP_THRESHOLD {
            self.cleanup();
        }
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            SessionEntry {
                owner_key: owner_key.to_string(),
                expires: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Owner key for a live token. Expired tokens are dropped.
    pub fn resolve(&mut self, token: &str) -> Option<String> {
        let hash = hash_token(token);
        let entry = self.sessions.get(&hash)?;
        if Instant::now() >= entry.expires {
            self.sessions.remove(&hash);
            return None;
        }
        Some(entry.owner_key.clone())
    }

    /// End a session. Returns `false` if the token was unknown.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, entry| entry.expires > now);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_resolve() {
        let mut store = SessionStore::new();
        let token = store.issue("a@b.pl");
        assert_eq!(store.resolve(&token).as_deref(), Some("a@b.pl"));
        assert!(store.resolve("bogus").is_none());
    }

    #[test]
    fn revoke_ends_session() {
        let mut store = SessionStore::new();
        let token = store.issue("a@b.pl");
        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));
        assert!(store.resolve(&token).is_none());
    }

    #[test]
    fn expired_session_is_dropped() {
        let mut store = SessionStore::with_ttl(Duration::ZERO);
        let token = store.issue("a@b.pl");
        assert!(store.resolve(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn tokens_are_unique_and_stored_hashed() {
        let mut store = SessionStore::new();
        let t1 = store.issue("a@b.pl");
        let t2 = store.issue("a@b.pl");
        assert_ne!(t1, t2);
        assert_eq!(store.len(), 2);
        assert!(store.sessions.contains_key(&hash_token(&t1)));
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[test]
    fn generate_token_is_url_safe() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

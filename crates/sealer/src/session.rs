//! Session keys correlating all seal calls of one sealing operation

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// Opaque random token, created at the start of one `seal` call and
/// discarded at its end. Never persisted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({})", self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh session keys
///
/// Closures returning a [`SessionKey`] implement this, so tests can hand the
/// orchestrator deterministic keys.
pub trait SessionKeySource: Send + Sync {
    fn next_key(&self) -> SessionKey;
}

impl<F> SessionKeySource for F
where
    F: Fn() -> SessionKey + Send + Sync,
{
    fn next_key(&self) -> SessionKey {
        self()
    }
}

/// Random alphanumeric keys from the thread-local RNG
#[derive(Debug, Clone, Copy)]
pub struct RandomSessionKeys {
    len: usize,
}

impl RandomSessionKeys {
    /// Default key length in characters
    pub const DEFAULT_LEN: usize = 32;

    pub fn new(len: usize) -> Self {
        Self { len: len.max(1) }
    }
}

impl Default for RandomSessionKeys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEN)
    }
}

impl SessionKeySource for RandomSessionKeys {
    fn next_key(&self) -> SessionKey {
        let key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.len)
            .map(char::from)
            .collect();
        SessionKey(key)
    }
}

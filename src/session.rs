//! In-memory session store for portal authentication
//!
//! Tokens are opaque 32-byte random values, hex-encoded, mapped to an expiry
//! timestamp one hour out. Nothing is persisted: a restart logs everyone out.
//!
//! Expiry is enforced by `validate` itself; the periodic sweep only compacts
//! the map so abandoned sessions do not accumulate. An expired entry that the
//! sweep has not yet removed is treated exactly like a missing one.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// How long a session stays valid after login.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// How often the background sweep compacts expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

const TOKEN_BYTES: usize = 32;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to generate session token: {0}")]
    TokenGeneration(String),
}

/// Time source, injectable so expiry can be tested without real timers.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Token source, injectable so entropy failure can be tested.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Result<String, SessionError>;
}

/// Default token source: 32 bytes from the OS-seeded thread RNG, hex-encoded.
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn token(&self) -> Result<String, SessionError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng()
            .try_fill(&mut bytes)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))?;
        Ok(hex::encode(bytes))
    }
}

/// Concurrent token -> expiry registry.
///
/// Reads (`validate`) take a shared lock so authenticated requests do not
/// serialize against each other; `create`, `invalidate` and the sweep take
/// the lock exclusively.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SystemTime>>,
    clock: Box<dyn Clock>,
    tokens: Box<dyn TokenSource>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemClock), Box::new(RandomTokens))
    }

    pub fn with_parts(clock: Box<dyn Clock>, tokens: Box<dyn TokenSource>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
            tokens,
        }
    }

    /// Create a session, returning the token and its expiry time.
    ///
    /// Entropy failure is surfaced to the caller and fails only this login,
    /// not the process.
    pub async fn create(&self) -> Result<(String, SystemTime), SessionError> {
        let token = self.tokens.token()?;
        let expires = self.clock.now() + SESSION_TTL;
        self.sessions.write().await.insert(token.clone(), expires);
        Ok((token, expires))
    }

    /// True iff the token exists and has not expired.
    pub async fn validate(&self, token: &str) -> bool {
        let now = self.clock.now();
        self.sessions
            .read()
            .await
            .get(token)
            .map(|expires| now <= *expires)
            .unwrap_or(false)
    }

    /// Remove a session. Idempotent; absent tokens are not an error.
    pub async fn invalidate(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Remove every expired entry. One synchronous tick of the sweep.
    pub async fn sweep_expired(&self) {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expires| now <= *expires);
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Swept {} expired session(s)", removed);
        }
    }

    /// Start the background sweep, ticking every `interval` for the life of
    /// the process. Compaction only; `validate` never depends on it.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval fires immediately; skip the zeroth tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep_expired().await;
            }
        })
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

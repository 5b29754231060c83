use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use deadpool_redis::Pool;
use deadpool_redis::redis;

use crate::domain::repository::DispatchThrottle;
use crate::domain::types::DispatchKey;
use crate::error::PortalError;

fn dispatch_key(key: &DispatchKey) -> String {
    match key {
        DispatchKey::User(user_id) => format!("otp_dispatch:{}", user_id),
        DispatchKey::Email(email) => format!("otp_dispatch:email:{}", email),
    }
}

/// `SET <key> 1 NX EX <cooldown>`: sets the key only when it is not live.
fn claim_command(key: &DispatchKey, cooldown_secs: u64) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(dispatch_key(key))
        .arg(1)
        .arg("NX")
        .arg("EX")
        .arg(cooldown_secs);
    cmd
}

/// Cooldown shared by every portal replica.
#[derive(Clone)]
pub struct RedisDispatchThrottle {
    pub pool: Pool,
    pub cooldown_secs: u64,
}

impl DispatchThrottle for RedisDispatchThrottle {
    async fn try_acquire(&self, key: &DispatchKey) -> Result<bool, PortalError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| PortalError::Internal(e.into()))?;
        // SET NX answers nil when the key is still live.
        let claimed: Option<String> = claim_command(key, self.cooldown_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| PortalError::Internal(e.into()))?;
        Ok(claimed.is_some())
    }
}

/// Process-local cooldown, used when no Redis is configured.
#[derive(Clone)]
pub struct MemoryDispatchThrottle {
    cooldown: Duration,
    last_dispatch: Arc<Mutex<HashMap<DispatchKey, Instant>>>,
}

impl MemoryDispatchThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_dispatch: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn claim(&self, key: &DispatchKey, now: Instant) -> Result<bool, PortalError> {
        let mut last = self
            .last_dispatch
            .lock()
            .map_err(|_| PortalError::Internal(anyhow::anyhow!("dispatch throttle lock poisoned")))?;
        last.retain(|_, at| now.duration_since(*at) < self.cooldown);
        if last.contains_key(key) {
            return Ok(false);
        }
        last.insert(key.clone(), now);
        Ok(true)
    }
}

impl DispatchThrottle for MemoryDispatchThrottle {
    async fn try_acquire(&self, key: &DispatchKey) -> Result<bool, PortalError> {
        self.claim(key, Instant::now())
    }
}

/// Throttle backend picked at startup.
#[derive(Clone)]
pub enum AnyDispatchThrottle {
    Redis(RedisDispatchThrottle),
    Memory(MemoryDispatchThrottle),
}

impl DispatchThrottle for AnyDispatchThrottle {
    async fn try_acquire(&self, key: &DispatchKey) -> Result<bool, PortalError> {
        match self {
            Self::Redis(throttle) => throttle.try_acquire(key).await,
            Self::Memory(throttle) => throttle.try_acquire(key).await,
        }
    }
}

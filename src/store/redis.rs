use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{ListKey, ListStore};
use crate::error::StoreResult;

const KEY_PREFIX: &str = "cinefile";

/// Creates a Redis client for list storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed list store
///
/// Lists are plain string values with no TTL. The connection manager reconnects on its own
/// after the server drops the connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn new(client: Client) -> StoreResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis list store");
        Ok(Self { conn })
    }

    fn redis_key(key: ListKey) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[async_trait::async_trait]
impl ListStore for RedisStore {
    async fn get(&self, key: ListKey) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(Self::redis_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: ListKey, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(Self::redis_key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: ListKey) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::redis_key(key)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

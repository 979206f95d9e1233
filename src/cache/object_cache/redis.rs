use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

// SCAN 每批返回的键数量
const SCAN_BATCH: usize = 200;

/// Redis 缓存后端。所有键带统一前缀，多个实例可以共用一个 Redis。
pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL {}: {e}", redis_config.url))?;

        // 启动时确认服务可达，不可达时由启动流程回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis unreachable at {}: {e}", redis_config.url))?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "Redis replied {} (prefix '{}', default TTL {}s)",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn effective_ttl(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.prefixed(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to read cache key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = self.effective_ttl(ttl);
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.prefixed(&key), value, ttl)
            .await
        {
            error!("Failed to write cache key '{}': {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<_, i64>(self.prefixed(key)).await {
            error!("Failed to remove cache key '{}': {}", key, e);
        }
    }

    /// 删除本前缀下的全部键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed: i64 = 0;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to scan cache keys: {}", e);
                    return;
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, i64>(keys).await {
                    Ok(count) => removed += count,
                    Err(e) => error!("Failed to remove cache keys: {}", e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        info!("Invalidated {} Redis cache key(s) under '{}'", removed, pattern);
    }
}

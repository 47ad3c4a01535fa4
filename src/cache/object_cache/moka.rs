use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        if config.cache.memory.max_capacity == 0 {
            return Err("cache.memory.max_capacity 必须大于 0".to_string());
        }
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // Moka 使用创建时设置的全局 TTL，这里的 ttl 参数会被忽略
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_roundtrip_and_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("analytics:1:summary".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("analytics:1:summary").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("analytics:1:summary").await;
        assert_eq!(
            cache.get_raw("analytics:1:summary").await,
            CacheResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_json_helpers_discard_bad_entries() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));
        cache
            .insert_json("analytics:1:ids".to_string(), &vec![1_i64, 2, 3], 0)
            .await;
        assert_eq!(
            cache.get_json::<Vec<i64>>("analytics:1:ids").await,
            Some(vec![1, 2, 3])
        );

        cache
            .insert_raw("analytics:1:bad".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(cache.get_json::<Vec<i64>>("analytics:1:bad").await, None);
        assert_eq!(cache.get_raw("analytics:1:bad").await, CacheResult::NotFound);
    }
}

use async_trait::async_trait;

/// 缓存查询结果
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

/// 对象缓存抽象
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

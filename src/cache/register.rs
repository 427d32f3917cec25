//! 缓存后端注册表
//!
//! 后端模块通过 `declare_object_cache_plugin!` 在进程加载阶段把自己的
//! 构造器登记进来，启动流程按配置名取用。构造器是异步的，便于需要
//! 建立连接的后端实现。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

pub type BoxedCacheFuture = Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type CacheBackendConstructor = Arc<dyn Fn() -> BoxedCacheFuture + Send + Sync>;

static CACHE_BACKENDS: Lazy<RwLock<HashMap<String, CacheBackendConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 登记一个缓存后端构造器，后注册的同名后端覆盖先注册的
pub fn register_cache_backend<S: Into<String>>(name: S, constructor: CacheBackendConstructor) {
    CACHE_BACKENDS
        .write()
        .expect("cache backend table lock poisoned")
        .insert(name.into(), constructor);
}

/// 按名称取缓存后端构造器
pub fn lookup_cache_backend(name: &str) -> Option<CacheBackendConstructor> {
    CACHE_BACKENDS
        .read()
        .expect("cache backend table lock poisoned")
        .get(name)
        .cloned()
}

/// 打印当前已注册的后端（仅调试用）
pub fn log_registered_backends() {
    let table = CACHE_BACKENDS
        .read()
        .expect("cache backend table lock poisoned");
    tracing::debug!("{} cache backend(s) registered", table.len());
    for name in table.keys() {
        tracing::debug!(" - {}", name);
    }
}

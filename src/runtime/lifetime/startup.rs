use crate::cache::{ObjectCache, register::lookup_cache_backend};
use crate::config::AppConfig;
use crate::storage::Storage;
use crate::utils::link_token::LinkTokenCodec;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub codec: Arc<LinkTokenCodec>,
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(constructor) = lookup_cache_backend(cache_type) {
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
            }
        }
    } else {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    // 配置的缓存不可用时回退到默认内存缓存
    if cache_type != "moka"
        && let Some(fallback_constructor) = lookup_cache_backend("moka")
    {
        match fallback_constructor().await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka (in-memory) cache backend");
                return Ok(Arc::from(cache));
            }
            Err(fallback_e) => {
                warn!("Failed to create fallback Moka cache: {}", fallback_e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存与链接密钥等
pub async fn prepare_server_startup() -> StartupContext {
    if cfg!(debug_assertions) {
        crate::cache::register::log_registered_backends();
        debug!("Debug mode: Cache registry is enabled");
    }

    // 密钥配置错误必须在监听端口前暴露
    let codec = Arc::new(
        LinkTokenCodec::from_config().expect("Link token keys are missing or malformed"),
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext {
        storage,
        cache,
        codec,
    }
}

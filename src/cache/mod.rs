//! 缓存层
//!
//! 通过 `declare_object_cache_plugin!` 在程序加载时注册缓存后端，
//! 启动阶段按配置挑选。当前内置 moka 内存后端。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 注册缓存后端插件
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        fn __register_cache_backend() {
            $crate::cache::register::register_cache_backend(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::TalkLearnError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    }) as $crate::cache::register::BoxedCacheFuture
                }),
            );
        }
    };
}

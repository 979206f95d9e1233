//! 缓存后端注册表：按名称登记构造函数，启动时根据配置选用

use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static BACKENDS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    BACKENDS
        .write()
        .expect("Cache registry lock poisoned")
        .insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    BACKENDS
        .read()
        .expect("Cache registry lock poisoned")
        .get(name)
        .cloned()
}

/// 已登记的后端名称（有序）
pub fn registered_backends() -> Vec<String> {
    BACKENDS
        .read()
        .expect("Cache registry lock poisoned")
        .keys()
        .cloned()
        .collect()
}

/// 登记内置后端，可重复调用
pub fn register_builtin_plugins() {
    super::object_cache::moka::register();
    super::object_cache::redis::register();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        register_builtin_plugins();
        let names = registered_backends();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}

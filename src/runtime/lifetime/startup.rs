use crate::cache::{ObjectCache, register};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolDeskError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

// 回退使用的内存缓存
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = register::get_object_cache_plugin(name)
        .ok_or_else(|| SchoolDeskError::cache_plugin_not_found(name))?;
    Ok(Arc::from(constructor().await?))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to memory cache");
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 清理已过期的会话记录
async fn purge_sessions(storage: &Arc<dyn Storage>) {
    match storage.purge_expired_sessions().await {
        Ok(0) => debug!("No expired sessions to purge"),
        Ok(count) => info!("Purged {} expired session(s)", count),
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }
}

/// 用户表为空时创建默认管理员账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No users found in database, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(pwd) if !pwd.trim().is_empty() => pwd,
        _ => {
            let pwd = generate_random_password(16);
            warn!("==========================================================");
            warn!("  ADMIN_PASSWORD not set, using a generated password");
            warn!("  Generated admin password: {}", pwd);
            warn!("  It will not be shown again");
            warn!("==========================================================");
            pwd
        }
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文：存储、会话清理、管理员账号和缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    register::register_builtin_plugins();
    debug!("Cache backends available: {:?}", register::registered_backends());

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    purge_sessions(&storage).await;
    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_length_and_charset() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert!(pwd.chars().all(|c| c.is_ascii_graphic()));
        assert!(!pwd.contains('0') && !pwd.contains('O'));
    }
}

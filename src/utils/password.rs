use crate::config::{AppConfig, Argon2Config};
use crate::errors::SchoolDeskError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

// 用户不存在时用于比对的哈希，让两种失败路径耗时一致
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    hash_password("schooldesk-dummy-password-for-timing").unwrap_or_default()
});

/// 哈希密码（使用配置中的 Argon2 参数）
pub fn hash_password(password: &str) -> Result<String, SchoolDeskError> {
    hash_password_with(password, &AppConfig::get().argon2)
}

/// 使用指定参数哈希密码
pub fn hash_password_with(password: &str, config: &Argon2Config) -> Result<String, SchoolDeskError> {
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| SchoolDeskError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolDeskError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，哈希格式错误时返回 false
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 登录校验：用户不存在时仍对假哈希做一次验证
pub fn verify_login_password(password: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = verify_password(password, &DUMMY_HASH);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试用的低成本参数
    fn cheap() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("Sup3rSecret", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Sup3rSecret", &hash));
        assert!(!verify_password("sup3rsecret", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password_with("Sup3rSecret", &cheap()).unwrap();
        let b = hash_password_with("Sup3rSecret", &cheap()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_login_password_with_known_hash() {
        let hash = hash_password_with("Sup3rSecret", &cheap()).unwrap();
        assert!(verify_login_password("Sup3rSecret", Some(&hash)));
        assert!(!verify_login_password("wrong", Some(&hash)));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let config = Argon2Config {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 1,
        };
        assert!(hash_password_with("whatever", &config).is_err());
    }
}

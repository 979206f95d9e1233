use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").expect("Invalid phone regex"));

// 学号、工号、科目代码
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/_-]{0,31}$").expect("Invalid code regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_code(code: &str) -> Result<(), &'static str> {
    if !CODE_RE.is_match(code) {
        return Err("Code must be 1-32 letters, digits, '/', '_' or '-'");
    }
    Ok(())
}

/// 姓名、标题等必填文本：去掉首尾空白后 1..=max_len 个字符
pub fn validate_required_text(value: &str, max_len: usize) -> Result<(), &'static str> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err("Value must not be empty");
    }
    if len > max_len {
        return Err("Value is too long");
    }
    Ok(())
}

pub fn validate_term(term: &str) -> Result<(), &'static str> {
    validate_required_text(term, 32).map_err(|_| "Term must be 1-32 characters")
}

/// 分数必须在 0 到满分之间
pub fn validate_score(score: f64, max_score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || score < 0.0 || score > max_score {
        return Err("Score must be between 0 and the exam's max score");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_email("head@school.edu").is_ok());
        assert!(validate_email("head@school").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+254 712 345678").is_ok());
        assert!(validate_phone("0712-345-678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_code() {
        assert!(validate_code("ADM-2025/001").is_ok());
        assert!(validate_code("MATH").is_ok());
        assert!(validate_code("-LEADING").is_err());
        assert!(validate_code("has space").is_err());
        assert!(validate_code(&"X".repeat(33)).is_err());
    }

    #[test]
    fn test_required_text_and_term() {
        assert!(validate_required_text("  Grace  ", 64).is_ok());
        assert!(validate_required_text("   ", 64).is_err());
        assert!(validate_required_text("abcdef", 5).is_err());
        assert!(validate_term("2025-T1").is_ok());
        assert!(validate_term("").is_err());
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(100.5, 100.0).is_err());
        assert!(validate_score(-1.0, 100.0).is_err());
        assert!(validate_score(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}

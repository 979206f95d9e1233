//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 存储层和工具函数返回 `SchoolDeskError`，服务层再映射为 `ApiResponse`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schooldesk_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolDeskError {
            $($variant(String),)*
        }

        impl SchoolDeskError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolDeskError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolDeskError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolDeskError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolDeskError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolDeskError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schooldesk_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    Conflict("E012", "Resource Conflict"),
    Export("E013", "Export Error"),
}

impl SchoolDeskError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolDeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolDeskError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolDeskError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolDeskError::DatabaseOperation(err.to_string())
    }
}

impl From<csv::Error> for SchoolDeskError {
    fn from(err: csv::Error) -> Self {
        SchoolDeskError::Export(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for SchoolDeskError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        SchoolDeskError::Authentication(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolDeskError {
    fn from(err: serde_json::Error) -> Self {
        SchoolDeskError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolDeskError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolDeskError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolDeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolDeskError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolDeskError::database_config("test").code(), "E003");
        assert_eq!(SchoolDeskError::validation("test").code(), "E006");
        assert_eq!(SchoolDeskError::authentication("test").code(), "E010");
        assert_eq!(SchoolDeskError::conflict("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolDeskError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SchoolDeskError::not_found("test").error_type(),
            "Resource Not Found"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolDeskError::validation("Score exceeds max score");
        assert_eq!(err.message(), "Score exceeds max score");
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolDeskError::conflict("Admission number already exists");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Conflict"));
        assert!(formatted.contains("Admission number already exists"));
    }

    #[test]
    fn test_from_date_parse_error() {
        let parse_err = chrono::NaiveDate::parse_from_str("2025-13-40", "%Y-%m-%d").unwrap_err();
        let err: SchoolDeskError = parse_err.into();
        assert_eq!(err.code(), "E009");
    }
}

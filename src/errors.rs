//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_talklearn_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TalkLearnError {
            $($variant(String),)*
        }

        impl TalkLearnError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TalkLearnError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TalkLearnError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TalkLearnError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TalkLearnError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TalkLearnError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_talklearn_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    KeyConfig("E006", "Key Configuration Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    TokenCrypto("E010", "Token Crypto Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl TalkLearnError {
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

impl fmt::Display for TalkLearnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TalkLearnError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TalkLearnError {
    fn from(err: sea_orm::DbErr) -> Self {
        TalkLearnError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TalkLearnError {
    fn from(err: std::io::Error) -> Self {
        TalkLearnError::DatabaseConnection(err.to_string())
    }
}

impl From<serde_json::Error> for TalkLearnError {
    fn from(err: serde_json::Error) -> Self {
        TalkLearnError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TalkLearnError {
    fn from(err: chrono::ParseError) -> Self {
        TalkLearnError::DateParse(err.to_string())
    }
}

impl From<base64::DecodeError> for TalkLearnError {
    fn from(err: base64::DecodeError) -> Self {
        TalkLearnError::TokenCrypto(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TalkLearnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TalkLearnError::cache_connection("test").code(), "E001");
        assert_eq!(TalkLearnError::database_config("test").code(), "E003");
        assert_eq!(TalkLearnError::validation("test").code(), "E007");
        assert_eq!(TalkLearnError::token_crypto("test").code(), "E010");
        assert_eq!(TalkLearnError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TalkLearnError::token_crypto("test").error_type(),
            "Token Crypto Error"
        );
        assert_eq!(
            TalkLearnError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = TalkLearnError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = TalkLearnError::key_config("Bad key length");
        let formatted = err.format_simple();
        assert!(formatted.contains("Key Configuration Error"));
        assert!(formatted.contains("Bad key length"));
    }
}

//! 统一错误处理模块
//!
//! 定义系统中所有共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// PostgreSQL 唯一约束冲突的 SQLSTATE 码
const PG_UNIQUE_VIOLATION: &str = "23505";

/// 系统错误类型
#[derive(Debug, Error)]
pub enum ScoreboardError {
    // ==================== 数据库错误 ====================
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("记录已存在: {entity} {field}={value}")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== 验证错误 ====================
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, ScoreboardError>;

impl ScoreboardError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为可重试错误
    ///
    /// 业务类错误（未找到、已存在、验证失败）重试没有意义，
    /// 只有底层数据库错误值得上层重试。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 判断底层数据库错误是否为唯一约束冲突
    ///
    /// 仓储层用它把 INSERT 冲突翻译成 `AlreadyExists`，
    /// 而不是把原始的 SQLSTATE 泄漏给调用方。
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| code == PG_UNIQUE_VIOLATION)
                .unwrap_or(false),
            _ => false,
        }
    }
}

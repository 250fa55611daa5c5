//! 竞赛服务错误类型
//!
//! 定义服务层的业务错误和系统错误。
//! 注意：重复授予徽章不在此列，它由引擎的 `AwardOutcome::AlreadyExists`
//! 内部消化，既不是错误也不会浮出服务层。

use thiserror::Error;

/// 竞赛服务错误类型
#[derive(Debug, Error)]
pub enum CompetitionError {
    // === 队伍相关错误 ===
    #[error("队伍不存在: {0}")]
    TeamNotFound(i64),

    #[error("队伍名称已被占用: {0}")]
    TeamNameTaken(String),

    #[error("该成员已是其他队伍的队长: leader_id={0}")]
    LeaderAlreadyAssigned(i64),

    // === 得分相关错误 ===
    #[error("得分记录不存在: {0}")]
    ScoreNotFound(i64),

    #[error("得分不能为负数: {0}")]
    NegativePoints(i32),

    // === 徽章相关错误 ===
    #[error("徽章不存在: {0}")]
    BadgeNotFound(i64),

    #[error("徽章名称已被占用: {0}")]
    BadgeNameTaken(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),

    #[error("参数校验失败: {0}")]
    Validation(String),
}

/// 竞赛服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CompetitionError>;

impl CompetitionError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TeamNotFound(_) => "TEAM_NOT_FOUND",
            Self::TeamNameTaken(_) => "TEAM_NAME_TAKEN",
            Self::LeaderAlreadyAssigned(_) => "LEADER_ALREADY_ASSIGNED",
            Self::ScoreNotFound(_) => "SCORE_NOT_FOUND",
            Self::NegativePoints(_) => "NEGATIVE_POINTS",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::BadgeNameTaken(_) => "BADGE_NAME_TAKEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(CompetitionError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!CompetitionError::TeamNotFound(1).is_retryable());
        assert!(!CompetitionError::NegativePoints(-5).is_retryable());
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(CompetitionError::NegativePoints(-1).is_business_error());
        assert!(CompetitionError::TeamNameTaken("Alpha".to_string()).is_business_error());
        assert!(!CompetitionError::Internal("panic".to_string()).is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            CompetitionError::TeamNotFound(1).error_code(),
            "TEAM_NOT_FOUND"
        );
        assert_eq!(
            CompetitionError::NegativePoints(-5).error_code(),
            "NEGATIVE_POINTS"
        );
    }

    #[test]
    fn test_error_display() {
        let err = CompetitionError::TeamNameTaken("Alpha".to_string());
        assert!(err.to_string().contains("Alpha"));
    }
}

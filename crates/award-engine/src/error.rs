//! 引擎错误类型

use thiserror::Error;

/// 徽章评估过程中的错误
///
/// 注意：重复授予（同一队伍同一徽章）不是错误，
/// 由 `AwardOutcome::AlreadyExists` 表达并在评估器内部消化。
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("积分聚合读取失败: {0}")]
    Aggregation(String),

    #[error("徽章目录读取失败: {0}")]
    Catalog(String),

    #[error("授予台账访问失败: {0}")]
    Ledger(String),

    #[error("审计事件发送失败: {0}")]
    Audit(String),

    #[error("队伍未找到: team_id={0}")]
    TeamNotFound(i64),
}

pub type Result<T> = std::result::Result<T, EvalError>;

//! 活动日志实体定义
//!
//! 审计用的只追加记录：得分变动、队伍变更、徽章授予都会留痕。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 活动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum LogAction {
    /// 队伍创建
    TeamCreated,
    /// 队伍修改
    TeamUpdated,
    /// 队伍删除
    TeamDeleted,
    /// 得分录入
    ScoreAdded,
    /// 得分删除
    ScoreDeleted,
    /// 徽章授予（仅由评估器写入）
    BadgeEarned,
}

/// 活动日志记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub action: LogAction,
    /// 关联队伍，队伍删除后置空（日志本身保留）
    #[sqlx(default)]
    pub team_id: Option<i64>,
    /// 操作人，系统自动操作（如徽章授予）时为空
    #[sqlx(default)]
    pub user_id: Option<i64>,
    pub description: String,
    /// 附加数据（如 {"badge_id": 1, "badge_name": "..."}）
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// 写入活动日志的输入
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub action: LogAction,
    pub team_id: Option<i64>,
    pub user_id: Option<i64>,
    pub description: String,
    pub metadata: Value,
}

impl NewActivityLog {
    /// 构建徽章授予日志
    pub fn badge_earned(team_id: i64, badge_id: i64, badge_name: &str, description: &str) -> Self {
        Self {
            action: LogAction::BadgeEarned,
            team_id: Some(team_id),
            user_id: None,
            description: description.to_string(),
            metadata: serde_json::json!({
                "badge_id": badge_id,
                "badge_name": badge_name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_action_serde() {
        let json = serde_json::to_string(&LogAction::BadgeEarned).unwrap();
        assert_eq!(json, "\"badge_earned\"");
    }

    #[test]
    fn test_badge_earned_builder() {
        let log = NewActivityLog::badge_earned(1, 2, "百分俱乐部", "队伍 1 获得徽章 百分俱乐部");
        assert_eq!(log.action, LogAction::BadgeEarned);
        assert_eq!(log.metadata["badge_id"], 2);
        assert!(log.user_id.is_none());
    }
}

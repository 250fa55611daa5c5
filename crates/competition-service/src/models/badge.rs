//! 徽章实体定义

use award_engine::{BadgeCondition, BadgeDef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 徽章定义
///
/// `condition_type` + `condition_value` 在存储层保持原始形态
/// （字符串 + JSON），评估前通过 [`Badge::condition`] 解析为
/// 封闭的条件枚举。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: i64,
    /// 徽章名称，全局唯一
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 展示图标（emoji 或图标名）
    pub icon: String,
    /// 条件类型：score_threshold / score_count / rank，
    /// 未识别的类型评估时恒为不满足
    pub condition_type: String,
    /// 条件参数（如 {"threshold": 100}），缺省键视为 0
    pub condition_value: Value,
    pub created_at: DateTime<Utc>,
}

impl Badge {
    /// 解析授予条件
    pub fn condition(&self) -> BadgeCondition {
        BadgeCondition::parse(&self.condition_type, &self.condition_value)
    }

    /// 转换为引擎视角的徽章定义
    pub fn to_def(&self) -> BadgeDef {
        BadgeDef {
            id: self.id,
            name: self.name.clone(),
            condition: self.condition(),
        }
    }
}

/// 创建徽章的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBadge {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub condition_type: String,
    pub condition_value: Value,
}

fn default_icon() -> String {
    "🏅".to_string()
}

/// 徽章授予记录
///
/// (team_id, badge_id) 唯一，授予后永不自动撤销。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamBadge {
    pub id: i64,
    pub team_id: i64,
    pub badge_id: i64,
    pub earned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn badge(condition_type: &str, condition_value: Value) -> Badge {
        Badge {
            id: 1,
            name: "测试徽章".to_string(),
            description: None,
            icon: "🏅".to_string(),
            condition_type: condition_type.to_string(),
            condition_value,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_condition_parsing() {
        let b = badge("score_threshold", json!({"threshold": 100}));
        assert_eq!(
            b.condition(),
            BadgeCondition::ScoreThreshold { threshold: 100 }
        );
    }

    #[test]
    fn test_unknown_condition_type_is_preserved() {
        let b = badge("challenge_completed", json!({}));
        assert_eq!(b.condition(), BadgeCondition::Unknown);
    }

    #[test]
    fn test_to_def() {
        let b = badge("rank", json!({"rank": 3}));
        let def = b.to_def();
        assert_eq!(def.id, 1);
        assert_eq!(def.condition, BadgeCondition::Rank { rank: 3 });
    }
}

//! 队伍实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 队伍
///
/// 得分与徽章授予的归属主体。删除队伍时级联删除其全部
/// 得分和授予记录（由外键约束保证）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    /// 展示名称，全局唯一
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 队长用户 ID，最多带一支队伍（唯一约束）
    #[sqlx(default)]
    pub leader_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建队伍的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub leader_id: Option<i64>,
}

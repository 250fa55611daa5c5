//! 得分实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条得分记录
///
/// 创建后不可修改，只能显式删除（删除 + 重建即是"编辑"）。
/// `points` 非负，由服务层校验并由 CHECK 约束兜底。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: i64,
    pub team_id: i64,
    pub points: i32,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 录入人（leader 或 admin），用户被删除后置空
    #[sqlx(default)]
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// 创建得分的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub team_id: i64,
    pub points: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

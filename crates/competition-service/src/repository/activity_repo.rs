//! 活动日志仓储
//!
//! 审计留痕的只追加写入与查询，同时充当引擎的审计通知器：
//! 每次徽章授予在这里落一条 badge_earned 日志。

use async_trait::async_trait;
use award_engine::{AuditNotifier, EvalError};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{ActivityLog, NewActivityLog};

/// 活动日志仓储
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 写入一条活动日志
    pub async fn log(&self, entry: &NewActivityLog) -> Result<ActivityLog> {
        let created = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (action, team_id, user_id, description, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, action, team_id, user_id, description, metadata, created_at
            "#,
        )
        .bind(entry.action)
        .bind(entry.team_id)
        .bind(entry.user_id)
        .bind(&entry.description)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// 最近的活动日志（按时间倒序）
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, action, team_id, user_id, description, metadata, created_at
            FROM activity_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// 某队伍的活动日志
    pub async fn list_for_team(&self, team_id: i64, limit: i64) -> Result<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, action, team_id, user_id, description, metadata, created_at
            FROM activity_logs
            WHERE team_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(team_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}

/// 引擎侧的审计通知器实现
///
/// 写入失败映射为审计错误；评估器对它只记警告，
/// 不影响已经落库的授予。
#[async_trait]
impl AuditNotifier for ActivityLogRepository {
    async fn badge_earned(
        &self,
        team_id: i64,
        badge_id: i64,
        badge_name: &str,
        description: &str,
    ) -> award_engine::Result<()> {
        let entry = NewActivityLog::badge_earned(team_id, badge_id, badge_name, description);
        self.log(&entry)
            .await
            .map(|_| ())
            .map_err(|e| EvalError::Audit(e.to_string()))
    }
}

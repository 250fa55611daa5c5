//! 徽章授予台账仓储
//!
//! (team, badge) 的幂等集合。原子性由数据库唯一约束保证：
//! `INSERT ... ON CONFLICT DO NOTHING` 让并发的两次授予
//! 恰有一次真正写入，另一次通过 rows_affected == 0 观察到
//! `AlreadyExists`，而不是先查后写的两段式检查。

use async_trait::async_trait;
use award_engine::{AwardLedger, AwardOutcome, EvalError};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::TeamBadge;

/// 授予台账仓储
pub struct AwardRepository {
    pool: PgPool,
}

impl AwardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 查询队伍是否已持有徽章
    pub async fn exists(&self, team_id: i64, badge_id: i64) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT 1::BIGINT
            FROM team_badges
            WHERE team_id = $1 AND badge_id = $2
            "#,
        )
        .bind(team_id)
        .bind(badge_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// 原子地记录一次授予
    ///
    /// 唯一约束冲突不是错误：返回 `AlreadyExists` 由调用方
    /// 抑制重复的审计事件。
    pub async fn insert_award(
        &self,
        team_id: i64,
        badge_id: i64,
        when: DateTime<Utc>,
    ) -> Result<AwardOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_badges (team_id, badge_id, earned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, badge_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(badge_id)
        .bind(when)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            Ok(AwardOutcome::Recorded)
        } else {
            Ok(AwardOutcome::AlreadyExists)
        }
    }

    /// 列出队伍持有的授予记录（按获得时间倒序）
    pub async fn list_team_awards(&self, team_id: i64) -> Result<Vec<TeamBadge>> {
        let awards = sqlx::query_as::<_, TeamBadge>(
            r#"
            SELECT id, team_id, badge_id, earned_at
            FROM team_badges
            WHERE team_id = $1
            ORDER BY earned_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(awards)
    }
}

/// 引擎侧的授予台账实现
#[async_trait]
impl AwardLedger for AwardRepository {
    async fn has_award(&self, team_id: i64, badge_id: i64) -> award_engine::Result<bool> {
        self.exists(team_id, badge_id)
            .await
            .map_err(|e| EvalError::Ledger(e.to_string()))
    }

    async fn record_award(
        &self,
        team_id: i64,
        badge_id: i64,
        when: DateTime<Utc>,
    ) -> award_engine::Result<AwardOutcome> {
        self.insert_award(team_id, badge_id, when)
            .await
            .map_err(|e| EvalError::Ledger(e.to_string()))
    }
}

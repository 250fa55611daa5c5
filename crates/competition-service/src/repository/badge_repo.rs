//! 徽章仓储

use async_trait::async_trait;
use award_engine::{BadgeCatalog, BadgeDef, EvalError};
use scoreboard_shared::error::ScoreboardError;
use sqlx::PgPool;

use crate::error::{CompetitionError, Result};
use crate::models::{Badge, NewBadge};

/// 徽章名称唯一约束
const UNIQ_BADGE_NAME: &str = "badges_name_key";

/// 徽章仓储
pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建徽章定义
    pub async fn create_badge(&self, badge: &NewBadge) -> Result<Badge> {
        let created = sqlx::query_as::<_, Badge>(
            r#"
            INSERT INTO badges (name, description, icon, condition_type, condition_value)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, icon, condition_type, condition_value, created_at
            "#,
        )
        .bind(&badge.name)
        .bind(&badge.description)
        .bind(&badge.icon)
        .bind(&badge.condition_type)
        .bind(&badge.condition_value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &badge.name))?;

        Ok(created)
    }

    /// 根据 ID 获取徽章
    pub async fn get_badge(&self, id: i64) -> Result<Option<Badge>> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, description, icon, condition_type, condition_value, created_at
            FROM badges
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }

    /// 列出全部徽章定义
    pub async fn list_all_badges(&self) -> Result<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, description, icon, condition_type, condition_value, created_at
            FROM badges
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    /// 删除徽章（级联删除其授予记录）
    pub async fn delete_badge(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM badges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CompetitionError::BadgeNotFound(id));
        }

        Ok(())
    }

    fn map_unique_violation(err: sqlx::Error, name: &str) -> CompetitionError {
        if ScoreboardError::is_unique_violation(&err) {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.constraint() == Some(UNIQ_BADGE_NAME) {
                    return CompetitionError::BadgeNameTaken(name.to_string());
                }
            }
        }
        CompetitionError::Database(err)
    }
}

/// 引擎侧的徽章目录实现
#[async_trait]
impl BadgeCatalog for BadgeRepository {
    async fn list_badges(&self) -> award_engine::Result<Vec<BadgeDef>> {
        let badges = self
            .list_all_badges()
            .await
            .map_err(|e| EvalError::Catalog(e.to_string()))?;

        Ok(badges.iter().map(Badge::to_def).collect())
    }
}

//! 得分仓储
//!
//! 得分记录的写入/删除，以及授予引擎消费的聚合读取。
//! 聚合语义与领域不变量一致：无得分的队伍总分为 0、计数为 0，
//! 且出现在全量快照中（LEFT JOIN）。

use async_trait::async_trait;
use award_engine::{EvalError, ScoreAggregateSource, TeamStanding};
use sqlx::PgPool;

use crate::error::{CompetitionError, Result};
use crate::models::{NewScore, Score};

/// 得分仓储
pub struct ScoreRepository {
    pool: PgPool,
}

impl ScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 写入操作 ====================

    /// 写入一条得分
    ///
    /// 非负校验由服务层完成，数据库 CHECK 约束兜底。
    pub async fn create_score(&self, score: &NewScore) -> Result<Score> {
        let created = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (team_id, points, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, points, description, created_by, created_at
            "#,
        )
        .bind(score.team_id)
        .bind(score.points)
        .bind(&score.description)
        .bind(score.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// 删除一条得分，返回被删除的记录
    pub async fn delete_score(&self, id: i64) -> Result<Score> {
        let deleted = sqlx::query_as::<_, Score>(
            r#"
            DELETE FROM scores
            WHERE id = $1
            RETURNING id, team_id, points, description, created_by, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        deleted.ok_or(CompetitionError::ScoreNotFound(id))
    }

    // ==================== 查询操作 ====================

    /// 列出队伍的得分（按创建时间倒序）
    pub async fn list_team_scores(&self, team_id: i64) -> Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT id, team_id, points, description, created_by, created_at
            FROM scores
            WHERE team_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    /// 队伍累计总分（无得分时为 0）
    pub async fn team_total_score(&self, team_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(points), 0)::BIGINT
            FROM scores
            WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// 队伍得分条目数
    pub async fn team_score_count(&self, team_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM scores
            WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// 全部队伍的总分快照
    ///
    /// LEFT JOIN 保证没有任何得分的队伍也在快照内（总分 0）。
    pub async fn all_team_totals(&self) -> Result<Vec<TeamStanding>> {
        let standings = sqlx::query_as::<_, StandingRow>(
            r#"
            SELECT t.id AS team_id, t.name, COALESCE(SUM(s.points), 0)::BIGINT AS total_score
            FROM teams t
            LEFT JOIN scores s ON s.team_id = t.id
            GROUP BY t.id, t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(standings.into_iter().map(StandingRow::into_standing).collect())
    }
}

/// 快照查询行
#[derive(sqlx::FromRow)]
struct StandingRow {
    team_id: i64,
    name: String,
    total_score: i64,
}

impl StandingRow {
    fn into_standing(self) -> TeamStanding {
        TeamStanding {
            team_id: self.team_id,
            name: self.name,
            total_score: self.total_score,
        }
    }
}

/// 引擎侧的聚合数据源实现
///
/// 数据库错误一律映射为聚合失败，令整次评估中止。
#[async_trait]
impl ScoreAggregateSource for ScoreRepository {
    async fn total_score(&self, team_id: i64) -> award_engine::Result<i64> {
        self.team_total_score(team_id)
            .await
            .map_err(|e| EvalError::Aggregation(e.to_string()))
    }

    async fn score_count(&self, team_id: i64) -> award_engine::Result<i64> {
        self.team_score_count(team_id)
            .await
            .map_err(|e| EvalError::Aggregation(e.to_string()))
    }

    async fn all_team_totals(&self) -> award_engine::Result<Vec<TeamStanding>> {
        ScoreRepository::all_team_totals(self)
            .await
            .map_err(|e| EvalError::Aggregation(e.to_string()))
    }
}

//! 队伍仓储

use scoreboard_shared::error::ScoreboardError;
use sqlx::PgPool;
use sqlx::error::Error as SqlxError;

use crate::error::{CompetitionError, Result};
use crate::models::{NewTeam, Team};

/// 队伍名称唯一约束
const UNIQ_TEAM_NAME: &str = "teams_name_key";
/// 队长唯一约束（一名队长最多带一支队伍）
const UNIQ_TEAM_LEADER: &str = "teams_leader_id_key";

/// 队伍仓储
///
/// 负责队伍的 CRUD。删除队伍时得分与授予记录由外键
/// `ON DELETE CASCADE` 一并清除。
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建队伍
    ///
    /// 名称或队长的唯一约束冲突被翻译成对应的业务错误。
    pub async fn create_team(&self, team: &NewTeam) -> Result<Team> {
        let created = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, leader_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, leader_id, created_at, updated_at
            "#,
        )
        .bind(&team.name)
        .bind(&team.description)
        .bind(team.leader_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, team))?;

        Ok(created)
    }

    /// 根据 ID 获取队伍
    pub async fn get_team(&self, id: i64) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, leader_id, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// 根据名称获取队伍
    pub async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, leader_id, created_at, updated_at
            FROM teams
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// 列出全部队伍（按创建时间倒序）
    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, leader_id, created_at, updated_at
            FROM teams
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    /// 删除队伍（级联删除其得分与授予）
    pub async fn delete_team(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CompetitionError::TeamNotFound(id));
        }

        Ok(())
    }

    /// 按约束名区分两种唯一冲突
    fn map_unique_violation(err: SqlxError, team: &NewTeam) -> CompetitionError {
        if ScoreboardError::is_unique_violation(&err) {
            if let SqlxError::Database(db_err) = &err {
                match db_err.constraint() {
                    Some(UNIQ_TEAM_NAME) => {
                        return CompetitionError::TeamNameTaken(team.name.clone());
                    }
                    Some(UNIQ_TEAM_LEADER) => {
                        return CompetitionError::LeaderAlreadyAssigned(
                            team.leader_id.unwrap_or(0),
                        );
                    }
                    _ => {}
                }
            }
        }
        CompetitionError::Database(err)
    }
}

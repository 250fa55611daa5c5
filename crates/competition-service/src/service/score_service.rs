//! 得分服务
//!
//! 得分写入路径，也是徽章评估的唯一触发点：得分落库后
//! 显式地、同步地调用评估器，而不是依赖隐式的存储钩子，
//! 让触发点可审计、可单独测试。
//!
//! ## 失败隔离
//!
//! 得分写入的成败只取决于其自身的有效性；评估失败
//! （聚合不可用等）只记录警告，绝不回滚或阻断得分写入。
//! 徽章授予是尽力而为的附属行为，不属于得分写入的事务保证。

use std::sync::Arc;

use award_engine::BadgeEvaluator;
use scoreboard_shared::config::DatabaseConfig;
use scoreboard_shared::database::Database;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::error::{CompetitionError, Result};
use crate::models::{LogAction, NewActivityLog, NewScore, Score};
use crate::repository::{
    ActivityLogRepository, AwardRepository, BadgeRepository, ScoreRepository, TeamRepository,
};

/// 得分服务
pub struct ScoreService {
    teams: Arc<TeamRepository>,
    scores: Arc<ScoreRepository>,
    activity: Arc<ActivityLogRepository>,
    evaluator: Arc<BadgeEvaluator>,
}

impl ScoreService {
    pub fn new(
        teams: Arc<TeamRepository>,
        scores: Arc<ScoreRepository>,
        activity: Arc<ActivityLogRepository>,
        evaluator: Arc<BadgeEvaluator>,
    ) -> Self {
        Self {
            teams,
            scores,
            activity,
            evaluator,
        }
    }

    /// 从数据库配置组装（建立连接池）
    ///
    /// 宿主只需提供配置；连接池管理复用共享库的 `Database` 包装。
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db = Database::connect(config)
            .await
            .map_err(|e| CompetitionError::Internal(e.to_string()))?;
        Ok(Self::from_pool(db.pool().clone()))
    }

    /// 从连接池组装完整的写入路径
    ///
    /// 仓储同时充当引擎协作者：徽章目录、积分聚合、授予台账、
    /// 审计通知分别由对应仓储实现。
    pub fn from_pool(pool: PgPool) -> Self {
        let teams = Arc::new(TeamRepository::new(pool.clone()));
        let scores = Arc::new(ScoreRepository::new(pool.clone()));
        let activity = Arc::new(ActivityLogRepository::new(pool.clone()));
        let evaluator = Arc::new(BadgeEvaluator::new(
            Arc::new(BadgeRepository::new(pool.clone())),
            Arc::new(ScoreRepository::new(pool.clone())),
            Arc::new(AwardRepository::new(pool.clone())),
            Arc::new(ActivityLogRepository::new(pool)),
        ));
        Self::new(teams, scores, activity, evaluator)
    }

    /// 录入一条得分
    ///
    /// 1. 校验（非负、队伍存在）-> 2. 落库 -> 3. 活动日志
    /// -> 4. 触发徽章评估（失败不影响主流程）
    #[instrument(skip(self, score), fields(team_id = score.team_id, points = score.points))]
    pub async fn add_score(&self, score: NewScore) -> Result<Score> {
        if score.points < 0 {
            return Err(CompetitionError::NegativePoints(score.points));
        }

        let team = self
            .teams
            .get_team(score.team_id)
            .await?
            .ok_or(CompetitionError::TeamNotFound(score.team_id))?;

        let created = self.scores.create_score(&score).await?;
        info!(score_id = created.id, "得分已录入");

        self.log_activity(NewActivityLog {
            action: LogAction::ScoreAdded,
            team_id: Some(team.id),
            user_id: score.created_by,
            description: format!("队伍 {} 获得 {} 分", team.name, created.points),
            metadata: serde_json::json!({ "score_id": created.id, "points": created.points }),
        })
        .await;

        // 评估在得分提交之后运行；其失败永不回滚得分写入
        if let Err(e) = self.evaluator.on_score_created(team.id).await {
            warn!(team_id = team.id, error = %e, "徽章评估失败，得分写入不受影响");
        }

        Ok(created)
    }

    /// 删除一条得分
    ///
    /// 不触发重新评估：已授予的徽章永不自动撤销，
    /// 即使总分跌回条件阈值之下。
    #[instrument(skip(self))]
    pub async fn delete_score(&self, score_id: i64, deleted_by: Option<i64>) -> Result<Score> {
        let deleted = self.scores.delete_score(score_id).await?;
        info!(team_id = deleted.team_id, "得分已删除");

        self.log_activity(NewActivityLog {
            action: LogAction::ScoreDeleted,
            team_id: Some(deleted.team_id),
            user_id: deleted_by,
            description: format!("删除得分 {}（{} 分）", deleted.id, deleted.points),
            metadata: serde_json::json!({ "score_id": deleted.id, "points": deleted.points }),
        })
        .await;

        Ok(deleted)
    }

    /// 写活动日志（尽力而为，失败只记警告）
    async fn log_activity(&self, entry: NewActivityLog) {
        if let Err(e) = self.activity.log(&entry).await {
            warn!(error = %e, "活动日志写入失败");
        }
    }
}

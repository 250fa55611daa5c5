//! 徽章评估器
//!
//! 得分变更后的授予主流程：对目标队伍逐一评估尚未授予的徽章条件，
//! 满足则原子地写入授予台账并发出审计事件。
//!
//! ## 评估流程
//!
//! 1. 读取徽章目录 -> 2. 读取队伍聚合（总分、得分次数）
//! -> 3. 过滤已授予徽章 -> 4. 按需计算一次全局排名
//! -> 5. 逐徽章评估条件 -> 6. 原子写入 + 审计事件
//!
//! ## 失败语义
//!
//! 聚合或排名读取失败时整次评估中止，不产生部分授予
//! （所有聚合输入在授予循环开始前读齐）。评估失败永远不应
//! 回滚触发它的得分写入，由调用方记录警告并继续。
//! 并发评估观察到 `AlreadyExists` 时跳过事件发送，不视为错误。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::condition::BadgeCondition;
use crate::error::Result;
use crate::ranking::{RankEntry, compute_ranking, rank_of};
use crate::traits::{
    AuditNotifier, AwardLedger, AwardOutcome, BadgeCatalog, BadgeDef, ScoreAggregateSource,
};

/// 一次评估中新授予的徽章
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardedBadge {
    pub badge_id: i64,
    pub badge_name: String,
    pub earned_at: DateTime<Utc>,
}

/// 徽章评估器
///
/// 无状态，可从多个并发请求同时调用（同队或不同队均安全）；
/// 唯一的原子性保证由 `AwardLedger` 的唯一约束承担。
pub struct BadgeEvaluator {
    catalog: Arc<dyn BadgeCatalog>,
    scores: Arc<dyn ScoreAggregateSource>,
    ledger: Arc<dyn AwardLedger>,
    notifier: Arc<dyn AuditNotifier>,
}

impl BadgeEvaluator {
    pub fn new(
        catalog: Arc<dyn BadgeCatalog>,
        scores: Arc<dyn ScoreAggregateSource>,
        ledger: Arc<dyn AwardLedger>,
        notifier: Arc<dyn AuditNotifier>,
    ) -> Self {
        Self {
            catalog,
            scores,
            ledger,
            notifier,
        }
    }

    /// 得分创建后的评估入口
    ///
    /// 返回本次新授予的徽章列表。两次连续调用之间若无得分变化，
    /// 第二次必然返回空列表（台账层保证至多一次）。
    #[instrument(skip(self), fields(team_id = team_id))]
    pub async fn on_score_created(&self, team_id: i64) -> Result<Vec<AwardedBadge>> {
        let badges = self.catalog.list_badges().await?;
        if badges.is_empty() {
            return Ok(Vec::new());
        }

        let total_score = self.scores.total_score(team_id).await?;
        let score_count = self.scores.score_count(team_id).await?;

        // 先过滤掉已授予的徽章，再决定是否需要全局排名，
        // 避免为已经拿到排名徽章的队伍反复做全量聚合
        let mut pending = Vec::with_capacity(badges.len());
        for badge in badges {
            if self.ledger.has_award(team_id, badge.id).await? {
                continue;
            }
            pending.push(badge);
        }

        // 全部聚合输入在授予循环前读齐：
        // 聚合失败时整次评估中止，不会留下部分授予
        let ranking = if pending.iter().any(|b| b.condition.needs_ranking()) {
            Some(compute_ranking(self.scores.all_team_totals().await?))
        } else {
            None
        };

        let mut awarded = Vec::new();
        for badge in pending {
            if !Self::is_earned(&badge, team_id, total_score, score_count, ranking.as_deref()) {
                continue;
            }

            let when = Utc::now();
            match self.ledger.record_award(team_id, badge.id, when).await? {
                AwardOutcome::Recorded => {
                    info!(
                        team_id,
                        badge_id = badge.id,
                        badge_name = %badge.name,
                        "徽章已授予"
                    );
                    self.emit_event(team_id, &badge).await;
                    awarded.push(AwardedBadge {
                        badge_id: badge.id,
                        badge_name: badge.name,
                        earned_at: when,
                    });
                }
                AwardOutcome::AlreadyExists => {
                    // 并发评估抢先写入，抑制重复事件
                    debug!(
                        team_id,
                        badge_id = badge.id,
                        "授予已存在，跳过事件发送"
                    );
                }
            }
        }

        Ok(awarded)
    }

    /// 评估单个徽章条件
    ///
    /// 排名条件：队伍不在快照中（如并发删除）时恒为不满足。
    /// 未识别条件类型恒为不满足，既不报错也不授予。
    fn is_earned(
        badge: &BadgeDef,
        team_id: i64,
        total_score: i64,
        score_count: i64,
        ranking: Option<&[RankEntry]>,
    ) -> bool {
        match badge.condition {
            BadgeCondition::ScoreThreshold { threshold } => total_score >= threshold,
            BadgeCondition::ScoreCount { count } => score_count >= count,
            BadgeCondition::Rank { rank } => ranking
                .and_then(|entries| rank_of(entries, team_id))
                .map(|r| r <= rank)
                .unwrap_or(false),
            BadgeCondition::Unknown => false,
        }
    }

    /// 发送审计事件（尽力而为，失败只记警告）
    async fn emit_event(&self, team_id: i64, badge: &BadgeDef) {
        let description = format!("队伍 {} 获得徽章 {}", team_id, badge.name);
        if let Err(e) = self
            .notifier
            .badge_earned(team_id, badge.id, &badge.name, &description)
            .await
        {
            warn!(
                team_id,
                badge_id = badge.id,
                error = %e,
                "审计事件发送失败"
            );
        }
    }
}

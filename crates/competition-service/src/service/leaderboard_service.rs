//! 排行榜服务
//!
//! 只读视图。与排名类徽章条件共用同一个排名计算器
//! （`award_engine::compute_ranking`），保证两处的名次语义
//! 完全一致：总分降序、并列共享名次、并列后跳号。

use std::sync::Arc;

use award_engine::{RankEntry, compute_ranking, rank_of};
use tracing::instrument;

use crate::error::Result;
use crate::repository::ScoreRepository;

/// 排行榜服务
pub struct LeaderboardService {
    scores: Arc<ScoreRepository>,
}

impl LeaderboardService {
    pub fn new(scores: Arc<ScoreRepository>) -> Self {
        Self { scores }
    }

    /// 当前排行榜
    ///
    /// `limit` 在排名计算之后截断（名次数值不受截断影响）。
    #[instrument(skip(self))]
    pub async fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<RankEntry>> {
        let standings = self.scores.all_team_totals().await?;
        let mut entries = compute_ranking(standings);
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// 某队伍的当前名次（队伍不存在时为 None）
    #[instrument(skip(self))]
    pub async fn team_rank(&self, team_id: i64) -> Result<Option<i64>> {
        let entries = self.leaderboard(None).await?;
        Ok(rank_of(&entries, team_id))
    }
}

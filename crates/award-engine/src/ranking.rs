//! 排名计算器
//!
//! 对全部队伍按总分计算确定性的 competition ranking（"1224" 式）：
//! 总分相同的队伍共享名次，并列组之后的下一个不同总分
//! 直接取其 1 基位置作为名次（名次号会跳过）。
//!
//! 纯函数，无副作用；同时服务于排名类徽章条件的评估
//! 和公开的排行榜读取路径，保证两处语义完全一致。

use serde::{Deserialize, Serialize};

/// 排名输入：一支队伍的当前聚合状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: i64,
    /// 队伍名，用于并列时的确定性迭代顺序（不影响名次数值）
    pub name: String,
    /// 累计总分，无任何得分的队伍为 0
    pub total_score: i64,
}

/// 排名输出条目，临时数据，不落库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub team_id: i64,
    pub name: String,
    pub total_score: i64,
    /// 名次，1 为最佳；并列共享名次
    pub rank: i64,
}

/// 计算全量排名
///
/// 排序键：总分降序，队伍名升序（仅保证迭代顺序确定，
/// 并列队伍的名次数值仍然相同）。输入不变时输出稳定。
pub fn compute_ranking(mut standings: Vec<TeamStanding>) -> Vec<RankEntry> {
    standings.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut entries = Vec::with_capacity(standings.len());
    let mut prev_total: Option<i64> = None;
    let mut prev_rank: i64 = 0;

    for (idx, standing) in standings.into_iter().enumerate() {
        let rank = match prev_total {
            Some(total) if total == standing.total_score => prev_rank,
            _ => idx as i64 + 1,
        };
        prev_total = Some(standing.total_score);
        prev_rank = rank;

        entries.push(RankEntry {
            team_id: standing.team_id,
            name: standing.name,
            total_score: standing.total_score,
            rank,
        });
    }

    entries
}

/// 在排名结果中查找指定队伍的名次
///
/// 队伍不在结果中（如并发删除后）返回 None。
pub fn rank_of(entries: &[RankEntry], team_id: i64) -> Option<i64> {
    entries
        .iter()
        .find(|entry| entry.team_id == team_id)
        .map(|entry| entry.rank)
}

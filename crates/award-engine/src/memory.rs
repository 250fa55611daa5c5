//! 内存协作者实现
//!
//! 提供全部协作者 trait 的内存实现，适用于测试和无数据库的内嵌场景。
//! 授予台账用单把锁内的集合插入模拟数据库唯一约束，
//! 保证并发 `record_award` 恰有一次成功。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::Result;
use crate::ranking::TeamStanding;
use crate::traits::{
    AuditNotifier, AwardLedger, AwardOutcome, BadgeCatalog, BadgeDef, ScoreAggregateSource,
};

// ==================== 徽章目录 ====================

/// 固定内容的内存徽章目录
#[derive(Debug, Default)]
pub struct MemoryBadgeCatalog {
    badges: Vec<BadgeDef>,
}

impl MemoryBadgeCatalog {
    pub fn new(badges: Vec<BadgeDef>) -> Self {
        Self { badges }
    }
}

#[async_trait]
impl BadgeCatalog for MemoryBadgeCatalog {
    async fn list_badges(&self) -> Result<Vec<BadgeDef>> {
        Ok(self.badges.clone())
    }
}

// ==================== 积分账本 ====================

#[derive(Debug, Clone)]
struct TeamRecord {
    name: String,
    scores: Vec<i64>,
}

/// 内存积分账本
///
/// 按队伍保存得分条目，聚合值在读取时现算，
/// 与数据库实现的 SUM/COUNT 语义一致。
#[derive(Debug, Default)]
pub struct MemoryScoreBook {
    teams: Mutex<HashMap<i64, TeamRecord>>,
}

impl MemoryScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一支（可能还没有得分的）队伍
    pub fn register_team(&self, team_id: i64, name: &str) {
        self.teams
            .lock()
            .entry(team_id)
            .or_insert_with(|| TeamRecord {
                name: name.to_string(),
                scores: Vec::new(),
            });
    }

    /// 追加一条得分（队伍不存在时自动注册）
    pub fn add_score(&self, team_id: i64, name: &str, points: i64) {
        let mut teams = self.teams.lock();
        let record = teams.entry(team_id).or_insert_with(|| TeamRecord {
            name: name.to_string(),
            scores: Vec::new(),
        });
        record.scores.push(points);
    }

    /// 删除一条指定分值的得分（模拟 delete+recreate 语义）
    pub fn remove_score(&self, team_id: i64, points: i64) {
        let mut teams = self.teams.lock();
        if let Some(record) = teams.get_mut(&team_id) {
            if let Some(pos) = record.scores.iter().position(|p| *p == points) {
                record.scores.remove(pos);
            }
        }
    }
}

#[async_trait]
impl ScoreAggregateSource for MemoryScoreBook {
    async fn total_score(&self, team_id: i64) -> Result<i64> {
        Ok(self
            .teams
            .lock()
            .get(&team_id)
            .map(|r| r.scores.iter().sum())
            .unwrap_or(0))
    }

    async fn score_count(&self, team_id: i64) -> Result<i64> {
        Ok(self
            .teams
            .lock()
            .get(&team_id)
            .map(|r| r.scores.len() as i64)
            .unwrap_or(0))
    }

    async fn all_team_totals(&self) -> Result<Vec<TeamStanding>> {
        Ok(self
            .teams
            .lock()
            .iter()
            .map(|(team_id, record)| TeamStanding {
                team_id: *team_id,
                name: record.name.clone(),
                total_score: record.scores.iter().sum(),
            })
            .collect())
    }
}

// ==================== 授予台账 ====================

/// 内存授予台账
///
/// 单把锁内完成"检查 + 插入"，等价于数据库的唯一约束：
/// 并发写入同一 (team, badge) 恰有一次观察到 `Recorded`。
#[derive(Debug, Default)]
pub struct MemoryAwardLedger {
    awards: Mutex<HashMap<(i64, i64), DateTime<Utc>>>,
}

impl MemoryAwardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 台账中的授予总数
    pub fn award_count(&self) -> usize {
        self.awards.lock().len()
    }

    /// 列出全部授予（测试断言用）
    pub fn awards(&self) -> Vec<(i64, i64)> {
        self.awards.lock().keys().copied().collect()
    }
}

#[async_trait]
impl AwardLedger for MemoryAwardLedger {
    async fn has_award(&self, team_id: i64, badge_id: i64) -> Result<bool> {
        Ok(self.awards.lock().contains_key(&(team_id, badge_id)))
    }

    async fn record_award(
        &self,
        team_id: i64,
        badge_id: i64,
        when: DateTime<Utc>,
    ) -> Result<AwardOutcome> {
        let mut awards = self.awards.lock();
        if awards.contains_key(&(team_id, badge_id)) {
            return Ok(AwardOutcome::AlreadyExists);
        }
        awards.insert((team_id, badge_id), when);
        Ok(AwardOutcome::Recorded)
    }
}

// ==================== 审计事件收集器 ====================

/// 收集到的审计事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub team_id: i64,
    pub badge_id: i64,
    pub badge_name: String,
    pub description: String,
}

/// 内存审计日志，按到达顺序收集 badge_earned 事件
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl AuditNotifier for MemoryAuditLog {
    async fn badge_earned(
        &self,
        team_id: i64,
        badge_id: i64,
        badge_name: &str,
        description: &str,
    ) -> Result<()> {
        self.events.lock().push(AuditEvent {
            team_id,
            badge_id,
            badge_name: badge_name.to_string(),
            description: description.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_score_book_aggregates() {
        let book = MemoryScoreBook::new();
        book.register_team(1, "Alpha");
        assert_eq!(book.total_score(1).await.unwrap(), 0);
        assert_eq!(book.score_count(1).await.unwrap(), 0);

        book.add_score(1, "Alpha", 30);
        book.add_score(1, "Alpha", 20);
        assert_eq!(book.total_score(1).await.unwrap(), 50);
        assert_eq!(book.score_count(1).await.unwrap(), 2);

        // 未注册的队伍聚合为 0
        assert_eq!(book.total_score(99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ledger_is_idempotent() {
        let ledger = MemoryAwardLedger::new();
        let now = Utc::now();
        assert_eq!(
            ledger.record_award(1, 2, now).await.unwrap(),
            AwardOutcome::Recorded
        );
        assert_eq!(
            ledger.record_award(1, 2, now).await.unwrap(),
            AwardOutcome::AlreadyExists
        );
        assert_eq!(ledger.award_count(), 1);
        assert!(ledger.has_award(1, 2).await.unwrap());
    }
}

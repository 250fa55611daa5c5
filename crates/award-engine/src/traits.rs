//! 协作者 Trait 定义
//!
//! 引擎通过这些接口访问外部世界：积分聚合数据源、徽章目录、
//! 授予台账和审计通知。依赖抽象而非具体实现，便于 mock 测试
//! 和在不同宿主（数据库服务、内存嵌入）间复用。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::condition::BadgeCondition;
use crate::error::Result;
use crate::ranking::TeamStanding;

/// 徽章定义（引擎视角）
///
/// 只保留评估所需的字段，展示类字段（描述、图标）留在存储层。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeDef {
    pub id: i64,
    pub name: String,
    pub condition: BadgeCondition,
}

/// 授予写入结果
///
/// `AlreadyExists` 表示唯一约束检测到并发的重复授予，
/// 不是错误：调用方据此抑制重复的审计事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// 本次写入创建了新的授予记录
    Recorded,
    /// (team, badge) 已存在，本次写入被唯一约束拒绝
    AlreadyExists,
}

/// 积分聚合数据源
///
/// 引擎只读取聚合值，从不触碰单条得分记录。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreAggregateSource: Send + Sync {
    /// 队伍累计总分（无得分时为 0）
    async fn total_score(&self, team_id: i64) -> Result<i64>;

    /// 队伍得分条目数
    async fn score_count(&self, team_id: i64) -> Result<i64>;

    /// 全部队伍的总分快照（排名条件评估与排行榜共用）
    ///
    /// 并发写入下允许返回轻微过期的快照，无须跨队伍加锁。
    async fn all_team_totals(&self) -> Result<Vec<TeamStanding>>;
}

/// 徽章目录
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeCatalog: Send + Sync {
    /// 列出全部徽章定义
    async fn list_badges(&self) -> Result<Vec<BadgeDef>>;
}

/// 徽章授予台账
///
/// (team, badge) 的幂等集合。实现方必须用真正的唯一约束
/// （或等价的互斥）保证 `record_award` 的原子性，
/// 先查后写的两段式检查不满足要求。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AwardLedger: Send + Sync {
    /// 查询队伍是否已持有徽章
    async fn has_award(&self, team_id: i64, badge_id: i64) -> Result<bool>;

    /// 原子地记录一次授予
    ///
    /// 并发的两次写入恰有一次返回 `Recorded`，另一次观察到
    /// `AlreadyExists`。
    async fn record_award(
        &self,
        team_id: i64,
        badge_id: i64,
        when: DateTime<Utc>,
    ) -> Result<AwardOutcome>;
}

/// 审计通知器
///
/// 每次成功授予恰好收到一条 badge_earned 事件。
/// 通知失败不影响授予本身（尽力而为）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditNotifier: Send + Sync {
    /// 徽章授予事件
    ///
    /// `description` 为人类可读的描述文本，用于审计日志展示。
    async fn badge_earned(
        &self,
        team_id: i64,
        badge_id: i64,
        badge_name: &str,
        description: &str,
    ) -> Result<()>;
}

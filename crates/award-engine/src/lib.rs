//! 徽章授予引擎
//!
//! 积分榜系统的核心逻辑，提供：
//! - 徽章条件模型（阈值 / 次数 / 排名）的解析与评估
//! - 并列感知的确定性排名算法（competition ranking，"1224" 式）
//! - 幂等的徽章授予评估流程（至多授予一次，永不自动撤销）
//! - 面向外部协作者（积分聚合、徽章目录、授予台账、审计通知）的 trait 抽象
//!
//! 引擎本身不做任何持久化，全部 I/O 通过协作者 trait 注入，
//! `memory` 模块提供可直接用于测试和内嵌场景的内存实现。

pub mod condition;
pub mod error;
pub mod evaluator;
pub mod memory;
pub mod ranking;
pub mod traits;

pub use condition::BadgeCondition;
pub use error::{EvalError, Result};
pub use evaluator::{AwardedBadge, BadgeEvaluator};
pub use ranking::{RankEntry, TeamStanding, compute_ranking, rank_of};
pub use traits::{
    AuditNotifier, AwardLedger, AwardOutcome, BadgeCatalog, BadgeDef, ScoreAggregateSource,
};

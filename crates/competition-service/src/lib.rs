//! 竞赛积分服务
//!
//! 积分榜系统的持久化与触发层，被外围的 Web 层（不在本仓库内）调用。
//!
//! ## 核心功能
//!
//! - **队伍管理**：队伍的创建、查询、删除（级联删除得分与授予）
//! - **得分录入**：校验后写入得分，并同步触发徽章评估（失败隔离）
//! - **徽章目录**：徽章定义的创建与查询
//! - **授予台账**：(team, badge) 的唯一约束保护写入
//! - **排行榜**：与排名徽章共用同一个排名计算器的只读视图
//! - **审计日志**：得分变动与徽章授予的活动记录
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层（同时实现引擎协作者 trait）
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{CompetitionError, Result};
pub use models::*;
pub use repository::{
    ActivityLogRepository, AwardRepository, BadgeRepository, ScoreRepository, TeamRepository,
};
pub use service::{LeaderboardService, ScoreService};

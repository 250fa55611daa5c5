//! 竞赛服务领域模型
//!
//! 包含积分榜系统的所有核心实体定义

pub mod activity;
pub mod badge;
pub mod score;
pub mod team;

// 重新导出常用类型
pub use activity::{ActivityLog, LogAction, NewActivityLog};
pub use badge::{Badge, NewBadge, TeamBadge};
pub use score::{NewScore, Score};
pub use team::{NewTeam, Team};

//! 服务层
//!
//! 实现积分榜业务逻辑，协调仓储层与授予引擎。
//!
//! ## 模块结构
//!
//! - `score_service`: 得分录入/删除，以及评估触发点
//! - `leaderboard_service`: 排行榜只读视图

pub mod leaderboard_service;
pub mod score_service;

pub use leaderboard_service::LeaderboardService;
pub use score_service::ScoreService;

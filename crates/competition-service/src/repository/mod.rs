//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 授予引擎的协作者 trait（积分聚合、徽章目录、授予台账、
//!   审计通知）由对应仓储直接实现，错误映射为引擎错误

mod activity_repo;
mod award_repo;
mod badge_repo;
mod score_repo;
mod team_repo;

pub use activity_repo::ActivityLogRepository;
pub use award_repo::AwardRepository;
pub use badge_repo::BadgeRepository;
pub use score_repo::ScoreRepository;
pub use team_repo::TeamRepository;

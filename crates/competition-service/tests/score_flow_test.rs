//! 得分 -> 评估 -> 授予全流程集成测试
//!
//! 使用真实 PostgreSQL 验证仓储与触发路径：授予的唯一约束、
//! 级联删除、聚合查询都依赖数据库行为，无法用纯 mock 覆盖。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test score_flow_test -- --ignored
//! ```

use std::sync::Arc;

use award_engine::AwardOutcome;
use chrono::Utc;
use competition::error::CompetitionError;
use competition::models::{NewBadge, NewScore, NewTeam};
use competition::repository::{
    ActivityLogRepository, AwardRepository, BadgeRepository, ScoreRepository, TeamRepository,
};
use competition::service::{LeaderboardService, ScoreService};
use scoreboard_shared::test_utils::test_team_name;
use sqlx::PgPool;

// ==================== 辅助函数 ====================

/// 从环境变量读取数据库 URL，未设置则 panic
fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

async fn setup_pool() -> PgPool {
    let pool = PgPool::connect(&database_url())
        .await
        .expect("数据库连接失败");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("迁移执行失败");
    pool
}

async fn create_team(pool: &PgPool, prefix: &str) -> i64 {
    let repo = TeamRepository::new(pool.clone());
    let team = repo
        .create_team(&NewTeam {
            name: test_team_name(prefix),
            description: None,
            leader_id: None,
        })
        .await
        .expect("创建队伍失败");
    team.id
}

async fn create_threshold_badge(pool: &PgPool, prefix: &str, threshold: i64) -> i64 {
    let repo = BadgeRepository::new(pool.clone());
    let badge = repo
        .create_badge(&NewBadge {
            name: test_team_name(prefix),
            description: None,
            icon: "🏅".to_string(),
            condition_type: "score_threshold".to_string(),
            condition_value: serde_json::json!({ "threshold": threshold }),
        })
        .await
        .expect("创建徽章失败");
    badge.id
}

fn score(team_id: i64, points: i32) -> NewScore {
    NewScore {
        team_id,
        points,
        description: Some("integration".to_string()),
        created_by: None,
    }
}

// ==================== 测试用例 ====================

#[tokio::test]
#[ignore]
async fn add_score_triggers_award() {
    let pool = setup_pool().await;
    let team_id = create_team(&pool, "flow-team").await;
    let badge_id = create_threshold_badge(&pool, "flow-badge", 100).await;

    let service = ScoreService::from_pool(pool.clone());
    service.add_score(score(team_id, 100)).await.unwrap();

    let awards = AwardRepository::new(pool.clone());
    assert!(awards.exists(team_id, badge_id).await.unwrap());

    // badge_earned 活动日志恰好一条
    let logs = ActivityLogRepository::new(pool.clone())
        .list_for_team(team_id, 50)
        .await
        .unwrap();
    let earned = logs
        .iter()
        .filter(|l| l.metadata["badge_id"] == serde_json::json!(badge_id))
        .count();
    assert_eq!(earned, 1);
}

#[tokio::test]
#[ignore]
async fn negative_points_rejected_before_write() {
    let pool = setup_pool().await;
    let team_id = create_team(&pool, "neg-team").await;

    let service = ScoreService::from_pool(pool.clone());
    let result = service.add_score(score(team_id, -5)).await;
    assert!(matches!(result, Err(CompetitionError::NegativePoints(-5))));

    let scores = ScoreRepository::new(pool.clone());
    assert_eq!(scores.team_score_count(team_id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn score_for_missing_team_is_not_found() {
    let pool = setup_pool().await;
    let service = ScoreService::from_pool(pool.clone());
    let result = service.add_score(score(i64::MAX, 10)).await;
    assert!(matches!(result, Err(CompetitionError::TeamNotFound(_))));
}

#[tokio::test]
#[ignore]
async fn award_insert_is_unique_constrained() {
    let pool = setup_pool().await;
    let team_id = create_team(&pool, "uniq-team").await;
    let badge_id = create_threshold_badge(&pool, "uniq-badge", 0).await;

    let awards = Arc::new(AwardRepository::new(pool.clone()));

    // 并发写同一 (team, badge)：唯一约束保证恰有一次 Recorded
    let mut handles = Vec::new();
    for _ in 0..8 {
        let awards = awards.clone();
        handles.push(tokio::spawn(async move {
            awards.insert_award(team_id, badge_id, Utc::now()).await
        }));
    }

    let mut recorded = 0;
    let mut existed = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            AwardOutcome::Recorded => recorded += 1,
            AwardOutcome::AlreadyExists => existed += 1,
        }
    }
    assert_eq!(recorded, 1);
    assert_eq!(existed, 7);
}

#[tokio::test]
#[ignore]
async fn score_deletion_keeps_awards() {
    let pool = setup_pool().await;
    let team_id = create_team(&pool, "keep-team").await;
    let badge_id = create_threshold_badge(&pool, "keep-badge", 100).await;

    let service = ScoreService::from_pool(pool.clone());
    let created = service.add_score(score(team_id, 120)).await.unwrap();

    // 删分跌回 0：授予保留
    service.delete_score(created.id, None).await.unwrap();

    let scores = ScoreRepository::new(pool.clone());
    assert_eq!(scores.team_total_score(team_id).await.unwrap(), 0);
    assert!(
        AwardRepository::new(pool.clone())
            .exists(team_id, badge_id)
            .await
            .unwrap()
    );
}

#[tokio::test]
#[ignore]
async fn leaderboard_includes_scoreless_teams() {
    let pool = setup_pool().await;
    let scoring = create_team(&pool, "lb-scoring").await;
    let scoreless = create_team(&pool, "lb-scoreless").await;

    let service = ScoreService::from_pool(pool.clone());
    service.add_score(score(scoring, 30)).await.unwrap();

    let leaderboard =
        LeaderboardService::new(Arc::new(ScoreRepository::new(pool.clone())));
    let entries = leaderboard.leaderboard(None).await.unwrap();

    let scoring_entry = entries.iter().find(|e| e.team_id == scoring).unwrap();
    let scoreless_entry = entries.iter().find(|e| e.team_id == scoreless).unwrap();
    assert_eq!(scoring_entry.total_score, 30);
    assert_eq!(scoreless_entry.total_score, 0);
    assert!(scoring_entry.rank < scoreless_entry.rank);
}

#[tokio::test]
#[ignore]
async fn team_deletion_cascades() {
    let pool = setup_pool().await;
    let team_id = create_team(&pool, "cascade-team").await;
    let badge_id = create_threshold_badge(&pool, "cascade-badge", 0).await;

    let service = ScoreService::from_pool(pool.clone());
    service.add_score(score(team_id, 10)).await.unwrap();

    let awards = AwardRepository::new(pool.clone());
    assert!(awards.exists(team_id, badge_id).await.unwrap());

    TeamRepository::new(pool.clone())
        .delete_team(team_id)
        .await
        .unwrap();

    // 得分与授予随队伍一并删除
    assert!(!awards.exists(team_id, badge_id).await.unwrap());
    let scores = ScoreRepository::new(pool.clone());
    assert_eq!(scores.team_score_count(team_id).await.unwrap(), 0);
}

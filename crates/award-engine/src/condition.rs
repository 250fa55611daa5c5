//! 徽章条件模型
//!
//! 将存储层的 `(condition_type, condition_value)` 字符串 + JSON 组合
//! 解析为封闭的条件枚举，换取编译期的穷尽性检查。
//! 未识别的条件类型解析为 `Unknown`，评估时恒为不满足，
//! 既不报错也不授予。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 徽章授予条件
///
/// 序列化格式与存储层一致：`condition_type` 作为标签，
/// 参数放在 `condition_value` 对象里（缺省键视为 0）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition_type", content = "condition_value", rename_all = "snake_case")]
pub enum BadgeCondition {
    /// 累计总分达到阈值
    ScoreThreshold { threshold: i64 },
    /// 得分条目数达到次数
    ScoreCount { count: i64 },
    /// 当前排名不劣于指定名次（1 为最佳）
    Rank { rank: i64 },
    /// 未识别的条件类型，恒不满足
    #[serde(skip)]
    Unknown,
}

impl BadgeCondition {
    /// 从存储层的原始字段解析条件
    ///
    /// 参数键缺失时取 0（与历史数据兼容：`{}` 等价于阈值 0，
    /// 即任何一次评估都会满足）。非对象或非整数取值同样回退到 0。
    pub fn parse(condition_type: &str, condition_value: &Value) -> Self {
        let param = |key: &str| -> i64 {
            condition_value
                .get(key)
                .and_then(Value::as_i64)
                .unwrap_or(0)
        };

        match condition_type {
            "score_threshold" => Self::ScoreThreshold {
                threshold: param("threshold"),
            },
            "score_count" => Self::ScoreCount {
                count: param("count"),
            },
            "rank" => Self::Rank { rank: param("rank") },
            _ => Self::Unknown,
        }
    }

    /// 条件是否需要全局排名计算
    ///
    /// 排名条件是唯一需要读取全部队伍聚合数据的条件，
    /// 评估器据此决定是否触发（惰性的）排名计算。
    pub fn needs_ranking(&self) -> bool {
        matches!(self, Self::Rank { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_score_threshold() {
        let cond = BadgeCondition::parse("score_threshold", &json!({"threshold": 100}));
        assert_eq!(cond, BadgeCondition::ScoreThreshold { threshold: 100 });
    }

    #[test]
    fn test_parse_score_count() {
        let cond = BadgeCondition::parse("score_count", &json!({"count": 5}));
        assert_eq!(cond, BadgeCondition::ScoreCount { count: 5 });
    }

    #[test]
    fn test_parse_rank() {
        let cond = BadgeCondition::parse("rank", &json!({"rank": 3}));
        assert_eq!(cond, BadgeCondition::Rank { rank: 3 });
    }

    #[test]
    fn test_missing_key_defaults_to_zero() {
        let cond = BadgeCondition::parse("score_threshold", &json!({}));
        assert_eq!(cond, BadgeCondition::ScoreThreshold { threshold: 0 });

        // 键名对不上条件类型时同样回退到 0
        let cond = BadgeCondition::parse("rank", &json!({"threshold": 10}));
        assert_eq!(cond, BadgeCondition::Rank { rank: 0 });
    }

    #[test]
    fn test_unknown_condition_type() {
        let cond = BadgeCondition::parse("challenge_completed", &json!({"count": 3}));
        assert_eq!(cond, BadgeCondition::Unknown);
        assert!(!cond.needs_ranking());
    }

    #[test]
    fn test_non_object_condition_value() {
        let cond = BadgeCondition::parse("score_count", &json!(null));
        assert_eq!(cond, BadgeCondition::ScoreCount { count: 0 });
    }

    #[test]
    fn test_needs_ranking() {
        assert!(BadgeCondition::Rank { rank: 1 }.needs_ranking());
        assert!(!BadgeCondition::ScoreThreshold { threshold: 1 }.needs_ranking());
        assert!(!BadgeCondition::ScoreCount { count: 1 }.needs_ranking());
    }

    #[test]
    fn test_condition_serde_roundtrip() {
        let cond = BadgeCondition::ScoreThreshold { threshold: 100 };
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["condition_type"], "score_threshold");
        assert_eq!(json["condition_value"]["threshold"], 100);

        let parsed: BadgeCondition = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cond);
    }
}

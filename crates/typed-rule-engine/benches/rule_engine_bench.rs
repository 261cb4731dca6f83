//! 规则引擎性能基准测试
//!
//! 测试覆盖：
//! - 引擎构建（校验 + 编译）性能
//! - 简单条件与嵌套规则评估性能
//! - 三种评估策略在不同规则数量下的性能曲线

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rule_engine::{
    CancellationToken, Condition, ConditionType, EvaluateOptions, Input, Operand, Operator,
    RuleConfig, RuleEngine, RuleEngineConfig, RuleResult, ValueType,
};
use serde_json::json;
use std::hint::black_box;

fn base_config() -> RuleEngineConfig {
    let mut config = RuleEngineConfig::default();
    config.fields.insert("amount".to_string(), ValueType::Integer);
    config.fields.insert("vip".to_string(), ValueType::Boolean);
    config.fields.insert("city".to_string(), ValueType::String);

    config.condition_types.insert(
        "isVip".to_string(),
        ConditionType::new(
            Operator::Eq,
            ValueType::Boolean,
            vec![
                Operand::field("vip", ValueType::Boolean),
                Operand::constant("true", ValueType::Boolean),
            ],
        ),
    );
    config.condition_types.insert(
        "inBangalore".to_string(),
        ConditionType::new(
            Operator::Contains,
            ValueType::String,
            vec![
                Operand::field("city", ValueType::String),
                Operand::constant("Bangalore", ValueType::String),
            ],
        ),
    );
    config
}

/// 创建 n 条规则：第 i 条规则要求 amount > i * 100
fn create_config(rule_count: usize) -> RuleEngineConfig {
    let mut config = base_config();

    for i in 0..rule_count {
        let threshold = format!("amount_gt_{}", i);
        config.condition_types.insert(
            threshold.clone(),
            ConditionType::new(
                Operator::Gt,
                ValueType::Integer,
                vec![
                    Operand::field("amount", ValueType::Integer),
                    Operand::constant((i * 100).to_string(), ValueType::Integer),
                ],
            ),
        );

        let mut result = RuleResult::new();
        result.insert("tier".to_string(), json!(i));

        config.rules.insert(
            format!("rule_{}", i),
            RuleConfig::new(
                i as i64,
                Condition::and(vec![
                    Condition::leaf(threshold),
                    Condition::or(vec![
                        Condition::leaf("isVip"),
                        Condition::not(Condition::leaf("inBangalore")),
                    ]),
                ]),
                result,
            ),
        );
    }

    config
}

/// 创建嵌套规则（AND/OR 交替）
fn create_nested_condition(depth: usize, breadth: usize) -> Condition {
    if depth == 0 {
        return Condition::leaf("isVip");
    }

    let children = (0..breadth)
        .map(|_| create_nested_condition(depth - 1, breadth))
        .collect();

    if depth % 2 == 0 {
        Condition::and(children)
    } else {
        Condition::or(children)
    }
}

fn create_input(amount: i64) -> Input {
    [
        ("amount".to_string(), amount.to_string()),
        ("vip".to_string(), "true".to_string()),
        ("city".to_string(), "Bangalore".to_string()),
    ]
    .into_iter()
    .collect()
}

/// 引擎构建基准
fn bench_engine_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_build");

    for rule_count in [10usize, 100, 1000] {
        let config = create_config(rule_count);
        group.throughput(Throughput::Elements(rule_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(rule_count),
            &config,
            |b, config| b.iter(|| RuleEngine::new(black_box(config.clone()))),
        );
    }

    group.finish();
}

/// 嵌套规则评估基准
fn bench_nested_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_rules");
    let cancel = CancellationToken::new();
    let input = create_input(500);

    for (depth, breadth) in [(2usize, 2usize), (3, 3), (4, 3)] {
        let mut config = base_config();
        config.rules.insert(
            "nested".to_string(),
            RuleConfig::new(
                0,
                create_nested_condition(depth, breadth),
                RuleResult::new(),
            ),
        );
        let engine = RuleEngine::new(config).unwrap();

        group.bench_with_input(
            BenchmarkId::new("depth_breadth", format!("{}x{}", depth, breadth)),
            &engine,
            |b, engine| {
                b.iter(|| engine.evaluate_single_rule(&cancel, black_box(&input), "nested"))
            },
        );
    }

    group.finish();
}

/// 三种评估策略基准
fn bench_evaluate_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_strategies");
    let cancel = CancellationToken::new();

    for rule_count in [10usize, 100, 1000] {
        let engine = RuleEngine::new(create_config(rule_count)).unwrap();
        // 约一半规则命中
        let input = create_input((rule_count as i64) * 50);

        group.throughput(Throughput::Elements(rule_count as u64));

        group.bench_with_input(
            BenchmarkId::new("complete", rule_count),
            &engine,
            |b, engine| {
                b.iter(|| engine.evaluate(&cancel, black_box(&input), EvaluateOptions::complete()))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("ascending_first_5", rule_count),
            &engine,
            |b, engine| {
                b.iter(|| {
                    engine.evaluate(
                        &cancel,
                        black_box(&input),
                        EvaluateOptions::ascending_priority_based(5),
                    )
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("descending_first_5", rule_count),
            &engine,
            |b, engine| {
                b.iter(|| {
                    engine.evaluate(
                        &cancel,
                        black_box(&input),
                        EvaluateOptions::descending_priority_based(5),
                    )
                })
            },
        );
    }

    group.finish();
}

// 配置 criterion
criterion_group!(
    benches,
    bench_engine_build,
    bench_nested_rules,
    bench_evaluate_strategies,
);

criterion_main!(benches);

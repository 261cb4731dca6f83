//! 强类型规则引擎
//!
//! 提供可复用的规则评估能力，支持：
//! - 字段、条件类型、规则的声明式配置与构建期全量校验
//! - 常量操作数预解析、规则条件树编译
//! - 短路求值执行，按优先级全量/升序/降序取前 n 个命中
//! - 基于取消令牌的逐规则取消

pub mod compiler;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod input;
pub mod models;
pub mod operators;
pub mod validator;
pub mod value;

pub use compiler::{CompiledRule, EvaluatorNode, RuleCompiler};
pub use engine::{EvaluateOptions, RuleEngine};
pub use error::{Result, RuleError};
pub use evaluator::ConditionEvaluator;
pub use executor::RuleExecutor;
pub use input::TypedInput;
pub use models::{
    Condition, ConditionType, Fields, Input, Operand, OperandKind, Output, RuleConfig,
    RuleEngineConfig, RuleResult,
};
pub use operators::{LogicalOperator, Operator};
pub use validator::{ResolvedOperand, ValidatedConditionType};
pub use value::{parse_value, ParseValueError, TypedValue, ValueType};

/// 取消令牌，评估调用方用它控制截止时间
pub use tokio_util::sync::CancellationToken;

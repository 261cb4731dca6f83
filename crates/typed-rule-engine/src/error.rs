//! 规则引擎错误类型
//!
//! 配置类错误在 `RuleEngine::new` 时一次性暴露，运行时错误按调用返回，
//! `InvariantViolation` 表示校验/编译阶段未能保证的内部不变量被破坏。

use crate::value::ValueType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    // ==================== 配置错误 ====================
    #[error("无效的值类型: {0}")]
    InvalidValueType(String),

    #[error("无效的操作符: 条件类型 {condition} 使用了未知操作符 {operator}")]
    InvalidOperator { condition: String, operator: String },

    #[error("无效的操作数类型: 条件类型 {condition} 的操作符 {operator} 不支持类型 {value_type}")]
    InvalidOperandType {
        condition: String,
        operator: String,
        value_type: ValueType,
    },

    #[error("操作数数量错误: 条件类型 {condition} 的操作符 {operator} 需要 {expected} 个操作数, 实际 {actual}")]
    InvalidOperandsLength {
        condition: String,
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("无效的条件类型: {0}")]
    InvalidConditionType(String),

    #[error("子条件数量错误: 规则 {rule} 中 {condition} 需要 {expected}, 实际 {actual}")]
    InvalidSubConditionCount {
        rule: String,
        condition: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("条件类型未找到: 规则 {rule} 引用了 {condition_type}")]
    ConditionTypeNotFound { rule: String, condition_type: String },

    #[error("无效的操作数: 条件类型 {condition} - {message}")]
    InvalidOperand { condition: String, message: String },

    #[error("字段不存在: {field} ({context})")]
    FieldNotFound { field: String, context: String },

    #[error("常量解析失败: 条件类型 {condition} 无法将 {value:?} 解析为 {value_type}")]
    ParsingFailed {
        condition: String,
        value: String,
        value_type: ValueType,
    },

    // ==================== 运行时错误 ====================
    #[error("输入解析失败: 字段 {field} 无法将 {value:?} 解析为 {value_type}")]
    FailedParsingInput {
        field: String,
        value: String,
        value_type: ValueType,
    },

    #[error("规则未找到: {0}")]
    RuleNotFound(String),

    #[error("无效的评估选项: {0}")]
    InvalidEvaluateOptions(String),

    #[error("评估已取消: 规则 {rule}")]
    ContextCancelled { rule: String },

    // ==================== 内部错误 ====================
    #[error("内部不变量被破坏: {0}")]
    InvariantViolation(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;

impl RuleError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidValueType(_) => "INVALID_VALUE_TYPE",
            Self::InvalidOperator { .. } => "INVALID_OPERATOR",
            Self::InvalidOperandType { .. } => "INVALID_OPERAND_TYPE",
            Self::InvalidOperandsLength { .. } => "INVALID_OPERANDS_LENGTH",
            Self::InvalidConditionType(_) => "INVALID_CONDITION_TYPE",
            Self::InvalidSubConditionCount { .. } => "INVALID_SUB_CONDITION_COUNT",
            Self::ConditionTypeNotFound { .. } => "CONDITION_TYPE_NOT_FOUND",
            Self::InvalidOperand { .. } => "INVALID_OPERAND",
            Self::FieldNotFound { .. } => "FIELD_NOT_FOUND",
            Self::ParsingFailed { .. } => "PARSING_FAILED",
            Self::FailedParsingInput { .. } => "FAILED_PARSING_INPUT",
            Self::RuleNotFound(_) => "RULE_NOT_FOUND",
            Self::InvalidEvaluateOptions(_) => "INVALID_EVALUATE_OPTIONS",
            Self::ContextCancelled { .. } => "CONTEXT_CANCELLED",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::JsonError(_) => "JSON_ERROR",
        }
    }

    /// 是否为构建引擎时产生的配置错误
    ///
    /// `FieldNotFound` 在配置阶段（操作数引用未声明字段）和运行阶段（输入缺少字段）都会出现，
    /// 这里按运行时错误处理。
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidValueType(_)
                | Self::InvalidOperator { .. }
                | Self::InvalidOperandType { .. }
                | Self::InvalidOperandsLength { .. }
                | Self::InvalidConditionType(_)
                | Self::InvalidSubConditionCount { .. }
                | Self::ConditionTypeNotFound { .. }
                | Self::InvalidOperand { .. }
                | Self::ParsingFailed { .. }
                | Self::JsonError(_)
        )
    }

    /// 是否为内部不变量错误（不可恢复，说明校验或编译存在缺陷）
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

//! 配置校验
//!
//! 在构建引擎之前一次性检查全部条件类型与规则条件树，任何错误都会中止构建。
//! 常量操作数在此阶段预先解析为 `TypedValue`，评估时不再重复解析。

use crate::error::{Result, RuleError};
use crate::input::TypedInput;
use crate::models::{Condition, ConditionType, Fields, OperandKind, RuleEngineConfig};
use crate::operators::{LogicalOperator, Operator};
use crate::value::{parse_value, TypedValue, ValueType};
use indexmap::IndexMap;
use tracing::debug;

/// 校验后的操作数
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedOperand {
    /// 输入字段名
    Field(String),
    /// 预解析的常量
    Constant(TypedValue),
}

impl ResolvedOperand {
    /// 取操作数的值
    ///
    /// 字段一定存在于 `TypedInput` 中（输入类型化保证），取不到说明内部状态已损坏。
    pub fn resolve<'a>(&'a self, input: &'a TypedInput) -> Result<&'a TypedValue> {
        match self {
            Self::Field(name) => input.get(name).ok_or_else(|| {
                RuleError::InvariantViolation(format!("类型化输入中缺少字段 {}", name))
            }),
            Self::Constant(value) => Ok(value),
        }
    }
}

/// 校验通过的条件类型
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConditionType {
    pub operator: Operator,
    pub value_type: ValueType,
    pub operands: [ResolvedOperand; 2],
}

/// 校验条件类型并预解析常量操作数
///
/// 检查顺序：名称、操作符、操作数个数、操作数类型、各操作数声明类型、字段/常量。
pub fn validate_condition_type(
    name: &str,
    condition_type: &ConditionType,
    fields: &Fields,
) -> Result<ValidatedConditionType> {
    if LogicalOperator::from_reference(name).is_some() {
        return Err(RuleError::InvalidConditionType(format!(
            "条件类型名 {} 与逻辑操作符冲突",
            name
        )));
    }

    let operator: Operator = condition_type
        .operator
        .parse()
        .map_err(|_| RuleError::InvalidOperator {
            condition: name.to_string(),
            operator: condition_type.operator.clone(),
        })?;

    if condition_type.operands.len() != operator.arity() {
        return Err(RuleError::InvalidOperandsLength {
            condition: name.to_string(),
            operator: operator.to_string(),
            expected: operator.arity(),
            actual: condition_type.operands.len(),
        });
    }

    let value_type = condition_type.value_type().ok_or_else(|| {
        RuleError::InvariantViolation(format!("条件类型 {} 通过个数校验后仍没有操作数", name))
    })?;
    if !operator.supports(value_type) {
        return Err(RuleError::InvalidOperandType {
            condition: name.to_string(),
            operator: operator.to_string(),
            value_type,
        });
    }

    if let Some(mismatched) = condition_type
        .operands
        .iter()
        .find(|operand| operand.value_type != value_type)
    {
        return Err(RuleError::InvalidOperand {
            condition: name.to_string(),
            message: format!(
                "操作数 {:?} 声明为 {}, 与条件类型的 {} 不一致",
                mismatched.value, mismatched.value_type, value_type
            ),
        });
    }

    let mut resolved = Vec::with_capacity(condition_type.operands.len());
    for operand in &condition_type.operands {
        match operand.kind {
            OperandKind::Field => {
                check_field(name, &operand.value, value_type, fields)?;
                resolved.push(ResolvedOperand::Field(operand.value.clone()));
            }
            OperandKind::Constant => {
                let value = parse_value(&operand.value, value_type).map_err(|e| {
                    RuleError::ParsingFailed {
                        condition: name.to_string(),
                        value: e.raw,
                        value_type: e.value_type,
                    }
                })?;
                resolved.push(ResolvedOperand::Constant(value));
            }
        }
    }

    let operands: [ResolvedOperand; 2] = resolved.try_into().map_err(|_| {
        RuleError::InvariantViolation(format!("条件类型 {} 的操作数个数在校验后发生变化", name))
    })?;

    Ok(ValidatedConditionType {
        operator,
        value_type,
        operands,
    })
}

/// 字段必须已声明，且类型与条件类型一致
fn check_field(condition: &str, field: &str, expected: ValueType, fields: &Fields) -> Result<()> {
    match fields.get(field) {
        None => Err(RuleError::FieldNotFound {
            field: field.to_string(),
            context: format!("条件类型 {} 引用了未声明的字段", condition),
        }),
        Some(actual) if *actual != expected => Err(RuleError::InvalidValueType(format!(
            "条件类型 {} 期望字段 {} 为 {}, 实际声明为 {}",
            condition, field, expected, actual
        ))),
        Some(_) => Ok(()),
    }
}

/// 递归校验规则条件树
///
/// `and`/`or` 至少两个子条件，`not` 恰好一个，叶子必须引用已存在的条件类型且不能带子条件。
pub fn validate_condition<V>(
    rule: &str,
    condition: &Condition,
    condition_types: &IndexMap<String, V>,
) -> Result<()> {
    match LogicalOperator::from_reference(&condition.reference) {
        Some(LogicalOperator::And) | Some(LogicalOperator::Or) => {
            if condition.children.len() < 2 {
                return Err(sub_condition_count(rule, condition, "至少 2 个"));
            }
        }
        Some(LogicalOperator::Not) => {
            if condition.children.len() != 1 {
                return Err(sub_condition_count(rule, condition, "恰好 1 个"));
            }
        }
        None => {
            if !condition_types.contains_key(&condition.reference) {
                return Err(RuleError::ConditionTypeNotFound {
                    rule: rule.to_string(),
                    condition_type: condition.reference.clone(),
                });
            }
            if !condition.children.is_empty() {
                return Err(sub_condition_count(rule, condition, "0 个"));
            }
            return Ok(());
        }
    }

    for child in &condition.children {
        validate_condition(rule, child, condition_types)?;
    }

    Ok(())
}

fn sub_condition_count(rule: &str, condition: &Condition, expected: &'static str) -> RuleError {
    RuleError::InvalidSubConditionCount {
        rule: rule.to_string(),
        condition: condition.reference.clone(),
        expected,
        actual: condition.children.len(),
    }
}

/// 校验整份配置，返回校验通过的条件类型表
pub fn validate_config(
    config: &RuleEngineConfig,
) -> Result<IndexMap<String, ValidatedConditionType>> {
    let mut condition_types = IndexMap::with_capacity(config.condition_types.len());

    for (name, condition_type) in &config.condition_types {
        let validated = validate_condition_type(name, condition_type, &config.fields)?;
        debug!(
            condition_type = %name,
            operator = %validated.operator,
            value_type = %validated.value_type,
            "条件类型校验通过"
        );
        condition_types.insert(name.clone(), validated);
    }

    for (rule_name, rule) in &config.rules {
        validate_condition(rule_name, &rule.root_condition, &condition_types)?;
    }

    Ok(condition_types)
}

impl RuleEngineConfig {
    /// 只做校验，不构建引擎
    pub fn validate(&self) -> Result<()> {
        validate_config(self).map(|_| ())
    }
}

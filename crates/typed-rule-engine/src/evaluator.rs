//! 条件评估器
//!
//! 实现七种操作符在类型化值上的比较逻辑。两个操作数必须都携带条件类型声明的值类型，
//! 否则返回 `InvariantViolation`，而不是静默地当作不匹配。

use crate::error::{Result, RuleError};
use crate::operators::Operator;
use crate::value::{TypedValue, ValueType};
use tracing::warn;

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件
    ///
    /// # Arguments
    /// * `operator` - 操作符
    /// * `value_type` - 条件类型声明的操作数类型
    /// * `first` - 第一个操作数（`contains` 时为被搜索的字符串）
    /// * `second` - 第二个操作数（`contains` 时为子串）
    pub fn evaluate(
        operator: Operator,
        value_type: ValueType,
        first: &TypedValue,
        second: &TypedValue,
    ) -> Result<bool> {
        if first.value_type() != value_type || second.value_type() != value_type {
            return Err(Self::mismatch(operator, value_type, first, second));
        }

        match operator {
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                Self::compare(operator, value_type, first, second)
            }
            Operator::Eq => Self::eq(operator, value_type, first, second),
            Operator::Neq => Self::eq(operator, value_type, first, second).map(|r| !r),
            Operator::Contains => Self::contains(operator, value_type, first, second),
        }
    }

    /// 数值比较
    fn compare(
        operator: Operator,
        value_type: ValueType,
        first: &TypedValue,
        second: &TypedValue,
    ) -> Result<bool> {
        match (first, second) {
            (TypedValue::Integer(a), TypedValue::Integer(b)) => Self::ordered(operator, a, b),
            (TypedValue::Float(a), TypedValue::Float(b)) => Self::ordered(operator, a, b),
            _ => Err(Self::mismatch(operator, value_type, first, second)),
        }
    }

    fn ordered<T: PartialOrd>(operator: Operator, a: &T, b: &T) -> Result<bool> {
        match operator {
            Operator::Gt => Ok(a > b),
            Operator::Gte => Ok(a >= b),
            Operator::Lt => Ok(a < b),
            Operator::Lte => Ok(a <= b),
            other => Err(RuleError::InvariantViolation(format!(
                "{} 不是数值比较操作符",
                other
            ))),
        }
    }

    /// 相等比较
    fn eq(
        operator: Operator,
        value_type: ValueType,
        first: &TypedValue,
        second: &TypedValue,
    ) -> Result<bool> {
        match (first, second) {
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => Ok(a == b),
            (TypedValue::String(a), TypedValue::String(b)) => Ok(a == b),
            (TypedValue::Integer(a), TypedValue::Integer(b)) => Ok(a == b),
            (TypedValue::Float(a), TypedValue::Float(b)) => Ok(a == b),
            _ => Err(Self::mismatch(operator, value_type, first, second)),
        }
    }

    /// 子串检查
    fn contains(
        operator: Operator,
        value_type: ValueType,
        first: &TypedValue,
        second: &TypedValue,
    ) -> Result<bool> {
        match (first, second) {
            (TypedValue::String(haystack), TypedValue::String(needle)) => {
                Ok(haystack.contains(needle.as_str()))
            }
            _ => Err(Self::mismatch(operator, value_type, first, second)),
        }
    }

    fn mismatch(
        operator: Operator,
        value_type: ValueType,
        first: &TypedValue,
        second: &TypedValue,
    ) -> RuleError {
        warn!(
            %operator,
            expected = %value_type,
            first = %first.value_type(),
            second = %second.value_type(),
            "操作数运行时类型与声明不一致"
        );
        RuleError::InvariantViolation(format!(
            "操作符 {} 期望 {} 操作数, 实际 {} 与 {}",
            operator,
            value_type,
            first.value_type(),
            second.value_type()
        ))
    }
}
